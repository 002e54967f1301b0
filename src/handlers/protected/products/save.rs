use axum::extract::State;
use tracing::error;

use super::dto::SaveProduct;
use crate::context::RequestContext;
use crate::database::Product;
use crate::error::ApiJson;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// POST /v1/saveProduct - 201 on create, 200 on update
pub async fn save_product(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiJson(input): ApiJson<SaveProduct>,
) -> ApiResult<Product> {
    let create = input.is_create();
    let product = input.validate()?;

    if create {
        let created = state.products.add_product(&ctx, product).await.inspect_err(|e| {
            error!(correlation_id = ctx.correlation_id(), error = %e, "failed to add product")
        })?;
        Ok(ApiResponse::created(created))
    } else {
        let updated = state.products.update_product(&ctx, product).await.inspect_err(|e| {
            error!(correlation_id = ctx.correlation_id(), error = %e, "failed to update product")
        })?;
        Ok(ApiResponse::success(updated))
    }
}
