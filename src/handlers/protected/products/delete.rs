use axum::{extract::State, http::StatusCode};

use super::dto::DeleteProduct;
use crate::context::RequestContext;
use crate::error::{ApiError, ApiJson};
use crate::state::AppState;

/// POST /v1/deleteProduct - 200 with an empty body
pub async fn delete_product(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiJson(input): ApiJson<DeleteProduct>,
) -> Result<StatusCode, ApiError> {
    input.validate()?;
    state
        .products
        .delete_product(&ctx, &input.id, input.force_delete)
        .await?;
    Ok(StatusCode::OK)
}
