use axum::extract::State;

use super::dto::{GetProductsByIds, GetProductsByName, Resource};
use crate::context::RequestContext;
use crate::database::Product;
use crate::error::ApiJson;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// POST /v1/getProductsByPartialName
pub async fn get_products_by_partial_name(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiJson(input): ApiJson<GetProductsByName>,
) -> ApiResult<Vec<Product>> {
    let products = state.products.find_by_partial_name(&ctx, &input.name).await?;
    Ok(ApiResponse::success(products))
}

/// POST /v1/getProduct
pub async fn get_product(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiJson(input): ApiJson<Resource>,
) -> ApiResult<Product> {
    input.validate()?;
    let product = state.products.find_by_id(&ctx, &input.id).await?;
    Ok(ApiResponse::success(product))
}

/// POST /v1/getProductsByIDs
pub async fn get_products_by_ids(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiJson(input): ApiJson<GetProductsByIds>,
) -> ApiResult<Vec<Product>> {
    input.validate()?;
    let products = state.products.find_by_ids(&ctx, &input.ids).await?;
    Ok(ApiResponse::success(products))
}
