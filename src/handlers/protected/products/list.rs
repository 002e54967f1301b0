use axum::extract::State;

use super::dto::GetProducts;
use crate::api::ItemsResponse;
use crate::context::RequestContext;
use crate::database::Product;
use crate::error::ApiJson;
use crate::filter::{Paging, PRODUCT_LISTING_COLUMNS};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// POST /v1/getProducts - paged, sorted, filtered listing
pub async fn get_products(
    State(state): State<AppState>,
    ctx: RequestContext,
    ApiJson(input): ApiJson<GetProducts>,
) -> ApiResult<ItemsResponse<Product>> {
    let listing = input.page_filter_sort.validate(&PRODUCT_LISTING_COLUMNS)?;

    let (products, total) = state.products.find_all(&ctx, &listing).await?;

    let envelope_paging = if listing.unpaged {
        Paging::default()
    } else {
        listing.paging
    };
    Ok(ApiResponse::success(ItemsResponse::build(products, envelope_paging, total)))
}
