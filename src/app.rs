use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{protected::products, public};
use crate::middleware::{authenticate, context_initiator, request_log, require_admin};
use crate::state::AppState;

/// Full router with state applied.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(public_routes())
        .merge(product_routes(state.clone()))
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(public::index))
        .route("/ping", get(public::ping))
        .route("/health", get(public::health))
        .route("/getBuildInfo", post(public::build_info))
        .route_layer(from_fn(request_log))
}

fn product_routes(state: AppState) -> Router<AppState> {
    let writes = Router::new()
        .route("/v1/saveProduct", post(products::save_product))
        .route("/v1/deleteProduct", post(products::delete_product))
        .route_layer(from_fn_with_state(state.clone(), require_admin));

    // Layers run bottom-up: context, then authenticator, then request log.
    Router::new()
        .route("/v1/getProducts", post(products::get_products))
        .route("/v1/getProductsByPartialName", post(products::get_products_by_partial_name))
        .route("/v1/getProduct", post(products::get_product))
        .route("/v1/getProductsByIDs", post(products::get_products_by_ids))
        .merge(writes)
        .route_layer(from_fn(request_log))
        .route_layer(from_fn_with_state(state, authenticate))
        .route_layer(from_fn(context_initiator))
}
