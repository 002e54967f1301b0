// handlers/public/mod.rs - Public handlers (no credential required)

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::build_info::BuildInfo;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /
pub async fn index(State(state): State<AppState>) -> ApiResult<String> {
    Ok(ApiResponse::success(format!(
        "Product catalog service - version:{}",
        state.build_info.version
    )))
}

/// GET /ping
pub async fn ping() -> ApiResult<&'static str> {
    Ok(ApiResponse::success("Server is up!"))
}

/// POST /getBuildInfo
pub async fn build_info(State(state): State<AppState>) -> ApiResult<BuildInfo> {
    Ok(ApiResponse::success(state.build_info.as_ref().clone()))
}

/// GET /health - store connectivity
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "timestamp": now, "database": "ok" })),
        ),
        Err(e) => {
            tracing::error!("health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "timestamp": now, "database": "unavailable" })),
            )
        }
    }
}
