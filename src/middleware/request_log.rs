use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{debug, info};

use crate::context::{RequestContext, CORRELATION_ID_UNKNOWN};

const UNAUTHENTICATED: &str = "UNAUTHENTICATED";

/// Entry at DEBUG, exit at INFO with status and duration.
pub async fn request_log(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let (correlation_id, user) = match request.extensions().get::<RequestContext>() {
        Some(ctx) => (
            ctx.correlation_id().to_string(),
            ctx.username().unwrap_or(UNAUTHENTICATED).to_string(),
        ),
        None => (CORRELATION_ID_UNKNOWN.to_string(), UNAUTHENTICATED.to_string()),
    };

    let start = Instant::now();
    debug!(%correlation_id, %method, %path, "request entry");

    let response = next.run(request).await;

    info!(
        %correlation_id,
        %user,
        %method,
        %path,
        status = response.status().as_u16(),
        duration_ms = start.elapsed().as_millis() as u64,
        "request complete"
    );
    response
}
