use axum::{
    extract::Request,
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::context::RequestContext;

pub fn strip_bearer(value: &str) -> &str {
    value.strip_prefix("Bearer ").unwrap_or(value)
}

/// Seeds the request context with the raw credential. Never rejects.
pub async fn context_initiator(mut request: Request, next: Next) -> Response {
    let credential = raw_authorization(request.headers());
    request
        .extensions_mut()
        .insert(RequestContext::new(strip_bearer(&credential)));
    next.run(request).await
}

fn raw_authorization(headers: &HeaderMap) -> String {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
