use axum::{
    extract::{Request, State},
    http::{
        header::{AUTHORIZATION, COOKIE},
        HeaderMap,
    },
    middleware::Next,
    response::Response,
};
use tracing::{error, info, warn};

use crate::auth::AuthError;
use crate::config::{JwtConfig, TokenSourceKind};
use crate::context::{RequestContext, CORRELATION_ID_NOT_SET};
use crate::error::ApiError;
use crate::state::AppState;

use super::context::strip_bearer;

pub const CORRELATION_ID_HEADER: &str = "request-id";

/// Where the authenticator reads the credential from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSource {
    /// `Authorization` header, optional `Bearer ` prefix.
    Header,
    /// Named cookie.
    Cookie(String),
}

impl TokenSource {
    pub fn from_config(config: &JwtConfig) -> Self {
        match config.token_source {
            TokenSourceKind::Header => TokenSource::Header,
            TokenSourceKind::Cookie => TokenSource::Cookie(config.token_key.clone()),
        }
    }

    pub fn extract(&self, headers: &HeaderMap) -> Result<String, AuthError> {
        match self {
            TokenSource::Header => headers
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .map(strip_bearer)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .ok_or_else(|| AuthError::MissingCredential("token not found".into())),
            TokenSource::Cookie(name) => cookie_value(headers, name)
                .ok_or_else(|| AuthError::MissingCredential(format!("cookie {} not present", name))),
        }
    }
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}

fn correlation_id(headers: &HeaderMap) -> String {
    match headers
        .get(CORRELATION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
    {
        Some(id) => id.to_string(),
        None => {
            warn!("{} header not found in request", CORRELATION_ID_HEADER);
            CORRELATION_ID_NOT_SET.to_string()
        }
    }
}

/// Decodes the credential into an identity and attaches it, with the
/// correlation id, to the request context.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let credential = state.token_source.extract(request.headers()).map_err(|e| {
        error!(error = %e, "error getting credential from request");
        ApiError::from(e)
    })?;

    let correlation_id = correlation_id(request.headers());

    let identity = state.codec.decode(&credential).map_err(|e| {
        error!(correlation_id = %correlation_id, error = %e, "failed to decode credential");
        ApiError::from(e)
    })?;

    if let Err(e) = identity.validate() {
        error!(correlation_id = %correlation_id, error = %e, "failed to validate identity claims");
        return Err(e.into());
    }

    info!(
        correlation_id = %correlation_id,
        user = %identity.username,
        path = %request.uri().path(),
        groups = ?identity.federated_groups,
        "authenticated request"
    );

    // The decoded credential replaces whatever the initiator saw in the header.
    let mut context = request
        .extensions_mut()
        .remove::<RequestContext>()
        .unwrap_or_default();
    context.credential = credential;
    request
        .extensions_mut()
        .insert(context.with_identity(correlation_id, identity));

    Ok(next.run(request).await)
}
