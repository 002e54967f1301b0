use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::auth::Identity;
use crate::error::ApiError;

pub const CORRELATION_ID_NOT_SET: &str = "not-set";
pub const CORRELATION_ID_UNKNOWN: &str = "UNKNOWN";

/// Per-request state built by the context middleware and threaded explicitly
/// through handlers, services and repositories.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub correlation_id: Option<String>,
    /// Raw credential with any `Bearer ` prefix removed. Never logged.
    pub credential: String,
    pub identity: Option<Identity>,
}

impl RequestContext {
    pub fn new(credential: impl Into<String>) -> Self {
        Self {
            correlation_id: None,
            credential: credential.into(),
            identity: None,
        }
    }

    pub fn with_identity(mut self, correlation_id: impl Into<String>, identity: Identity) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self.identity = Some(identity);
        self
    }

    pub fn correlation_id(&self) -> &str {
        self.correlation_id.as_deref().unwrap_or(CORRELATION_ID_UNKNOWN)
    }

    pub fn username(&self) -> Option<&str> {
        self.identity.as_ref().map(|i| i.username.as_str())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<RequestContext>().cloned().ok_or_else(|| {
            tracing::error!("request context missing; context middleware not installed");
            ApiError::internal_server_error("request context unavailable")
        })
    }
}
