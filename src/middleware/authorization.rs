use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::{error, warn};

use crate::context::RequestContext;
use crate::error::ApiError;
use crate::state::AppState;

/// Gate for mutating routes. Must sit behind [`super::authenticate`].
///
/// Without an identity the request fails with 500 and the handler is not
/// called. When an admin role is configured the identity must carry it.
/// Otherwise the request is forwarded.
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = request
        .extensions()
        .get::<RequestContext>()
        .and_then(|ctx| ctx.identity.as_ref());

    let Some(identity) = identity else {
        error!("validate admin access - failed to get user from context");
        return Err(ApiError::internal_server_error("failed to get user from context"));
    };

    if let Some(role) = state.admin_role.as_deref() {
        if !identity.has_group(role) {
            warn!(user = %identity.username, role, "admin access denied");
            return Err(ApiError::forbidden("admin access required"));
        }
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Identity;
    use axum::{
        body::Body,
        http::StatusCode,
        middleware::{from_fn, from_fn_with_state},
        routing::post,
        Router,
    };
    use std::sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    };
    use tower::ServiceExt;

    fn identity(groups: &[&str]) -> Identity {
        Identity {
            id: "u1".into(),
            name: "Jane Doe".into(),
            email: "jdoe@example.com".into(),
            username: "jdoe".into(),
            federated_id: "f1".into(),
            federated_groups: groups.iter().map(|g| g.to_string()).collect(),
            accessed_resources: Default::default(),
        }
    }

    /// Gate in front of a handler that records whether it ran. With
    /// `caller` set, the context carries that identity.
    fn gated(state: AppState, caller: Option<Identity>, reached: Arc<AtomicBool>) -> Router {
        let seed = move |mut request: Request, next: Next| {
            let caller = caller.clone();
            async move {
                let mut ctx = RequestContext::new("");
                ctx.identity = caller;
                request.extensions_mut().insert(ctx);
                next.run(request).await
            }
        };

        Router::new()
            .route(
                "/",
                post(move || {
                    let reached = reached.clone();
                    async move {
                        reached.store(true, Ordering::SeqCst);
                        StatusCode::OK
                    }
                }),
            )
            .route_layer(from_fn_with_state(state.clone(), require_admin))
            .route_layer(from_fn(seed))
            .with_state(state)
    }

    async fn call(router: Router) -> StatusCode {
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::empty())
            .unwrap();
        router.oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn missing_identity_fails_without_calling_the_handler() {
        let reached = Arc::new(AtomicBool::new(false));
        let router = gated(AppState::for_tests(&[]), None, reached.clone());

        assert_eq!(call(router).await, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!reached.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn any_identity_is_forwarded_without_an_admin_role() {
        let state = AppState::for_tests(&[]);
        assert_eq!(state.admin_role, None);
        let reached = Arc::new(AtomicBool::new(false));
        let router = gated(state, Some(identity(&[])), reached.clone());

        assert_eq!(call(router).await, StatusCode::OK);
        assert!(reached.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn configured_role_is_required() {
        let state = AppState::for_tests(&[("AUTH_ADMIN_ROLE", "catalog-admin")]);

        let reached = Arc::new(AtomicBool::new(false));
        let router = gated(state.clone(), Some(identity(&["reader"])), reached.clone());
        assert_eq!(call(router).await, StatusCode::FORBIDDEN);
        assert!(!reached.load(Ordering::SeqCst));

        let reached = Arc::new(AtomicBool::new(false));
        let router = gated(state, Some(identity(&["catalog-admin"])), reached.clone());
        assert_eq!(call(router).await, StatusCode::OK);
        assert!(reached.load(Ordering::SeqCst));
    }
}
