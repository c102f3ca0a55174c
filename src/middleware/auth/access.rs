//! Per-route authorization gate.
//!
//! Bound to a route with a static required-permission string (see
//! `api::v1::routes`), it runs extract -> verify -> permission check in
//! order, failing fast; on success the verified [`Claims`] are inserted into
//! the request extensions for the handler's extractor. The gate never builds
//! HTTP responses itself; failures surface as [`AppError`] and are rendered
//! by the error boundary.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::services::auth::token;
use crate::state::AppState;

pub async fn authorize(
    State(state): State<AppState>,
    permission: &'static str,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = token::extract_bearer(req.headers())?.to_owned();

    let claims = match state.auth.verify(&token).await {
        Ok(claims) => claims,
        Err(err) => {
            tracing::warn!(error = %err, code = err.code(), "token verification failed");
            return Err(err.into());
        }
    };

    if let Err(err) = claims.require_permission(permission) {
        tracing::warn!(sub = %claims.sub, permission, "permission denied");
        return Err(err.into());
    }

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::v1::extractors::AuthClaims;
    use crate::services::auth::test_support;
    use axum::{
        Json, Router,
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        middleware,
        routing::get,
    };
    use serde_json::{Value, json};
    use sqlx::postgres::PgPoolOptions;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    static PROBE_CALLS: AtomicUsize = AtomicUsize::new(0);

    async fn probe(AuthClaims(claims): AuthClaims) -> Json<Value> {
        PROBE_CALLS.fetch_add(1, Ordering::SeqCst);
        Json(json!({ "sub": claims.sub, "permissions": claims.permissions }))
    }

    fn test_state() -> AppState {
        // The pool is lazy; these tests never touch the database.
        let db = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        AppState::new(db, Arc::new(test_support::verifier()))
    }

    fn app() -> Router {
        let state = test_state();
        Router::new()
            .route(
                "/drinks-detail",
                get(probe).route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    |state: State<AppState>, req: Request, next: Next| {
                        authorize(state, "get:drinks-detail", req, next)
                    },
                )),
            )
            .with_state(state)
    }

    async fn call(request: HttpRequest<Body>) -> (StatusCode, Value) {
        let res = app().oneshot(request).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn request(authorization: Option<String>) -> HttpRequest<Body> {
        let builder = HttpRequest::builder().uri("/drinks-detail");
        let builder = match authorization {
            Some(value) => builder.header("authorization", value),
            None => builder,
        };
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn missing_header_is_rejected_with_401() {
        let (status, body) = call(request(None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error"], json!(401));
        assert_eq!(body["message"], json!("authorization header is expected"));
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_rejected_with_401() {
        let (status, body) = call(request(Some("Basic abc".into()))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], json!(401));
    }

    #[tokio::test]
    async fn garbage_token_is_rejected_with_401() {
        let (status, body) = call(request(Some("Bearer not.a.token".into()))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], json!(false));
    }

    #[tokio::test]
    async fn valid_token_without_the_required_permission_is_403() {
        let token = test_support::sign(&test_support::claims_json(&["post:drinks"]));
        let (status, body) = call(request(Some(format!("Bearer {token}")))).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], json!(403));
        assert_eq!(body["message"], json!("permission not found"));
    }

    // Single test owns the handler-invocation counter so parallel tests
    // cannot skew it.
    #[tokio::test]
    async fn handler_runs_exactly_once_and_only_after_full_authorization() {
        let before = PROBE_CALLS.load(Ordering::SeqCst);

        // Rejected at the permission stage: handler untouched.
        let token = test_support::sign(&test_support::claims_json(&[]));
        let (status, _) = call(request(Some(format!("Bearer {token}")))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        // Rejected at the extraction stage: handler untouched.
        let (status, _) = call(request(None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(PROBE_CALLS.load(Ordering::SeqCst), before);

        // Fully authorized: handler runs once, sees the decoded claims, and
        // its response passes through unchanged.
        let token = test_support::sign(&test_support::claims_json(&["get:drinks-detail"]));
        let (status, body) = call(request(Some(format!("Bearer {token}")))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sub"], json!("auth0|test-user"));
        assert_eq!(body["permissions"], json!(["get:drinks-detail"]));
        assert_eq!(PROBE_CALLS.load(Ordering::SeqCst), before + 1);
    }
}
