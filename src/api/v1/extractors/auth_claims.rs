use axum::extract::FromRequestParts;
use axum::http::{StatusCode, request::Parts};

use crate::services::auth::Claims;
use crate::state::AppState;

/// Handler-side view of the verified token payload.
///
/// The authorization gate inserts [`Claims`] into the request extensions
/// before the handler runs; this extractor only hands them over. A missing
/// value means the route was registered without the gate, which is a wiring
/// bug, and we answer 401 rather than running the handler unauthenticated.
pub struct AuthClaims(pub Claims);

impl FromRequestParts<AppState> for AuthClaims {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthClaims)
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}
