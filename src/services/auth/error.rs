use axum::http::StatusCode;
use thiserror::Error;

/// Terminal authorization failure.
///
/// Every verification stage fails fast with one of these; the middleware
/// propagates it unchanged and the error boundary renders it. Descriptions are
/// fixed strings so no underlying crypto/library detail leaks to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("authorization header is expected")]
    AuthorizationHeaderMissing,

    #[error("authorization header must be of the form 'Bearer <token>'")]
    InvalidHeaderFormat,

    #[error("unable to parse authentication token")]
    MalformedToken,

    #[error("unable to fetch signing keys")]
    KeySetUnavailable,

    #[error("unable to find an appropriate signing key")]
    SigningKeyNotFound,

    #[error("token signature verification failed")]
    InvalidSignature,

    #[error("token is expired")]
    TokenExpired,

    #[error("incorrect audience claim")]
    InvalidAudience,

    #[error("incorrect issuer claim")]
    InvalidIssuer,

    #[error("permission not found")]
    PermissionNotFound,
}

impl AuthError {
    /// Machine-readable code, stable across description changes.
    pub fn code(&self) -> &'static str {
        match self {
            Self::AuthorizationHeaderMissing => "authorization_header_missing",
            Self::InvalidHeaderFormat => "invalid_header_format",
            Self::MalformedToken => "malformed_token",
            Self::KeySetUnavailable => "key_set_unavailable",
            Self::SigningKeyNotFound => "signing_key_not_found",
            Self::InvalidSignature => "invalid_signature",
            Self::TokenExpired => "token_expired",
            Self::InvalidAudience => "invalid_audience",
            Self::InvalidIssuer => "invalid_issuer",
            Self::PermissionNotFound => "permission_not_found",
        }
    }

    /// 403 only for a valid identity lacking the required capability;
    /// every authentication failure is 401.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::PermissionNotFound => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}
