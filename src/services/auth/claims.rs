use serde::Deserialize;

use super::error::AuthError;

/// Verified access-token claims.
///
/// NOTE:
/// - `aud` in a JWT can be either a string or an array; `jsonwebtoken`
///   validates it via `Validation::set_audience`, so we keep the raw value.
/// - `permissions` defaults to empty when the claim is absent, so the
///   permission check below stays total and fails closed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub sub: String,
    #[serde(default)]
    pub aud: serde_json::Value,

    pub exp: u64,
    #[serde(default)]
    pub iat: Option<u64>,

    #[serde(default)]
    pub permissions: Vec<String>,
}

impl Claims {
    /// Exact, case-sensitive membership check. No wildcard matching.
    pub fn require_permission(&self, permission: &str) -> Result<(), AuthError> {
        if self.permissions.iter().any(|p| p == permission) {
            Ok(())
        } else {
            Err(AuthError::PermissionNotFound)
        }
    }
}
