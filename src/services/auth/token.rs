/*
 * Responsibility
 * - Bearer scheme parsing of the Authorization header
 * - Token verification: header decode -> key lookup -> signature + standard
 *   claim validation (exp/aud/iss), RS256 only
 */
use axum::http::{HeaderMap, header};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};

use super::claims::Claims;
use super::error::AuthError;
use super::jwks::KeyStore;

/// The only signature algorithms this service honors. A token declaring
/// anything else (`none`, HMAC, ...) is rejected before any key lookup, so a
/// forged header cannot steer verification onto a weaker scheme.
const ALLOWED_ALGORITHMS: &[Algorithm] = &[Algorithm::RS256];

/// Parse the `Authorization` header: exactly two space-separated parts, the
/// first being the `Bearer` scheme (case-insensitive). Pure.
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::AuthorizationHeaderMissing)?;

    let value = value
        .to_str()
        .map_err(|_| AuthError::InvalidHeaderFormat)?;

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None)
            if scheme.eq_ignore_ascii_case("Bearer") && !token.is_empty() =>
        {
            Ok(token)
        }
        _ => Err(AuthError::InvalidHeaderFormat),
    }
}

/// Verifies compact tokens against the cached key set.
pub struct TokenVerifier {
    keys: KeyStore,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(keys: KeyStore, issuer: &str, audience: &str, leeway_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.algorithms = ALLOWED_ALGORITHMS.to_vec();
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.leeway = leeway_seconds;

        Self { keys, validation }
    }

    /// Decode and verify a raw token, returning its claims.
    ///
    /// Stages fail fast in order: malformed header, disallowed algorithm,
    /// missing/unknown `kid` (delegated to the key store, which may refresh
    /// once), signature, then standard claims.
    pub async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header =
            jsonwebtoken::decode_header(token).map_err(|_| AuthError::MalformedToken)?;

        if !ALLOWED_ALGORITHMS.contains(&header.alg) {
            return Err(AuthError::InvalidSignature);
        }

        let kid = header.kid.ok_or(AuthError::MalformedToken)?;
        let jwk = self.keys.key_for(&kid).await?;

        let key = DecodingKey::from_jwk(&jwk).map_err(|err| {
            tracing::warn!(error = %err, kid = %kid, "jwk is not a usable verification key");
            AuthError::SigningKeyNotFound
        })?;

        let data = jsonwebtoken::decode::<Claims>(token, &key, &self.validation)
            .map_err(map_verify_error)?;

        Ok(data.claims)
    }
}

fn map_verify_error(err: jsonwebtoken::errors::Error) -> AuthError {
    use jsonwebtoken::errors::ErrorKind;

    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        ErrorKind::InvalidAudience => AuthError::InvalidAudience,
        ErrorKind::InvalidIssuer => AuthError::InvalidIssuer,
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => AuthError::InvalidSignature,
        // Anything unmapped stays a generic 401.
        _ => AuthError::MalformedToken,
    }
}
