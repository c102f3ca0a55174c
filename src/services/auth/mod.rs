/*
 * Responsibility
 * - Bearer token verification against the identity provider's JWKS
 * - Claims model + permission checks used by the authorization middleware
 */
pub mod claims;
pub mod error;
pub mod jwks;
pub mod token;

#[cfg(test)]
pub mod test_support;

pub use claims::Claims;
pub use error::AuthError;
pub use token::TokenVerifier;
