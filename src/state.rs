/*
 * Responsibility
 * - Shared context bound to the Router (AppState)
 * - Cheap to Clone: pool and verifier are handles
 */
use std::sync::Arc;

use crate::services::auth::TokenVerifier;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub auth: Arc<TokenVerifier>,
}

impl AppState {
    pub fn new(db: sqlx::PgPool, auth: Arc<TokenVerifier>) -> Self {
        Self { db, auth }
    }
}
