/*
 * Responsibility
 * - Config load -> dependency construction -> Router assembly
 * - Middleware application (CORS, HTTP plumbing)
 * - axum::serve() startup
 */
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use crate::{
    api,
    config::Config,
    middleware,
    services::auth::{
        TokenVerifier,
        jwks::{HttpJwksFetcher, KeyStore},
    },
    state::AppState,
};

pub async fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let db = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    let fetcher = HttpJwksFetcher::new(
        config.auth_jwks_url.clone(),
        Duration::from_secs(config.jwks_fetch_timeout_seconds),
    )?;
    let verifier = TokenVerifier::new(
        KeyStore::new(Arc::new(fetcher)),
        &config.auth_issuer,
        &config.auth_audience,
        config.access_token_leeway_seconds,
    );

    let state = AppState::new(db, Arc::new(verifier));
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, issuer = %config.auth_issuer, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::routes(state.clone()))
        .with_state(state);

    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router)
}
