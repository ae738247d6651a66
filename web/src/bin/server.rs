//! Campus events API server.

use anyhow::Context;
use campus_events_auth::TokenService;
use campus_events_web::{Config, build_router};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level)),
        )
        .init();

    let ttl_seconds = i64::try_from(config.auth.token_ttl).unwrap_or(7 * 24 * 60 * 60);
    let tokens = TokenService::new(
        &config.auth.jwt_secret,
        chrono::Duration::seconds(ttl_seconds),
        config.auth.key_epoch,
    );

    let app = build_app(&config, tokens).await?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "campus events server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

#[cfg(not(feature = "postgres"))]
async fn build_app(_config: &Config, tokens: TokenService) -> anyhow::Result<axum::Router> {
    use campus_events_web::AppState;

    tracing::info!("using in-memory stores");
    Ok(build_router(AppState::in_memory(tokens)))
}

#[cfg(feature = "postgres")]
async fn build_app(config: &Config, tokens: TokenService) -> anyhow::Result<axum::Router> {
    use campus_events_auth::PostgresCredentialStore;
    use campus_events_registry::PostgresRegistry;
    use campus_events_web::AppState;
    use std::sync::Arc;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.postgres.max_connections)
        .connect(&config.postgres.url)
        .await
        .context("failed to connect to postgres")?;

    let credentials = PostgresCredentialStore::new(pool.clone());
    credentials
        .migrate()
        .await
        .context("identity migration failed")?;

    let registry = PostgresRegistry::new(pool);
    registry
        .migrate()
        .await
        .context("registry migration failed")?;

    tracing::info!("using postgres stores");
    Ok(build_router(AppState::new(
        Arc::new(credentials),
        Arc::new(registry),
        tokens,
    )))
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to install shutdown handler");
    }
    tracing::info!("shutting down");
}
