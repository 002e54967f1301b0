use anyhow::Context;
use std::sync::Arc;

use product_catalog_api::{
    app::app,
    config::AppConfig,
    database::{DatabaseManager, PgProductRepository},
    state::AppState,
    telemetry,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so local runs pick up DB_* and JWT_* settings
    let _ = dotenvy::dotenv();

    let config = AppConfig::from_env().context("failed to load configuration")?;
    telemetry::init(&config.logging);
    tracing::info!("Starting product catalog in {:?} mode", config.environment);

    let database = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to the product store")?;
    if config.database.auto_migrate {
        database.migrate().await.context("failed to apply product schema")?;
    }

    let store = Arc::new(PgProductRepository::new(database.pool().clone()));
    let state = AppState::new(&config, store);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    database.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("shutdown signal received");
}
