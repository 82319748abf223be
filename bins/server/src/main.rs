//! Mizan API Server
//!
//! Main entry point for the Mizan backend service.

use anyhow::Context;
use sea_orm_migration::MigratorTrait;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mizan_api::{AppState, create_router};
use mizan_db::{connect, migration::Migrator};
use mizan_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mizan=debug,tower_http=debug,sea_orm=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = connect(&config.database).await?;
    info!("Connected to database");

    // Tenant schemas are created at provisioning; only the registry is migrated here.
    Migrator::up(&db, None).await?;
    info!("Public schema up to date");

    info!(
        base_domain = %config.tenancy.base_domain,
        fallback_to_public = config.tenancy.fallback_to_public,
        "Tenant routing configured"
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = create_router(AppState::new(db, config));

    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
