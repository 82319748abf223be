//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes
//! - Host-based tenant resolution middleware
//! - Tenant context extractors
//! - Error responses, the audit log consumer and the mail handoff

pub mod audit;
pub mod error;
pub mod extractors;
pub mod mail;
pub mod middleware;
pub mod routes;

use axum::Router;
use mail::{Mailer, OutboxMailer};
use mizan_core::ledger::ComplianceRules;
use mizan_db::TenantResolver;
use mizan_shared::AppConfig;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Loaded configuration.
    pub config: Arc<AppConfig>,
    /// Cached host resolver.
    pub resolver: TenantResolver,
    /// Compliance rules applied when posting.
    pub rules: Arc<ComplianceRules>,
    /// Outbound mail.
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    /// Builds the state from a connection and configuration.
    #[must_use]
    pub fn new(db: DatabaseConnection, config: AppConfig) -> Self {
        let resolver = TenantResolver::from_config(db.clone(), &config.tenancy);
        let rules = ComplianceRules::from_config(&config.compliance);
        Self {
            db: Arc::new(db),
            config: Arc::new(config),
            resolver,
            rules: Arc::new(rules),
            mailer: Arc::new(OutboxMailer),
        }
    }

    /// Replaces the mail handoff.
    #[must_use]
    pub fn with_mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = mailer;
        self
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::routes())
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
