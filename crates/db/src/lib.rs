//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - The public-schema migration and per-tenant schema DDL
//! - Schema-scoped transactions
//! - Repositories for the ledger, vouchers, reports and the tenant registry
//! - A cached host resolver

pub mod entities;
pub mod error;
pub mod migration;
pub mod repositories;
pub mod resolver;
pub mod schema;

pub use error::RepositoryError;
pub use repositories::{JournalRepository, LedgerRepository, ReportRepository, TenantRepository};
pub use resolver::TenantResolver;
pub use schema::TenantConnection;

use std::time::Duration;

use mizan_shared::config::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a pooled connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .sqlx_logging(false);
    Database::connect(options).await
}
