//! Public-schema migration runner for Mizan.
//!
//! Only the tenant registry (`tenants`, `domains`) is migrated here; each
//! workspace schema is created when the workspace is provisioned.
//!
//! Usage:
//!   migrator up      - Run all pending migrations
//!   migrator down    - Rollback last migration
//!   migrator status  - Show migration status

use sea_orm_migration::prelude::*;
use mizan_db::migration::Migrator;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // The CLI reads DATABASE_URL and sets up its own tracing.
    cli::run_cli(Migrator).await;
}
