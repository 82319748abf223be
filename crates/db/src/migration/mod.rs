//! Database migrations.
//!
//! Public-schema migrations are managed using sea-orm-migration. Tenant
//! schemas are created at provisioning time from [`tenant_schema`].

pub use sea_orm_migration::prelude::*;

mod m20260301_000001_tenant_registry;
pub mod tenant_schema;

/// Migrator for running database migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20260301_000001_tenant_registry::Migration)]
    }
}
