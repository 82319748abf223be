//! Shared setup for database integration tests.
//!
//! Tests run only when `DATABASE_URL` points at a PostgreSQL instance the
//! test user may create schemas in; otherwise they return early.

#![allow(dead_code)]

use mizan_core::ledger::ComplianceRules;
use mizan_core::tenant::{ProvisionRequest, TenantContext};
use mizan_db::migration::Migrator;
use mizan_db::repositories::AccountFilter;
use mizan_db::{LedgerRepository, TenantRepository};
use mizan_shared::types::LedgerId;
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;
use tokio::sync::OnceCell;
use uuid::Uuid;

pub const BASE_DOMAIN: &str = "mizan.test";
pub const PASSWORD: &str = "bismillah-123";

static MIGRATED: OnceCell<()> = OnceCell::const_new();

/// Connects and applies the registry migration once per test binary.
pub async fn connect() -> Option<DatabaseConnection> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping");
        return None;
    };
    let db = Database::connect(&url).await.expect("Failed to connect");
    MIGRATED
        .get_or_init(|| async {
            Migrator::up(&db, None).await.expect("Failed to migrate");
        })
        .await;
    Some(db)
}

/// A unique workspace slug.
pub fn unique_slug(prefix: &str) -> String {
    format!("{prefix}-{}", &Uuid::new_v4().simple().to_string()[..10])
}

pub fn request(slug: &str) -> ProvisionRequest {
    ProvisionRequest {
        name: format!("Masjid {slug}"),
        schema_name: None,
        domain: slug.to_string(),
        admin_email: format!("{slug}@example.org"),
        admin_password: PASSWORD.to_string(),
    }
}

/// Provisions a fresh workspace and resolves it by its domain.
pub async fn provision(db: &DatabaseConnection, prefix: &str) -> TenantContext {
    let req = request(&unique_slug(prefix));
    let plan = req.plan(BASE_DOMAIN).expect("Invalid plan");
    let repo = TenantRepository::new(db.clone());
    repo.provision(&plan, PASSWORD)
        .await
        .expect("Failed to provision");
    repo.find_by_host(&plan.domain)
        .await
        .expect("Lookup failed")
        .expect("Provisioned host not found")
}

/// ID of a seeded ledger by code.
pub async fn ledger(db: &DatabaseConnection, tenant: &TenantContext, code: &str) -> LedgerId {
    LedgerRepository::new(db.clone())
        .list(tenant, AccountFilter::default())
        .await
        .expect("Failed to list accounts")
        .into_iter()
        .find(|a| a.account.code == code)
        .map(|a| a.account.id)
        .expect("Seed ledger missing")
}

pub fn rules() -> Arc<ComplianceRules> {
    Arc::new(ComplianceRules::default())
}
