//! Workspace provisioning against a real database.

mod common;

use mizan_core::tenant::TenantError;
use mizan_db::entities::{tenants, users};
use mizan_db::repositories::AccountFilter;
use mizan_db::{LedgerRepository, RepositoryError, TenantConnection, TenantRepository};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

use common::{BASE_DOMAIN, PASSWORD, connect, request, unique_slug};

#[tokio::test]
async fn test_provision_creates_schema_chart_and_admin() {
    let Some(db) = connect().await else { return };
    let repo = TenantRepository::new(db.clone());
    let plan = request(&unique_slug("noor")).plan(BASE_DOMAIN).unwrap();

    let created = repo.provision(&plan, PASSWORD).await.unwrap();
    assert_eq!(created.admin_username, "admin");
    assert_eq!(created.domain, plan.domain);

    let tenant = repo.find_by_host(&plan.domain).await.unwrap().unwrap();
    assert_eq!(tenant.schema, plan.schema);

    let accounts = LedgerRepository::new(db.clone())
        .list(&tenant, AccountFilter::default())
        .await
        .unwrap();
    assert_eq!(accounts.len(), mizan_core::ledger::DEFAULT_CHART.len());
    assert!(accounts.iter().all(|a| a.account.is_system));

    let conn = TenantConnection::begin(&db, &tenant.schema).await.unwrap();
    let admin = users::Entity::find()
        .filter(users::Column::Username.eq("admin"))
        .one(conn.transaction())
        .await
        .unwrap()
        .unwrap();
    conn.commit().await.unwrap();
    assert_eq!(admin.email, plan.owner_email);
    assert!(admin.password_hash.starts_with("$argon2"));
}

#[tokio::test]
async fn test_duplicate_schema_is_rejected_without_changes() {
    let Some(db) = connect().await else { return };
    let repo = TenantRepository::new(db.clone());
    let slug = unique_slug("dup");
    let first = request(&slug).plan(BASE_DOMAIN).unwrap();
    repo.provision(&first, PASSWORD).await.unwrap();

    let before = tenants::Entity::find().count(&db).await.unwrap();

    // Same schema, different host.
    let mut again = request(&format!("{slug}-two"));
    again.schema_name = Some(first.schema.to_string());
    let plan = again.plan(BASE_DOMAIN).unwrap();
    let err = repo.provision(&plan, PASSWORD).await.unwrap_err();
    assert!(matches!(
        err,
        RepositoryError::Tenant(TenantError::DuplicateWorkspace(_))
    ));
    assert_eq!(err.http_status_code(), 409);

    let after = tenants::Entity::find().count(&db).await.unwrap();
    assert_eq!(before, after);
    assert!(repo.find_by_host(&plan.domain).await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_domain_is_rejected() {
    let Some(db) = connect().await else { return };
    let repo = TenantRepository::new(db.clone());
    let slug = unique_slug("host");
    repo.provision(&request(&slug).plan(BASE_DOMAIN).unwrap(), PASSWORD)
        .await
        .unwrap();

    let mut again = request(&slug);
    again.schema_name = Some(unique_slug("other").replace('-', "_"));
    let err = repo
        .provision(&again.plan(BASE_DOMAIN).unwrap(), PASSWORD)
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::Tenant(TenantError::DuplicateDomain(_))));
}

#[tokio::test]
async fn test_lookup_and_verify_email() {
    let Some(db) = connect().await else { return };
    let repo = TenantRepository::new(db.clone());
    let plan = request(&unique_slug("verify")).plan(BASE_DOMAIN).unwrap();
    let created = repo.provision(&plan, PASSWORD).await.unwrap();

    let found = repo
        .find_by_owner_email(&plan.owner_email.to_uppercase())
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].domain, plan.domain);
    assert!(!found[0].is_email_verified);

    let verified = repo.verify_email(created.verification_token).await.unwrap();
    assert!(verified.is_email_verified);
    assert!(verified.verification_token.is_none());

    let err = repo.verify_email(created.verification_token).await.unwrap_err();
    assert_eq!(err.http_status_code(), 404);
}

#[tokio::test]
async fn test_concurrent_claims_on_one_schema_leave_the_winner_intact() {
    let Some(db) = connect().await else { return };
    let repo = TenantRepository::new(db.clone());
    let slug = unique_slug("race");
    let schema = slug.replace('-', "_");

    let mut first = request(&format!("{slug}-a"));
    first.schema_name = Some(schema.clone());
    let mut second = request(&format!("{slug}-b"));
    second.schema_name = Some(schema.clone());
    let plan_a = first.plan(BASE_DOMAIN).unwrap();
    let plan_b = second.plan(BASE_DOMAIN).unwrap();

    let (a, b) = tokio::join!(
        repo.provision(&plan_a, PASSWORD),
        repo.provision(&plan_b, PASSWORD)
    );
    assert_eq!(u8::from(a.is_ok()) + u8::from(b.is_ok()), 1);
    let (winner, loser) = if a.is_ok() { (&plan_a, b) } else { (&plan_b, a) };
    assert!(matches!(
        loser.unwrap_err(),
        RepositoryError::Tenant(TenantError::DuplicateWorkspace(_))
    ));

    let tenant = repo.find_by_host(&winner.domain).await.unwrap().unwrap();
    let accounts = LedgerRepository::new(db.clone())
        .list(&tenant, AccountFilter::default())
        .await
        .unwrap();
    assert_eq!(accounts.len(), mizan_core::ledger::DEFAULT_CHART.len());

    let registered = tenants::Entity::find()
        .filter(tenants::Column::SchemaName.eq(schema))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(registered, 1);
}
