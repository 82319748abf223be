//! Tenant registry and provisioning.
//!
//! `tenants` and `domains` live in `public`. Provisioning creates the
//! registry rows, the tenant schema, its tables, the default chart and the
//! administrator in one transaction. PostgreSQL DDL is transactional, so a
//! failure rolls everything back; a best-effort cleanup then removes anything
//! a partially committed attempt may have left.
//!
//! Attempts on the same schema name are serialized by a transaction-scoped
//! advisory lock, and availability is checked again under it. Cleanup never
//! drops a schema that another tenant has registered.

use std::collections::HashMap;

use chrono::Utc;
use mizan_core::auth::{UserRole, hash_password};
use mizan_core::ledger::SeedAccount;
use mizan_core::tenant::{ProvisionPlan, SchemaName, TenantContext, TenantError};
use mizan_shared::types::{LedgerId, TenantId, UserId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbBackend, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, Statement,
    TransactionTrait,
};
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::entities::{domains, ledgers, tenants, users};
use crate::error::{RepositoryError, unique_violation};
use crate::migration::tenant_schema::{create_tenant_schema, drop_schema_sql};

const SCHEMA_EXISTS_SQL: &str = "SELECT 1 AS found FROM pg_namespace WHERE nspname = $1";
const SCHEMA_LOCK_SQL: &str = "SELECT pg_advisory_xact_lock(hashtext($1))";

/// A freshly provisioned workspace.
#[derive(Debug, Clone, Serialize)]
pub struct ProvisionedTenant {
    /// Tenant ID.
    pub tenant_id: TenantId,
    /// Display name.
    pub name: String,
    /// Schema identifier.
    pub schema_name: String,
    /// Primary hostname.
    pub domain: String,
    /// Administrator username.
    pub admin_username: String,
    /// E-mail verification token.
    #[serde(skip_serializing)]
    pub verification_token: Uuid,
}

/// A workspace found by owner e-mail.
#[derive(Debug, Clone, Serialize)]
pub struct WorkspaceSummary {
    /// Display name.
    pub name: String,
    /// Primary hostname.
    pub domain: String,
    /// Whether the owner confirmed their e-mail.
    pub is_email_verified: bool,
}

/// Tenant registry repository.
#[derive(Debug, Clone)]
pub struct TenantRepository {
    db: DatabaseConnection,
}

impl TenantRepository {
    /// Creates a new tenant repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a workspace from a validated plan.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateWorkspace` / `DuplicateDomain` if the schema or host
    /// is taken (checked before anything is created), and `Provisioning` if
    /// any later step fails. After a failure neither registry rows nor the
    /// schema remain.
    pub async fn provision(
        &self,
        plan: &ProvisionPlan,
        admin_password: &str,
    ) -> Result<ProvisionedTenant, RepositoryError> {
        ensure_available(&self.db, plan).await?;
        let password_hash =
            hash_password(admin_password).map_err(|e| TenantError::Provisioning(e.to_string()))?;

        match self.provision_in_transaction(plan, &password_hash).await {
            Ok(provisioned) => {
                info!(
                    tenant_id = %plan.tenant_id,
                    schema = %plan.schema,
                    domain = %plan.domain,
                    "Tenant provisioned"
                );
                Ok(provisioned)
            }
            Err(RepositoryError::Database(err)) => {
                error!(schema = %plan.schema, error = %err, "Tenant provisioning failed");
                self.cleanup(plan).await;
                if let Some(detail) = unique_violation(&err) {
                    warn!(schema = %plan.schema, %detail, "Workspace claimed concurrently");
                    if detail.contains("domain") {
                        return Err(TenantError::DuplicateDomain(plan.domain.clone()).into());
                    }
                    return Err(TenantError::DuplicateWorkspace(plan.schema.to_string()).into());
                }
                Err(TenantError::Provisioning(err.to_string()).into())
            }
            Err(taken) => {
                warn!(schema = %plan.schema, error = %taken, "Workspace claimed concurrently");
                Err(taken)
            }
        }
    }

    /// Maps a normalized host to its workspace.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored schema name is
    /// invalid.
    pub async fn find_by_host(&self, host: &str) -> Result<Option<TenantContext>, RepositoryError> {
        let found = domains::Entity::find()
            .filter(domains::Column::Domain.eq(host))
            .find_also_related(tenants::Entity)
            .one(&self.db)
            .await?;

        match found {
            Some((_, Some(tenant))) => Ok(Some(TenantContext {
                tenant_id: TenantId::from_uuid(tenant.id),
                schema: SchemaName::parse(&tenant.schema_name)?,
                name: tenant.name,
            })),
            _ => Ok(None),
        }
    }

    /// Workspaces owned by an e-mail address, matched case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn find_by_owner_email(
        &self,
        email: &str,
    ) -> Result<Vec<WorkspaceSummary>, RepositoryError> {
        let email = email.trim().to_lowercase();
        let rows = tenants::Entity::find()
            .filter(tenants::Column::OwnerEmail.eq(email))
            .find_with_related(domains::Entity)
            .order_by_asc(tenants::Column::Name)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(tenant, domains)| {
                let primary = domains
                    .iter()
                    .find(|d| d.is_primary)
                    .or_else(|| domains.first())?;
                Some(WorkspaceSummary {
                    name: tenant.name,
                    domain: primary.domain.clone(),
                    is_email_verified: tenant.is_email_verified,
                })
            })
            .collect())
    }

    /// Confirms the owner's e-mail for the tenant holding `token`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no tenant holds the token.
    pub async fn verify_email(&self, token: Uuid) -> Result<tenants::Model, RepositoryError> {
        let tenant = tenants::Entity::find()
            .filter(tenants::Column::VerificationToken.eq(token))
            .one(&self.db)
            .await?
            .ok_or_else(|| TenantError::NotFound("Invalid or expired verification token".into()))?;

        let mut active: tenants::ActiveModel = tenant.into();
        active.is_email_verified = Set(true);
        active.verification_token = Set(None);
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&self.db).await?;

        info!(tenant_id = %updated.id, "Owner e-mail verified");
        Ok(updated)
    }

    async fn provision_in_transaction(
        &self,
        plan: &ProvisionPlan,
        password_hash: &str,
    ) -> Result<ProvisionedTenant, RepositoryError> {
        let txn = self.db.begin().await?;
        txn.execute(Statement::from_sql_and_values(
            DbBackend::Postgres,
            SCHEMA_LOCK_SQL,
            [plan.schema.as_str().into()],
        ))
        .await?;
        ensure_available(&txn, plan).await?;

        let now = Utc::now().into();

        tenants::ActiveModel {
            id: Set(plan.tenant_id.into_inner()),
            name: Set(plan.name.clone()),
            schema_name: Set(plan.schema.to_string()),
            owner_email: Set(plan.owner_email.clone()),
            is_email_verified: Set(false),
            verification_token: Set(Some(plan.verification_token)),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        domains::ActiveModel {
            id: Set(Uuid::new_v4()),
            domain: Set(plan.domain.clone()),
            tenant_id: Set(plan.tenant_id.into_inner()),
            is_primary: Set(true),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;

        create_tenant_schema(&txn, &plan.schema).await?;
        seed_chart(&txn, plan.chart).await?;

        users::ActiveModel {
            id: Set(UserId::new().into_inner()),
            username: Set(plan.admin_username.to_string()),
            email: Set(plan.owner_email.clone()),
            password_hash: Set(password_hash.to_string()),
            full_name: Set(None),
            role: Set(UserRole::Admin.into()),
            is_active: Set(true),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        Ok(ProvisionedTenant {
            tenant_id: plan.tenant_id,
            name: plan.name.clone(),
            schema_name: plan.schema.to_string(),
            domain: plan.domain.clone(),
            admin_username: plan.admin_username.to_string(),
            verification_token: plan.verification_token,
        })
    }

    /// Removes whatever a failed provisioning left behind.
    async fn cleanup(&self, plan: &ProvisionPlan) {
        let claimed_elsewhere = tenants::Entity::find()
            .filter(tenants::Column::SchemaName.eq(plan.schema.as_str()))
            .filter(tenants::Column::Id.ne(plan.tenant_id.into_inner()))
            .count(&self.db)
            .await;
        match claimed_elsewhere {
            Ok(0) => {
                if let Err(e) = self.db.execute_unprepared(&drop_schema_sql(&plan.schema)).await {
                    error!(schema = %plan.schema, error = %e, "Failed to drop schema during cleanup");
                }
            }
            Ok(_) => {
                warn!(schema = %plan.schema, "Schema belongs to another tenant, leaving it in place");
            }
            Err(e) => {
                error!(schema = %plan.schema, error = %e, "Failed to check schema owner during cleanup");
            }
        }
        match tenants::Entity::delete_by_id(plan.tenant_id.into_inner())
            .exec(&self.db)
            .await
        {
            Ok(result) if result.rows_affected > 0 => {
                warn!(tenant_id = %plan.tenant_id, "Removed registry row during cleanup");
            }
            Ok(_) => {}
            Err(e) => {
                error!(tenant_id = %plan.tenant_id, error = %e, "Failed to remove registry row during cleanup");
            }
        }
    }
}

/// Rejects a plan whose schema or host is already in use.
async fn ensure_available<C>(conn: &C, plan: &ProvisionPlan) -> Result<(), RepositoryError>
where
    C: ConnectionTrait,
{
    let schema_taken = tenants::Entity::find()
        .filter(tenants::Column::SchemaName.eq(plan.schema.as_str()))
        .count(conn)
        .await?
        > 0;
    if schema_taken || schema_exists(conn, &plan.schema).await? {
        return Err(TenantError::DuplicateWorkspace(plan.schema.to_string()).into());
    }

    let domain_taken = domains::Entity::find()
        .filter(domains::Column::Domain.eq(plan.domain.as_str()))
        .count(conn)
        .await?
        > 0;
    if domain_taken {
        return Err(TenantError::DuplicateDomain(plan.domain.clone()).into());
    }
    Ok(())
}

async fn schema_exists<C>(conn: &C, schema: &SchemaName) -> Result<bool, DbErr>
where
    C: ConnectionTrait,
{
    let statement = Statement::from_sql_and_values(
        DbBackend::Postgres,
        SCHEMA_EXISTS_SQL,
        [schema.as_str().into()],
    );
    Ok(conn.query_one(statement).await?.is_some())
}

/// Inserts the system ledgers. Parents precede children in `chart`.
async fn seed_chart(txn: &DatabaseTransaction, chart: &[SeedAccount]) -> Result<(), DbErr> {
    let now = Utc::now().into();
    let mut ids: HashMap<&str, Uuid> = HashMap::with_capacity(chart.len());

    for seed in chart {
        let parent_id = match seed.parent_code {
            Some(code) => Some(
                *ids.get(code)
                    .ok_or_else(|| DbErr::Custom(format!("seed parent {code} missing for {}", seed.code)))?,
            ),
            None => None,
        };
        let id = LedgerId::new().into_inner();
        ledgers::ActiveModel {
            id: Set(id),
            code: Set(seed.code.to_string()),
            name: Set(seed.name.to_string()),
            account_type: Set(seed.account_type.into()),
            fund_type: Set(seed.fund_type.map(Into::into)),
            parent_id: Set(parent_id),
            is_system: Set(true),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(txn)
        .await?;
        ids.insert(seed.code, id);
    }
    Ok(())
}
