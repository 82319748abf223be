//! Schema-scoped connections.
//!
//! Every tenant query runs inside a transaction whose `search_path` points
//! at the tenant's schema, followed by `public`. The setting is applied with
//! `SET LOCAL`, so it dies with the transaction and a pooled connection can
//! never carry one tenant's path into another tenant's request.
//!
//! # Usage
//!
//! ```ignore
//! use mizan_db::schema::TenantConnection;
//!
//! let conn = TenantConnection::begin(&db, &tenant.schema).await?;
//! let ledgers = ledgers::Entity::find().all(conn.transaction()).await?;
//! conn.commit().await?;
//! ```

use mizan_core::tenant::SchemaName;
use sea_orm::{ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait};

/// A transaction bound to one tenant schema.
pub struct TenantConnection {
    txn: DatabaseTransaction,
    schema: SchemaName,
}

impl TenantConnection {
    /// Begins a transaction and points `search_path` at `schema`.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started or the path
    /// cannot be set.
    pub async fn begin(db: &DatabaseConnection, schema: &SchemaName) -> Result<Self, DbErr> {
        let txn = db.begin().await?;
        set_search_path(&txn, schema).await?;
        Ok(Self {
            txn,
            schema: schema.clone(),
        })
    }

    /// The underlying transaction.
    #[must_use]
    pub fn transaction(&self) -> &DatabaseTransaction {
        &self.txn
    }

    /// The schema this connection is scoped to.
    #[must_use]
    pub fn schema(&self) -> &SchemaName {
        &self.schema
    }

    /// Commits the transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails.
    pub async fn commit(self) -> Result<(), DbErr> {
        self.txn.commit().await
    }

    /// Rolls back the transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the rollback fails.
    pub async fn rollback(self) -> Result<(), DbErr> {
        self.txn.rollback().await
    }
}

/// Points `search_path` at `schema` for the rest of the transaction.
///
/// # Errors
///
/// Returns an error if the statement fails.
pub async fn set_search_path<C>(conn: &C, schema: &SchemaName) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    conn.execute_unprepared(&search_path_sql(schema)).await?;
    Ok(())
}

/// `SET LOCAL search_path` for a validated schema.
#[must_use]
pub fn search_path_sql(schema: &SchemaName) -> String {
    format!("SET LOCAL search_path TO {}, public", schema.quoted())
}
