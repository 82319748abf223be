//! Repository error type.

use mizan_core::ledger::LedgerError;
use mizan_core::reports::ReportError;
use mizan_core::tenant::TenantError;
use sea_orm::{DbErr, SqlErr};

/// Errors returned by the repositories.
///
/// Domain failures keep their `mizan-core` type so callers map them the
/// same way with or without a database in between.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Ledger rule violated.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Report input rejected.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// Tenancy rule violated.
    #[error(transparent)]
    Tenant(#[from] TenantError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl RepositoryError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Ledger(e) => e.error_code(),
            Self::Report(e) => e.error_code(),
            Self::Tenant(e) => e.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Ledger(e) => e.http_status_code(),
            Self::Report(e) => e.http_status_code(),
            Self::Tenant(e) => e.http_status_code(),
            Self::Database(_) => 500,
        }
    }

    /// Returns true if retrying the operation may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Ledger(e) => e.is_retryable(),
            Self::Database(e) => is_serialization_failure(e),
            Self::Report(_) | Self::Tenant(_) => false,
        }
    }
}

/// Name of the violated unique constraint, if that is what failed.
pub(crate) fn unique_violation(err: &DbErr) -> Option<String> {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => Some(detail),
        _ => None,
    }
}

fn is_serialization_failure(err: &DbErr) -> bool {
    let text = err.to_string();
    text.contains("could not serialize access") || text.contains("deadlock detected")
}
