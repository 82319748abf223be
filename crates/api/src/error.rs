//! Error responses.
//!
//! Every failure leaves a handler as an [`ApiError`] rendered as
//! `{"error": {"code": "...", "message": "..."}}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mizan_core::ledger::LedgerError;
use mizan_core::tenant::TenantError;
use mizan_db::RepositoryError;
use mizan_shared::AppError;
use serde_json::json;
use tracing::error;

/// An error on its way to the client.
#[derive(Debug)]
pub struct ApiError {
    error: AppError,
    code: &'static str,
}

impl ApiError {
    /// The HTTP status of the response.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// The machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }

    /// Shorthand for a 400 with `VALIDATION_ERROR`.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into()).into()
    }

    fn client_message(&self) -> String {
        match &self.error {
            AppError::Provisioning(_) => "Workspace could not be created".to_string(),
            AppError::Database(_) | AppError::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        Self {
            code: error.error_code(),
            error,
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        Self {
            code: err.error_code(),
            error: classify(&err),
        }
    }
}

impl From<TenantError> for ApiError {
    fn from(err: TenantError) -> Self {
        RepositoryError::Tenant(err).into()
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        RepositoryError::Ledger(err).into()
    }
}

/// Folds a repository error into the boundary taxonomy.
fn classify(err: &RepositoryError) -> AppError {
    let message = err.to_string();
    match err {
        RepositoryError::Ledger(LedgerError::Compliance(_)) => AppError::Compliance(message),
        RepositoryError::Ledger(LedgerError::UnbalancedEntry { .. }) => AppError::Unbalanced(message),
        RepositoryError::Ledger(e) if e.is_finalization() => AppError::Finalized(message),
        RepositoryError::Ledger(
            LedgerError::SystemAccount(_)
            | LedgerError::AccountHasPostings { .. }
            | LedgerError::AccountInactive(_)
            | LedgerError::HierarchyCycle(_)
            | LedgerError::HierarchyTooDeep { .. },
        ) => AppError::BusinessRule(message),
        RepositoryError::Tenant(TenantError::UnknownTenant(_)) => AppError::UnknownTenant(message),
        RepositoryError::Tenant(TenantError::Provisioning(_)) => AppError::Provisioning(message),
        RepositoryError::Database(_) => AppError::Database(message),
        other => match other.http_status_code() {
            400 => AppError::Validation(message),
            403 => AppError::Forbidden(message),
            404 => AppError::NotFound(message),
            409 => AppError::Conflict(message),
            _ => AppError::Internal(message),
        },
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.error.is_server_error() {
            error!(code = self.code, error = %self.error, "Request failed");
        }
        let body = json!({
            "error": {
                "code": self.code,
                "message": self.client_message(),
            }
        });
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mizan_core::ledger::ComplianceViolation;
    use mizan_shared::types::{JournalEntryId, LedgerId};
    use rstest::rstest;
    use rust_decimal::Decimal;

    #[rstest]
    #[case(LedgerError::UnbalancedEntry { debit: Decimal::ONE_HUNDRED, credit: Decimal::TEN }, 400, "UNBALANCED_ENTRY")]
    #[case(LedgerError::AlreadyFinalized(JournalEntryId::new()), 400, "ALREADY_FINALIZED")]
    #[case(LedgerError::CannotModifyFinalized(JournalEntryId::new()), 400, "ENTRY_FINALIZED")]
    #[case(LedgerError::SystemAccount(LedgerId::new()), 400, "SYSTEM_ACCOUNT")]
    #[case(LedgerError::AccountNotFound(LedgerId::new()), 404, "ACCOUNT_NOT_FOUND")]
    #[case(LedgerError::DuplicateCode("1100".into()), 409, "DUPLICATE_ACCOUNT_CODE")]
    fn test_ledger_errors(#[case] err: LedgerError, #[case] status: u16, #[case] code: &str) {
        let api: ApiError = err.into();
        assert_eq!(api.status().as_u16(), status);
        assert_eq!(api.code(), code);
    }

    #[rstest]
    #[case(TenantError::UnknownTenant("ghost.localhost".into()), 404)]
    #[case(TenantError::PublicSchemaAccessDenied, 403)]
    #[case(TenantError::PublicEndpointOnly, 403)]
    #[case(TenantError::DuplicateWorkspace("noor".into()), 409)]
    #[case(TenantError::InvalidHost("bad host".into()), 400)]
    #[case(TenantError::Provisioning("disk full".into()), 500)]
    fn test_tenant_errors(#[case] err: TenantError, #[case] status: u16) {
        let code = err.error_code();
        let api: ApiError = err.into();
        assert_eq!(api.status().as_u16(), status);
        assert_eq!(api.code(), code);
    }

    #[test]
    fn test_compliance_message_reaches_client() {
        let violation = ComplianceViolation::PanRequired {
            amount: Decimal::from(5000),
            threshold: Decimal::from(2000),
        };
        let api: ApiError = LedgerError::Compliance(violation).into();
        assert!(matches!(api.error, AppError::Compliance(_)));
        assert!(api.client_message().contains("PAN"));
    }

    #[test]
    fn test_server_errors_are_masked() {
        let api: ApiError = TenantError::Provisioning("relation users already exists".into()).into();
        assert!(!api.client_message().contains("relation"));
        let api: ApiError = RepositoryError::Database(sea_orm::DbErr::Custom("secret".into())).into();
        assert_eq!(api.client_message(), "An internal error occurred");
    }
}
