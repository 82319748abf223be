//! Application-wide error types.
//!
//! Domain errors from `mizan-core` and `mizan-db` are folded into [`AppError`]
//! at the request boundary. The variants mirror the error classes clients see.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or incomplete input.
    #[error("{0}")]
    Validation(String),

    /// A fund-compliance rule was violated.
    #[error("{0}")]
    Compliance(String),

    /// Debits and credits of a voucher do not match.
    #[error("{0}")]
    Unbalanced(String),

    /// Mutation attempted on a finalized voucher.
    #[error("{0}")]
    Finalized(String),

    /// Business rule violation other than compliance (e.g. protected account).
    #[error("{0}")]
    BusinessRule(String),

    /// Access denied in the current tenant context.
    #[error("{0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// The host does not map to any tenant.
    #[error("{0}")]
    UnknownTenant(String),

    /// Conflict (e.g. workspace identifier already taken).
    #[error("{0}")]
    Conflict(String),

    /// Workspace provisioning failed.
    #[error("{0}")]
    Provisioning(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_)
            | Self::Compliance(_)
            | Self::Unbalanced(_)
            | Self::Finalized(_)
            | Self::BusinessRule(_) => 400,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) | Self::UnknownTenant(_) => 404,
            Self::Conflict(_) => 409,
            Self::Provisioning(_) | Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Compliance(_) => "COMPLIANCE_ERROR",
            Self::Unbalanced(_) => "UNBALANCED_ENTRY",
            Self::Finalized(_) => "FINALIZED_ENTRY",
            Self::BusinessRule(_) => "BUSINESS_RULE_VIOLATION",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::UnknownTenant(_) => "UNKNOWN_TENANT",
            Self::Conflict(_) => "CONFLICT",
            Self::Provisioning(_) => "PROVISIONING_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Server-side failures that should not leak details to clients.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AppError::Validation(String::new()).status_code(), 400);
        assert_eq!(AppError::Compliance(String::new()).status_code(), 400);
        assert_eq!(AppError::Unbalanced(String::new()).status_code(), 400);
        assert_eq!(AppError::Finalized(String::new()).status_code(), 400);
        assert_eq!(AppError::BusinessRule(String::new()).status_code(), 400);
        assert_eq!(AppError::Forbidden(String::new()).status_code(), 403);
        assert_eq!(AppError::NotFound(String::new()).status_code(), 404);
        assert_eq!(AppError::UnknownTenant(String::new()).status_code(), 404);
        assert_eq!(AppError::Conflict(String::new()).status_code(), 409);
        assert_eq!(AppError::Provisioning(String::new()).status_code(), 500);
        assert_eq!(AppError::Database(String::new()).status_code(), 500);
        assert_eq!(AppError::Internal(String::new()).status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::Compliance(String::new()).error_code(),
            "COMPLIANCE_ERROR"
        );
        assert_eq!(
            AppError::Unbalanced(String::new()).error_code(),
            "UNBALANCED_ENTRY"
        );
        assert_eq!(
            AppError::UnknownTenant(String::new()).error_code(),
            "UNKNOWN_TENANT"
        );
        assert_eq!(
            AppError::Provisioning(String::new()).error_code(),
            "PROVISIONING_ERROR"
        );
    }

    #[test]
    fn test_client_errors_keep_message() {
        let err = AppError::Compliance(
            "PAN number is mandatory for donations exceeding ₹2,000".into(),
        );
        assert_eq!(
            err.to_string(),
            "PAN number is mandatory for donations exceeding ₹2,000"
        );
        assert!(!err.is_server_error());
        assert!(AppError::Database("boom".into()).is_server_error());
    }
}
