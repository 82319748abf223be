//! Tenant routing and provisioning errors.

use thiserror::Error;

/// Errors raised while routing a request to a tenant or creating one.
#[derive(Debug, Error)]
pub enum TenantError {
    /// The host does not belong to any workspace and fallback is disabled.
    #[error("No workspace is registered for host '{0}'")]
    UnknownTenant(String),

    /// A tenant-private resource was requested in the public context.
    #[error("This resource is only available inside a workspace")]
    PublicSchemaAccessDenied,

    /// A registration/lookup endpoint was called from inside a workspace.
    #[error("This resource is only available on the public site")]
    PublicEndpointOnly,

    /// Schema identifier already in use.
    #[error("This workspace name is already taken: {0}")]
    DuplicateWorkspace(String),

    /// Hostname already mapped to a tenant.
    #[error("Domain '{0}' is already registered")]
    DuplicateDomain(String),

    /// Schema identifier rejected.
    #[error("Invalid workspace identifier '{name}': {reason}")]
    InvalidSchemaName {
        /// Rejected identifier.
        name: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Hostname rejected.
    #[error("Invalid host '{0}'")]
    InvalidHost(String),

    /// Other malformed input.
    #[error("{0}")]
    Validation(String),

    /// Verification token or tenant not found.
    #[error("{0}")]
    NotFound(String),

    /// Creating the workspace failed; partial state was cleaned up.
    #[error("Workspace provisioning failed: {0}")]
    Provisioning(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl TenantError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownTenant(_) => "UNKNOWN_TENANT",
            Self::PublicSchemaAccessDenied => "PUBLIC_SCHEMA_ACCESS_DENIED",
            Self::PublicEndpointOnly => "PUBLIC_ENDPOINT_ONLY",
            Self::DuplicateWorkspace(_) => "DUPLICATE_WORKSPACE",
            Self::DuplicateDomain(_) => "DUPLICATE_DOMAIN",
            Self::InvalidSchemaName { .. } => "INVALID_WORKSPACE_IDENTIFIER",
            Self::InvalidHost(_) => "INVALID_HOST",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Provisioning(_) => "PROVISIONING_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidSchemaName { .. } | Self::InvalidHost(_) | Self::Validation(_) => 400,
            Self::PublicSchemaAccessDenied | Self::PublicEndpointOnly => 403,
            Self::UnknownTenant(_) | Self::NotFound(_) => 404,
            Self::DuplicateWorkspace(_) | Self::DuplicateDomain(_) => 409,
            Self::Provisioning(_) | Self::Database(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(TenantError::UnknownTenant("x".into()).http_status_code(), 404);
        assert_eq!(TenantError::PublicSchemaAccessDenied.http_status_code(), 403);
        assert_eq!(TenantError::DuplicateWorkspace("x".into()).http_status_code(), 409);
        assert_eq!(TenantError::Provisioning("x".into()).http_status_code(), 500);
        assert_eq!(
            TenantError::InvalidSchemaName {
                name: "x".into(),
                reason: "r"
            }
            .http_status_code(),
            400
        );
    }

    #[test]
    fn test_duplicate_message() {
        assert_eq!(
            TenantError::DuplicateWorkspace("masjid_noor".into()).to_string(),
            "This workspace name is already taken: masjid_noor"
        );
    }
}
