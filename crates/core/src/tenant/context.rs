//! Resolved request context.
//!
//! Every tenant-scoped operation takes a [`TenantContext`] explicitly; there
//! is no ambient "current schema".

use mizan_shared::types::TenantId;
use serde::Serialize;

use super::error::TenantError;
use super::schema::SchemaName;

/// The workspace a request was routed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TenantContext {
    /// Tenant ID.
    pub tenant_id: TenantId,
    /// Schema holding the workspace's data.
    pub schema: SchemaName,
    /// Display name.
    pub name: String,
}

/// Where a request runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestContext {
    /// Registration and lookup only; never sees ledger data.
    Public,
    /// Inside one workspace.
    Tenant(TenantContext),
}

impl RequestContext {
    /// True for the public context.
    #[must_use]
    pub const fn is_public(&self) -> bool {
        matches!(self, Self::Public)
    }

    /// The workspace, for tenant-private resources.
    ///
    /// # Errors
    ///
    /// Returns `PublicSchemaAccessDenied` in the public context.
    pub fn require_tenant(&self) -> Result<&TenantContext, TenantError> {
        match self {
            Self::Tenant(ctx) => Ok(ctx),
            Self::Public => Err(TenantError::PublicSchemaAccessDenied),
        }
    }

    /// Guards registration and lookup endpoints.
    ///
    /// # Errors
    ///
    /// Returns `PublicEndpointOnly` inside a workspace.
    pub fn require_public(&self) -> Result<(), TenantError> {
        match self {
            Self::Public => Ok(()),
            Self::Tenant(_) => Err(TenantError::PublicEndpointOnly),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tenant() -> TenantContext {
        TenantContext {
            tenant_id: TenantId::new(),
            schema: SchemaName::parse("noor").unwrap(),
            name: "Masjid Noor".into(),
        }
    }

    #[test]
    fn test_public_context_cannot_reach_tenant_data() {
        let ctx = RequestContext::Public;
        assert!(ctx.is_public());
        assert!(matches!(
            ctx.require_tenant(),
            Err(TenantError::PublicSchemaAccessDenied)
        ));
        assert!(ctx.require_public().is_ok());
    }

    #[test]
    fn test_tenant_context() {
        let ctx = RequestContext::Tenant(tenant());
        assert_eq!(ctx.require_tenant().unwrap().schema.as_str(), "noor");
        assert!(matches!(
            ctx.require_public(),
            Err(TenantError::PublicEndpointOnly)
        ));
    }
}
