//! Workspace provisioning requests.
//!
//! Turns a registration request into a [`ProvisionPlan`] with every derived
//! value fixed up front, so the database layer only executes it.

use mizan_shared::types::TenantId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::error::TenantError;
use super::host::{first_label, normalize_host, validate_slug, workspace_domain};
use super::schema::SchemaName;
use crate::auth::{ADMIN_USERNAME, check_password_policy};
use crate::ledger::{DEFAULT_CHART, SeedAccount};

/// A request to create a workspace.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProvisionRequest {
    /// Display name of the mosque / Jamath.
    #[validate(length(min = 1, max = 100, message = "Workspace name is required"))]
    pub name: String,
    /// Schema identifier; derived from the domain when absent.
    #[serde(default)]
    pub schema_name: Option<String>,
    /// Workspace slug (`noor`) or full hostname (`noor.example.org`).
    #[validate(length(min = 1, max = 253, message = "Workspace address is required"))]
    pub domain: String,
    /// Owner and administrator e-mail.
    #[validate(email(message = "A valid e-mail address is required"))]
    pub admin_email: String,
    /// Administrator password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub admin_password: String,
}

/// Everything needed to create a workspace.
#[derive(Debug, Clone)]
pub struct ProvisionPlan {
    /// ID of the new tenant.
    pub tenant_id: TenantId,
    /// Display name.
    pub name: String,
    /// Schema to create.
    pub schema: SchemaName,
    /// Primary hostname.
    pub domain: String,
    /// Lower-cased owner e-mail.
    pub owner_email: String,
    /// Administrator username.
    pub admin_username: &'static str,
    /// Token for e-mail verification.
    pub verification_token: Uuid,
    /// System ledgers to seed.
    pub chart: &'static [SeedAccount],
}

/// The message that asks a new owner to confirm their e-mail address.
///
/// Delivery belongs to the mail collaborator; the link carries the
/// verification token and points at the workspace's own host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationNotice {
    /// Owner address.
    pub to: String,
    /// Workspace display name.
    pub workspace: String,
    /// Confirmation link.
    pub url: String,
}

impl ProvisionPlan {
    /// The verification message for this workspace's owner.
    #[must_use]
    pub fn verification_notice(&self) -> VerificationNotice {
        VerificationNotice {
            to: self.owner_email.clone(),
            workspace: self.name.clone(),
            url: format!(
                "http://{}/auth/verify-email?token={}",
                self.domain, self.verification_token
            ),
        }
    }
}

impl ProvisionRequest {
    /// Validates the request and derives schema and hostname.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for malformed fields and `InvalidSchemaName` for
    /// an unusable schema identifier.
    pub fn plan(&self, base_domain: &str) -> Result<ProvisionPlan, TenantError> {
        self.validate()
            .map_err(|e| TenantError::Validation(first_message(&e)))?;
        check_password_policy(&self.admin_password).map_err(|e| TenantError::Validation(e.to_string()))?;

        let requested = self.domain.trim().to_lowercase();
        let (slug, domain) = if requested.contains('.') {
            let host = normalize_host(&requested)?;
            (first_label(&host).to_string(), host)
        } else {
            (requested.clone(), workspace_domain(&requested, base_domain))
        };
        validate_slug(&slug)?;

        let schema = match self.schema_name.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(explicit) => SchemaName::parse(explicit)?,
            None => SchemaName::from_slug(&slug)?,
        };

        Ok(ProvisionPlan {
            tenant_id: TenantId::new(),
            name: self.name.trim().to_string(),
            schema,
            domain,
            owner_email: self.admin_email.trim().to_lowercase(),
            admin_username: ADMIN_USERNAME,
            verification_token: Uuid::new_v4(),
            chart: DEFAULT_CHART,
        })
    }
}

fn first_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(ToString::to_string))
        .unwrap_or_else(|| "Invalid workspace request".to_string())
}
