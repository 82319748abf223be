//! Multi-tenant routing.
//!
//! Each workspace owns a PostgreSQL schema and one or more hostnames. This
//! module holds the pure half of tenancy:
//! - [`SchemaName`] validation
//! - host normalization and the resolution policy
//! - the per-request [`RequestContext`]
//! - the provisioning plan

pub mod context;
pub mod error;
pub mod host;
pub mod provisioning;
pub mod resolver;
pub mod schema;

pub use context::{RequestContext, TenantContext};
pub use error::TenantError;
pub use host::{first_label, normalize_host, validate_slug, workspace_domain};
pub use provisioning::{ProvisionPlan, ProvisionRequest, VerificationNotice};
pub use resolver::{HostRoute, ResolutionPolicy};
pub use schema::{MAX_SCHEMA_LEN, SchemaName};
