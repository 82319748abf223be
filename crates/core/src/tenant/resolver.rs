//! Host → tenant resolution policy.
//!
//! The lookup itself lives in the database layer; this module decides what a
//! lookup result means.

use std::collections::HashSet;

use mizan_shared::TenancyConfig;

use super::context::{RequestContext, TenantContext};
use super::error::TenantError;
use super::host::normalize_host;

/// How unknown hosts are treated.
#[derive(Debug, Clone)]
pub struct ResolutionPolicy {
    fallback_to_public: bool,
    public_hosts: HashSet<String>,
}

/// Outcome of the pre-lookup step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostRoute {
    /// Host is a configured public host; no lookup needed.
    Public,
    /// Look the normalized host up in the domain registry.
    Lookup(String),
}

impl ResolutionPolicy {
    /// Creates a policy.
    #[must_use]
    pub fn new<I, S>(fallback_to_public: bool, public_hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            fallback_to_public,
            public_hosts: public_hosts
                .into_iter()
                .filter_map(|h| normalize_host(h.as_ref()).ok())
                .collect(),
        }
    }

    /// Builds the policy from configuration.
    #[must_use]
    pub fn from_config(config: &TenancyConfig) -> Self {
        Self::new(config.fallback_to_public, &config.public_hosts)
    }

    /// Whether unknown hosts fall back to the public context.
    #[must_use]
    pub const fn fallback_to_public(&self) -> bool {
        self.fallback_to_public
    }

    /// Normalizes the host and decides whether a lookup is needed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHost` for malformed hosts unless fallback is enabled,
    /// in which case they route to the public context.
    pub fn route(&self, raw_host: &str) -> Result<HostRoute, TenantError> {
        let host = match normalize_host(raw_host) {
            Ok(host) => host,
            Err(_) if self.fallback_to_public => return Ok(HostRoute::Public),
            Err(e) => return Err(e),
        };
        if self.public_hosts.contains(&host) {
            return Ok(HostRoute::Public);
        }
        Ok(HostRoute::Lookup(host))
    }

    /// Turns a registry lookup into a request context.
    ///
    /// # Errors
    ///
    /// Returns `UnknownTenant` when nothing matched and fallback is disabled.
    pub fn decide(&self, host: &str, found: Option<TenantContext>) -> Result<RequestContext, TenantError> {
        match found {
            Some(ctx) => Ok(RequestContext::Tenant(ctx)),
            None if self.fallback_to_public => Ok(RequestContext::Public),
            None => Err(TenantError::UnknownTenant(host.to_string())),
        }
    }
}
