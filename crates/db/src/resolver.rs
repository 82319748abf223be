//! Cached host → workspace resolution.
//!
//! Hits are cached with Moka for a short TTL. Misses always go back to the
//! registry, so a workspace provisioned by another process resolves on its
//! next request.

use std::time::Duration;

use mizan_core::tenant::{HostRoute, RequestContext, ResolutionPolicy, TenantContext};
use mizan_shared::TenancyConfig;
use moka::future::Cache;
use sea_orm::DatabaseConnection;
use tracing::debug;

use crate::error::RepositoryError;
use crate::repositories::TenantRepository;

/// Resolves request hosts against the domain registry.
#[derive(Clone)]
pub struct TenantResolver {
    repo: TenantRepository,
    policy: ResolutionPolicy,
    cache: Cache<String, TenantContext>,
}

impl TenantResolver {
    /// Creates a resolver with an explicit policy and cache settings.
    #[must_use]
    pub fn new(
        db: DatabaseConnection,
        policy: ResolutionPolicy,
        max_capacity: u64,
        ttl_secs: u64,
    ) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();
        Self {
            repo: TenantRepository::new(db),
            policy,
            cache,
        }
    }

    /// Creates a resolver from tenancy configuration.
    #[must_use]
    pub fn from_config(db: DatabaseConnection, config: &TenancyConfig) -> Self {
        Self::new(
            db,
            ResolutionPolicy::from_config(config),
            config.resolver_cache_capacity,
            config.resolver_cache_ttl_secs,
        )
    }

    /// Resolves a raw `Host` header value.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHost` / `UnknownTenant` per the policy, or a database
    /// error if the lookup fails.
    pub async fn resolve(&self, raw_host: &str) -> Result<RequestContext, RepositoryError> {
        let host = match self.policy.route(raw_host)? {
            HostRoute::Public => return Ok(RequestContext::Public),
            HostRoute::Lookup(host) => host,
        };

        let found = match self.cache.get(&host).await {
            Some(cached) => Some(cached),
            None => {
                let found = self.repo.find_by_host(&host).await?;
                debug!(%host, hit = found.is_some(), "Resolved host");
                if let Some(tenant) = &found {
                    self.cache.insert(host.clone(), tenant.clone()).await;
                }
                found
            }
        };

        Ok(self.policy.decide(&host, found)?)
    }
}

impl std::fmt::Debug for TenantResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TenantResolver")
            .field("policy", &self.policy)
            .field("cached", &self.cache.entry_count())
            .finish_non_exhaustive()
    }
}
