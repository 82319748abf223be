//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Hostname to tenant routing.
    #[serde(default)]
    pub tenancy: TenancyConfig,
    /// Fund-compliance rules applied when posting vouchers.
    #[serde(default)]
    pub compliance: ComplianceConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Seconds to wait for a pooled connection.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connect_timeout() -> u64 {
    8
}

/// Tenant routing configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TenancyConfig {
    /// Parent domain under which workspaces get `<slug>.<base_domain>`.
    #[serde(default = "default_base_domain")]
    pub base_domain: String,
    /// Schema holding the tenant and domain registry.
    #[serde(default = "default_public_schema")]
    pub public_schema: String,
    /// Route unknown hosts to the public context instead of failing with 404.
    #[serde(default = "default_fallback_to_public")]
    pub fallback_to_public: bool,
    /// Hosts that always resolve to the public context.
    #[serde(default = "default_public_hosts")]
    pub public_hosts: Vec<String>,
    /// Display name reported for the public context.
    #[serde(default = "default_platform_name")]
    pub platform_name: String,
    /// Lifetime of a cached host resolution.
    #[serde(default = "default_resolver_cache_ttl")]
    pub resolver_cache_ttl_secs: u64,
    /// Maximum number of cached host resolutions.
    #[serde(default = "default_resolver_cache_capacity")]
    pub resolver_cache_capacity: u64,
}

impl Default for TenancyConfig {
    fn default() -> Self {
        Self {
            base_domain: default_base_domain(),
            public_schema: default_public_schema(),
            fallback_to_public: default_fallback_to_public(),
            public_hosts: default_public_hosts(),
            platform_name: default_platform_name(),
            resolver_cache_ttl_secs: default_resolver_cache_ttl(),
            resolver_cache_capacity: default_resolver_cache_capacity(),
        }
    }
}

fn default_base_domain() -> String {
    "localhost".to_string()
}

fn default_public_schema() -> String {
    "public".to_string()
}

fn default_fallback_to_public() -> bool {
    true
}

fn default_public_hosts() -> Vec<String> {
    vec!["localhost".to_string(), "127.0.0.1".to_string()]
}

fn default_platform_name() -> String {
    "Mizan".to_string()
}

fn default_resolver_cache_ttl() -> u64 {
    60
}

fn default_resolver_cache_capacity() -> u64 {
    10_000
}

/// Compliance configuration for voucher posting.
#[derive(Debug, Clone, Deserialize)]
pub struct ComplianceConfig {
    /// Receipts above this amount must carry the donor's PAN.
    #[serde(default = "default_pan_threshold")]
    pub pan_threshold: Decimal,
    /// Narration keywords that mark a payment as an operational expense.
    #[serde(default = "default_restricted_keywords")]
    pub restricted_keywords: Vec<String>,
}

impl Default for ComplianceConfig {
    fn default() -> Self {
        Self {
            pan_threshold: default_pan_threshold(),
            restricted_keywords: default_restricted_keywords(),
        }
    }
}

fn default_pan_threshold() -> Decimal {
    Decimal::from(2000)
}

fn default_restricted_keywords() -> Vec<String> {
    ["bill", "salary", "maintenance", "electricity", "rent"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones winning: `config/default`, `config/{RUN_MODE}`,
    /// then `MIZAN__*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("MIZAN")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("tenancy.public_hosts")
                    .with_list_parse_key("compliance.restricted_keywords")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
