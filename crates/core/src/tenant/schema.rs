//! Workspace schema identifiers.
//!
//! Every workspace lives in its own PostgreSQL schema. A [`SchemaName`] is
//! validated on construction so it can be interpolated into DDL and
//! `search_path` statements as a quoted identifier.

use serde::{Deserialize, Serialize};

use super::error::TenantError;

/// PostgreSQL truncates identifiers beyond this length.
pub const MAX_SCHEMA_LEN: usize = 63;

const RESERVED: &[&str] = &["public", "information_schema"];

/// A validated tenant schema identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SchemaName(String);

impl SchemaName {
    /// Validates an identifier: lowercase ASCII letters, digits and `_`,
    /// starting with a letter, at most 63 bytes, not reserved.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSchemaName` describing the violated rule.
    pub fn parse(name: &str) -> Result<Self, TenantError> {
        let invalid = |reason| TenantError::InvalidSchemaName {
            name: name.to_string(),
            reason,
        };

        if name.is_empty() {
            return Err(invalid("must not be empty"));
        }
        if name.len() > MAX_SCHEMA_LEN {
            return Err(invalid("must be at most 63 characters"));
        }
        if !name.starts_with(|c: char| c.is_ascii_lowercase()) {
            return Err(invalid("must start with a lowercase letter"));
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(invalid("may only contain lowercase letters, digits and underscores"));
        }
        if name.starts_with("pg_") || RESERVED.contains(&name) {
            return Err(invalid("is reserved"));
        }
        Ok(Self(name.to_string()))
    }

    /// Derives the identifier from a workspace slug: lower-cased with `-`
    /// replaced by `_`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSchemaName` if the derived identifier is invalid.
    pub fn from_slug(slug: &str) -> Result<Self, TenantError> {
        Self::parse(&slug.trim().to_lowercase().replace('-', "_"))
    }

    /// The bare identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Double-quoted identifier for SQL.
    #[must_use]
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.0)
    }
}

impl std::fmt::Display for SchemaName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for SchemaName {
    type Err = TenantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for SchemaName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
