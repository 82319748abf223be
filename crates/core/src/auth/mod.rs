//! Workspace user identities.
//!
//! - Password hashing with Argon2id
//! - Password policy
//! - Roles inside a workspace

mod password;

pub use password::{MIN_PASSWORD_LENGTH, PasswordError, check_password_policy, hash_password};

use serde::{Deserialize, Serialize};

/// Username given to the administrator created with a workspace.
pub const ADMIN_USERNAME: &str = "admin";

/// Roles inside a workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Full access, created with the workspace.
    Admin,
    /// Can post and finalize vouchers.
    Accountant,
    /// Read-only access.
    Viewer,
}

impl UserRole {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Accountant => "accountant",
            Self::Viewer => "viewer",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
