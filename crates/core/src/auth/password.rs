//! Password hashing with Argon2id.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use thiserror::Error;

/// Errors that can occur during password operations.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// Failed to hash password.
    #[error("failed to hash password: {0}")]
    HashError(String),

    /// Password rejected by policy.
    #[error("password must be between 8 and 128 characters")]
    PolicyViolation,
}

/// Shortest accepted password.
pub const MIN_PASSWORD_LENGTH: usize = 8;

const MAX_PASSWORD_LENGTH: usize = 128;

/// Checks a new password against the length policy.
///
/// # Errors
///
/// Returns `PasswordError::PolicyViolation` for too short or too long passwords.
pub fn check_password_policy(password: &str) -> Result<(), PasswordError> {
    let len = password.chars().count();
    if (MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&len) && !password.trim().is_empty() {
        Ok(())
    } else {
        Err(PasswordError::PolicyViolation)
    }
}

/// Hashes a password using Argon2id.
///
/// Returns the PHC string of the hash.
///
/// # Errors
///
/// Returns `PasswordError::HashError` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::HashError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_verifies_with_argon2() {
        use argon2::{PasswordHash, PasswordVerifier};

        let hash = hash_password("masjid-admin-1").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        let parsed = PasswordHash::new(&hash).unwrap();
        assert!(Argon2::default().verify_password(b"masjid-admin-1", &parsed).is_ok());
        assert!(Argon2::default().verify_password(b"masjid-admin-2", &parsed).is_err());
    }

    #[test]
    fn test_salted_hashes_differ() {
        assert_ne!(hash_password("same").unwrap(), hash_password("same").unwrap());
    }

    #[test]
    fn test_password_policy() {
        assert!(check_password_policy("12345678").is_ok());
        assert!(check_password_policy("short").is_err());
        assert!(check_password_policy("        ").is_err());
        assert!(check_password_policy(&"x".repeat(129)).is_err());
    }
}
