//! Argon2id password hashing and verification.

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use taskhub_core::error::AppError;
use taskhub_core::result::AppResult;

/// Argon2id with default parameters and a random salt per hash.
#[derive(Debug, Clone, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Creates a new password hasher instance.
    pub fn new() -> Self {
        Self
    }

    /// Produce a PHC string for `password`.
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))
    }

    /// Compare `password` with a stored PHC string.
    ///
    /// A mismatch is `Ok(false)`; only a corrupt stored hash is an error.
    pub fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| AppError::internal(format!("Stored password hash is unreadable: {e}")))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::internal(format!(
                "Password verification failed: {e}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash_password("orbital-teapot-1987").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify_password("orbital-teapot-1987", &hash).unwrap());
        assert!(!hasher.verify_password("orbital-teapot-1988", &hash).unwrap());
    }

    #[test]
    fn test_corrupt_hash_is_an_error() {
        let hasher = PasswordHasher::new();
        assert!(hasher.verify_password("anything", "not-a-phc-string").is_err());
    }
}
