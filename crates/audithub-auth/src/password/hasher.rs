//! Bcrypt password hashing and verification.

use audithub_core::config::auth::AuthConfig;
use audithub_core::error::AppError;

/// Handles password hashing and verification using bcrypt.
///
/// The cost factor is taken from configuration so tests can use a low
/// cost while production runs at the configured work factor.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Creates a new password hasher from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            cost: config.bcrypt_cost,
        }
    }

    /// Creates a hasher with an explicit cost factor.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    /// Hashes a plaintext password with a random salt.
    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        bcrypt::hash(password, self.cost)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))
    }

    /// Verifies a plaintext password against a stored hash.
    ///
    /// Returns `Ok(true)` if the password matches, `Ok(false)` if not.
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        bcrypt::verify(password, hash)
            .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let hasher = PasswordHasher::with_cost(4);
        let hash = hasher.hash_password("Str0ng!pass").unwrap();

        assert!(hasher.verify_password("Str0ng!pass", &hash).unwrap());
        assert!(!hasher.verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error() {
        let hasher = PasswordHasher::with_cost(4);
        assert!(hasher.verify_password("anything", "not-a-hash").is_err());
    }
}
