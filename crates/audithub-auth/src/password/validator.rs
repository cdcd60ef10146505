//! Password policy enforcement for new passwords.

use audithub_core::config::auth::AuthConfig;
use audithub_core::error::AppError;

/// Validates password strength against configured policies.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    /// Minimum password length.
    min_length: usize,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length as usize,
        }
    }

    /// Validates a password against all configured policies.
    ///
    /// Returns `Ok(())` if the password meets all requirements,
    /// or an error describing the first violation found.
    pub fn validate(&self, password: &str) -> Result<(), AppError> {
        if password.len() < self.min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }

        if !password.chars().any(|c| c.is_uppercase()) {
            return Err(AppError::validation(
                "Password must contain at least one uppercase letter",
            ));
        }

        if !password.chars().any(|c| c.is_lowercase()) {
            return Err(AppError::validation(
                "Password must contain at least one lowercase letter",
            ));
        }

        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(AppError::validation(
                "Password must contain at least one digit",
            ));
        }

        Ok(())
    }

    /// Validates that a new password differs from the old one.
    pub fn validate_not_same(
        &self,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        if old_password == new_password {
            return Err(AppError::validation(
                "New password must be different from the current password",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> PasswordValidator {
        PasswordValidator::new(&AuthConfig::default())
    }

    #[test]
    fn accepts_compliant_password() {
        assert!(validator().validate("Audit2026pass").is_ok());
    }

    #[test]
    fn rejects_short_password() {
        assert!(validator().validate("Ab1x").is_err());
    }

    #[test]
    fn rejects_missing_character_classes() {
        let v = validator();
        assert!(v.validate("alllowercase1").is_err());
        assert!(v.validate("ALLUPPERCASE1").is_err());
        assert!(v.validate("NoDigitsHere").is_err());
    }

    #[test]
    fn rejects_unchanged_password() {
        assert!(validator().validate_not_same("SamePass1", "SamePass1").is_err());
        assert!(validator().validate_not_same("OldPass1", "NewPass1").is_ok());
    }
}
