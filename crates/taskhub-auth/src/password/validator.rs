//! Password policy for new accounts.

use taskhub_core::config::AuthConfig;
use taskhub_core::error::AppError;
use taskhub_core::result::AppResult;

/// Minimum length plus a zxcvbn strength floor.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    min_length: usize,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length as usize,
        }
    }

    /// Check `password`, penalizing guesses built from the user's own
    /// `user_inputs` (name, email).
    pub fn validate(&self, password: &str, user_inputs: &[&str]) -> AppResult<()> {
        if password.chars().count() < self.min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }

        let estimate = zxcvbn::zxcvbn(password, user_inputs);
        if estimate.score() < zxcvbn::Score::Three {
            return Err(AppError::validation(
                "Password is too weak. Please use a stronger password with more entropy.",
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
    fn test_too_short() {
        let err = validator().validate("Ab1!", &[]).unwrap_err();
        assert!(err.message.contains("at least"));
    }

    #[test]
    fn test_weak_password_rejected() {
        assert!(validator().validate("password", &[]).is_err());
        assert!(validator().validate("12345678", &[]).is_err());
    }

    #[test]
    fn test_strong_password_accepted() {
        assert!(
            validator()
                .validate("violet-anchor-mosaic-tundra-47", &["Ada", "ada@example.com"])
                .is_ok()
        );
    }
}
