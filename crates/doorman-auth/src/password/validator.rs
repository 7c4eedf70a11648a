//! Password policy enforcement for new passwords.

use regex::Regex;
use thiserror::Error;

use doorman_core::config::MembershipConfig;
use doorman_core::error::AppError;
use doorman_core::result::AppResult;

/// A policy rejection of a candidate password.
///
/// Deliberately not an [`AppError`]: policy rejections are expected and
/// frequent, and callers surface them as typed outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordViolation {
    /// The password is shorter than the configured minimum.
    #[error("password must be at least {min} characters long")]
    TooShort {
        /// Configured minimum length.
        min: usize,
    },
    /// The password has too few non-alphanumeric characters.
    #[error("password must contain at least {min} non-alphanumeric characters")]
    TooFewNonAlphanumeric {
        /// Configured minimum count.
        min: usize,
    },
    /// The password does not match the configured strength pattern.
    #[error("password does not satisfy the strength requirements")]
    PatternMismatch,
}

/// Validates password strength against the configured policy: minimum
/// length, non-alphanumeric minimum, and an optional strength pattern.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    min_length: usize,
    min_non_alphanumeric: usize,
    strength_pattern: Option<Regex>,
}

impl PasswordValidator {
    /// Creates a new validator from membership configuration.
    ///
    /// An unparseable strength pattern is a configuration error.
    pub fn from_config(config: &MembershipConfig) -> AppResult<Self> {
        let strength_pattern = if config.password_strength_regular_expression.is_empty() {
            None
        } else {
            Some(
                Regex::new(&config.password_strength_regular_expression).map_err(|e| {
                    AppError::configuration(format!("Invalid password strength pattern: {e}"))
                })?,
            )
        };
        Ok(Self {
            min_length: config.min_required_password_length,
            min_non_alphanumeric: config.min_required_non_alphanumeric_characters,
            strength_pattern,
        })
    }

    /// Validates a candidate password, reporting the first violation.
    pub fn validate(&self, password: &str) -> Result<(), PasswordViolation> {
        if password.chars().count() < self.min_length {
            return Err(PasswordViolation::TooShort {
                min: self.min_length,
            });
        }

        let non_alphanumeric = password.chars().filter(|c| !c.is_alphanumeric()).count();
        if non_alphanumeric < self.min_non_alphanumeric {
            return Err(PasswordViolation::TooFewNonAlphanumeric {
                min: self.min_non_alphanumeric,
            });
        }

        if let Some(pattern) = &self.strength_pattern {
            if !pattern.is_match(password) {
                return Err(PasswordViolation::PatternMismatch);
            }
        }

        Ok(())
    }
}
