//! Membership policy configuration.
//!
//! Carries the credential, lockout, and uniqueness policies consumed by
//! the identity and role services. Defaults mirror a conventional
//! membership provider: 5 attempts in a 10-minute window, minimum length
//! 7 with 1 non-alphanumeric character, hashed password storage.

use serde::{Deserialize, Serialize};

/// Storage format for passwords and challenge answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PasswordFormat {
    /// No transform; stored as entered.
    Clear,
    /// One-way digest (optionally keyed). Not retrievable.
    Hashed,
    /// Reversible symmetric transform.
    Encrypted,
}

/// Credential and role-membership policy configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MembershipConfig {
    /// Tenant partition; scopes every username, email, and role name.
    #[serde(default = "default_application_name")]
    pub application_name: String,
    /// Failed attempts tolerated before lockout. One further failure
    /// inside the window locks the account.
    #[serde(default = "default_max_attempts")]
    pub max_invalid_password_attempts: u32,
    /// Rolling window in minutes within which failed attempts accumulate.
    #[serde(default = "default_attempt_window")]
    pub password_attempt_window_minutes: i64,
    /// Minimum password length.
    #[serde(default = "default_min_length")]
    pub min_required_password_length: usize,
    /// Minimum number of non-alphanumeric characters.
    #[serde(default = "default_min_non_alphanumeric")]
    pub min_required_non_alphanumeric_characters: usize,
    /// Optional regular expression every password must match. Empty
    /// disables the check.
    #[serde(default)]
    pub password_strength_regular_expression: String,
    /// Storage format for passwords and answers.
    #[serde(default = "default_format")]
    pub password_format: PasswordFormat,
    /// Digest algorithm for the `hashed` format: `sha256`, `sha512`,
    /// `hmacsha256`, or `hmacsha512`.
    #[serde(default = "default_hash_algorithm")]
    pub hash_algorithm: String,
    /// Key for the keyed (HMAC) digest variants. Mandatory when
    /// `hash_algorithm` names an HMAC algorithm.
    #[serde(default)]
    pub validation_key: String,
    /// Key material for the `encrypted` format. Mandatory when that
    /// format is configured.
    #[serde(default)]
    pub encryption_key: String,
    /// Enforce email uniqueness within the application.
    #[serde(default = "default_true")]
    pub requires_unique_email: bool,
    /// Require a security question and answer on every account.
    #[serde(default)]
    pub requires_question_and_answer: bool,
    /// Allow answer-gated password resets.
    #[serde(default = "default_true")]
    pub enable_password_reset: bool,
    /// Allow answer-gated password retrieval (never possible for the
    /// `hashed` format).
    #[serde(default = "default_true")]
    pub enable_password_retrieval: bool,
}

impl Default for MembershipConfig {
    fn default() -> Self {
        Self {
            application_name: default_application_name(),
            max_invalid_password_attempts: default_max_attempts(),
            password_attempt_window_minutes: default_attempt_window(),
            min_required_password_length: default_min_length(),
            min_required_non_alphanumeric_characters: default_min_non_alphanumeric(),
            password_strength_regular_expression: String::new(),
            password_format: default_format(),
            hash_algorithm: default_hash_algorithm(),
            validation_key: String::new(),
            encryption_key: String::new(),
            requires_unique_email: true,
            requires_question_and_answer: false,
            enable_password_reset: true,
            enable_password_retrieval: true,
        }
    }
}

fn default_application_name() -> String {
    "/".to_string()
}

fn default_max_attempts() -> u32 {
    5
}

fn default_attempt_window() -> i64 {
    10
}

fn default_min_length() -> usize {
    7
}

fn default_min_non_alphanumeric() -> usize {
    1
}

fn default_format() -> PasswordFormat {
    PasswordFormat::Hashed
}

fn default_hash_algorithm() -> String {
    "sha256".to_string()
}

fn default_true() -> bool {
    true
}
