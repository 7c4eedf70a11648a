//! # doorman-auth
//!
//! Credential primitives for Doorman: the format-dependent
//! [`password::PasswordCodec`], the configured-policy
//! [`password::PasswordValidator`], and the rolling-window
//! [`lockout::LockoutEngine`].

pub mod lockout;
pub mod password;

pub use lockout::{AttemptOutcome, LockoutEngine, LockoutState};
pub use password::{PasswordCodec, PasswordValidator, PasswordViolation};
