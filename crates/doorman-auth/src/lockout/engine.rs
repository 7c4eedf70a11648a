//! Rolling-window failed-attempt tracking and lockout transitions.
//!
//! Failures accumulate only within the configured attempt window, so
//! stale failures never push an account toward lockout, while repeated
//! failures inside the window are capped. The engine is a pure function
//! over `(user, outcome, now)`; persistence is the caller's job.

use chrono::{DateTime, Duration, Utc};

use doorman_core::config::MembershipConfig;
use doorman_entity::user::User;

/// The result of one credential or answer check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The credentials matched.
    Success,
    /// The password did not match.
    PasswordMismatch,
    /// The challenge answer did not match.
    AnswerMismatch,
}

/// Lockout state after applying an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockoutState {
    /// The account accepts further attempts.
    Active,
    /// The account is locked until explicitly unlocked.
    Locked,
}

/// Applies attempt outcomes to a user's lockout counters.
#[derive(Debug, Clone)]
pub struct LockoutEngine {
    max_invalid_attempts: u32,
    attempt_window: Duration,
}

impl LockoutEngine {
    /// Create an engine from membership configuration.
    pub fn from_config(config: &MembershipConfig) -> Self {
        Self {
            max_invalid_attempts: config.max_invalid_password_attempts,
            attempt_window: Duration::minutes(config.password_attempt_window_minutes),
        }
    }

    /// Apply one attempt outcome to the user's counters at time `now`.
    ///
    /// A success zeroes both counters and clears the lockout flag. A
    /// mismatch whose previous failure lies outside the window starts a
    /// fresh sequence (counter becomes exactly 1); otherwise the counter
    /// matching the attempt kind is incremented. When either counter
    /// strictly exceeds the maximum, the account transitions to
    /// [`LockoutState::Locked`], which only an explicit unlock clears.
    pub fn apply(
        &self,
        user: &mut User,
        outcome: AttemptOutcome,
        now: DateTime<Utc>,
    ) -> LockoutState {
        match outcome {
            AttemptOutcome::Success => {
                user.failed_password_attempts = 0;
                user.failed_password_answer_attempts = 0;
                user.last_failed_password_attempt = None;
                user.is_locked_out = false;
                LockoutState::Active
            }
            AttemptOutcome::PasswordMismatch | AttemptOutcome::AnswerMismatch => {
                if self.window_lapsed(user, now) {
                    user.failed_password_attempts = 0;
                    user.failed_password_answer_attempts = 0;
                }
                match outcome {
                    AttemptOutcome::PasswordMismatch => user.failed_password_attempts += 1,
                    AttemptOutcome::AnswerMismatch => user.failed_password_answer_attempts += 1,
                    AttemptOutcome::Success => unreachable!(),
                }
                user.last_failed_password_attempt = Some(now);
                if user.failed_password_attempts > self.max_invalid_attempts
                    || user.failed_password_answer_attempts > self.max_invalid_attempts
                {
                    user.is_locked_out = true;
                }
                if user.is_locked_out {
                    LockoutState::Locked
                } else {
                    LockoutState::Active
                }
            }
        }
    }

    /// Whether the previous failure lies outside the attempt window.
    fn window_lapsed(&self, user: &User, now: DateTime<Utc>) -> bool {
        match user.last_failed_password_attempt {
            Some(last) => now - last > self.attempt_window,
            None => true,
        }
    }
}
