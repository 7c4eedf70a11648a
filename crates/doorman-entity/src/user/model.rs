//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use doorman_core::types::{RoleId, UserId};

/// A principal in the Doorman system: one document per user, holding
/// credential material, lockout state, profile fields, and role
/// membership. `(username, application_name)` uniquely identifies a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Login name, unique within the application.
    pub username: String,
    /// Tenant partition this user belongs to.
    pub application_name: String,
    /// Password encoded under the configured format.
    pub password_hash: String,
    /// Per-user salt, shared by the password and answer encodings.
    pub password_salt: String,
    /// Security question shown for answer-gated operations.
    pub password_question: Option<String>,
    /// Security answer, encoded like the password with the same salt.
    pub password_answer: Option<String>,
    /// Consecutive failed password attempts inside the current window.
    pub failed_password_attempts: u32,
    /// Consecutive failed answer attempts inside the current window.
    pub failed_password_answer_attempts: u32,
    /// When the most recent failed attempt happened.
    pub last_failed_password_attempt: Option<DateTime<Utc>>,
    /// Whether the account is locked out. Cleared only by an explicit
    /// unlock.
    pub is_locked_out: bool,
    /// Email address.
    pub email: String,
    /// Human-readable display name.
    pub full_name: Option<String>,
    /// Free-form administrative comment.
    pub comment: Option<String>,
    /// Whether the account has been approved for login.
    pub is_approved: bool,
    /// Whether the user validated credentials recently.
    pub is_online: bool,
    /// When the user was created.
    pub date_created: DateTime<Utc>,
    /// Last successful credential validation.
    pub date_last_login: Option<DateTime<Utc>>,
    /// Roles this user belongs to. Ordered, duplicate-free.
    pub roles: Vec<RoleId>,
}

impl User {
    /// Check whether the user holds the given role.
    pub fn has_role(&self, role_id: RoleId) -> bool {
        self.roles.contains(&role_id)
    }

    /// Add a role. Idempotent: returns `false` when already held.
    pub fn add_role(&mut self, role_id: RoleId) -> bool {
        if self.has_role(role_id) {
            return false;
        }
        self.roles.push(role_id);
        true
    }

    /// Remove a role. Idempotent: returns `false` when not held.
    pub fn remove_role(&mut self, role_id: RoleId) -> bool {
        let before = self.roles.len();
        self.roles.retain(|r| *r != role_id);
        self.roles.len() != before
    }

    /// Build the outward projection of this user.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            application_name: self.application_name.clone(),
            email: self.email.clone(),
            full_name: self.full_name.clone(),
            comment: self.comment.clone(),
            password_question: self.password_question.clone(),
            is_approved: self.is_approved,
            is_locked_out: self.is_locked_out,
            is_online: self.is_online,
            date_created: self.date_created,
            date_last_login: self.date_last_login,
        }
    }
}

/// Public projection of a [`User`]. Never carries the password hash,
/// salt, or encoded answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Unique user identifier.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// Tenant partition.
    pub application_name: String,
    /// Email address.
    pub email: String,
    /// Human-readable display name.
    pub full_name: Option<String>,
    /// Free-form administrative comment.
    pub comment: Option<String>,
    /// Security question (the answer is never exposed).
    pub password_question: Option<String>,
    /// Whether the account has been approved for login.
    pub is_approved: bool,
    /// Whether the account is locked out.
    pub is_locked_out: bool,
    /// Whether the user validated credentials recently.
    pub is_online: bool,
    /// When the user was created.
    pub date_created: DateTime<Utc>,
    /// Last successful credential validation.
    pub date_last_login: Option<DateTime<Utc>>,
}
