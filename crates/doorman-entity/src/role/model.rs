//! Role entity model.

use serde::{Deserialize, Serialize};

use doorman_core::types::RoleId;

/// A named role within one application. `(name, application_name)` is
/// unique. Membership lives on the [`User`](crate::user::User) side as a
/// set of role identifiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    /// Unique role identifier.
    pub id: RoleId,
    /// Role name, unique within the application.
    pub name: String,
    /// Tenant partition this role belongs to.
    pub application_name: String,
}

impl Role {
    /// Create a new role with a fresh identifier.
    pub fn new(name: impl Into<String>, application_name: impl Into<String>) -> Self {
        Self {
            id: RoleId::new(),
            name: name.into(),
            application_name: application_name.into(),
        }
    }
}
