//! # Doorman
//!
//! An authentication and authorization back end: user credentials,
//! account lockout state, and user/role membership, persisted in a
//! pluggable document store.
//!
//! This crate is the library facade over the workspace members:
//!
//! - [`doorman_core`] — store traits, configuration, types, errors.
//! - [`doorman_entity`] — `User` and `Role` document models.
//! - [`doorman_store`] — the in-memory store backend and repositories.
//! - [`doorman_auth`] — password codec, policy, and lockout engine.
//! - [`doorman_service`] — the identity and role-membership services.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use doorman::config::MembershipConfig;
//! use doorman::service::{CreateUserOutcome, CreateUserRequest, MembershipService};
//! use doorman::store::MemoryDocumentStore;
//!
//! # async fn example() -> doorman::AppResult<()> {
//! let store = Arc::new(MemoryDocumentStore::new());
//! let membership = MembershipService::new(store, MembershipConfig::default())?;
//! let outcome = membership
//!     .create_user(CreateUserRequest {
//!         username: "alice".into(),
//!         password: "P@ssw0rd1".into(),
//!         email: "alice@example.com".into(),
//!         question: None,
//!         answer: None,
//!         full_name: None,
//!         comment: None,
//!         is_approved: true,
//!     })
//!     .await?;
//! assert!(matches!(outcome, CreateUserOutcome::Created(_)));
//! assert!(membership.validate_user("alice", "P@ssw0rd1").await?);
//! # Ok(())
//! # }
//! ```

pub use doorman_core::config;
pub use doorman_core::error::{AppError, ErrorKind};
pub use doorman_core::result::AppResult;
pub use doorman_core::traits;
pub use doorman_core::types;

/// Document models.
pub mod entity {
    pub use doorman_entity::{Role, User, UserProfile};
}

/// Persistence backends and repositories.
pub mod store {
    pub use doorman_store::{MemoryDocumentStore, RoleRepository, UserRepository};
}

/// Credential primitives.
pub mod auth {
    pub use doorman_auth::{
        AttemptOutcome, LockoutEngine, LockoutState, PasswordCodec, PasswordValidator,
        PasswordViolation,
    };
}

/// Identity and role-membership services.
pub mod service {
    pub use doorman_service::{
        CreateUserOutcome, CreateUserRequest, MembershipService, RoleService,
    };
}
