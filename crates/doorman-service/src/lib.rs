//! # doorman-service
//!
//! Business logic services for Doorman: the
//! [`membership::MembershipService`] credential flows and the
//! [`role::RoleService`] role lifecycle and batch membership edits.
//!
//! Every operation opens one document-store session, performs its reads,
//! mutates entities in memory, and commits exactly once.

pub mod membership;
pub mod role;

pub use membership::{CreateUserOutcome, CreateUserRequest, MembershipService};
pub use role::RoleService;
