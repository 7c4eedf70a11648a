//! Identity service module.

pub mod service;

pub use service::{CreateUserOutcome, CreateUserRequest, MembershipService};
