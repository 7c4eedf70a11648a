//! # doorman-entity
//!
//! Document models persisted by Doorman: the [`user::User`] credential
//! and lockout document, its outward [`user::UserProfile`] projection,
//! and the [`role::Role`] document.

pub mod role;
pub mod user;

pub use role::Role;
pub use user::{User, UserProfile};
