//! User entity module.

pub mod model;

pub use model::{User, UserProfile};
