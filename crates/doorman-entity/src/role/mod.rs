//! Role entity module.

pub mod model;

pub use model::Role;
