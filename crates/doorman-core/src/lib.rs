//! # doorman-core
//!
//! Core crate for Doorman. Contains the document-store traits,
//! configuration schemas, typed identifiers, pagination/filter types,
//! and the unified error system.
//!
//! This crate has **no** internal dependencies on other Doorman crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
