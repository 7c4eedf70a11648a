//! # doorman-store
//!
//! Persistence layer for Doorman: the in-memory reference
//! [`memory::MemoryDocumentStore`] backend and the application-scoped
//! [`repositories`] that serialize entities to and from documents.

pub mod memory;
pub mod repositories;

pub use memory::MemoryDocumentStore;
pub use repositories::{RoleRepository, UserRepository};
