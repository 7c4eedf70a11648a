//! Trait seams owned by the core crate so that implementation crates
//! depend only on `doorman-core`.

pub mod store;

pub use store::{Document, DocumentSession, DocumentStore};
