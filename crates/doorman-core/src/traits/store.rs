//! Document store traits for pluggable persistence backends.
//!
//! The store is an opaque persistence service: predicate-filtered typed
//! queries, load-by-key, and buffered store/delete applied by a single
//! atomic commit. Every logical operation opens one session, performs its
//! reads, mutates entities in memory, and calls [`DocumentSession::save_changes`]
//! exactly once before the session is dropped.

use async_trait::async_trait;
use serde_json::Value;

use crate::result::AppResult;
use crate::types::filter::FilterField;

/// A stored document: its full key (`{collection}/{id}`) and JSON body.
#[derive(Debug, Clone)]
pub struct Document {
    /// Full document key, e.g. `users/{uuid}`.
    pub key: String,
    /// The document body.
    pub body: Value,
}

/// Trait for document store backends.
#[async_trait]
pub trait DocumentStore: Send + Sync + std::fmt::Debug + 'static {
    /// Open a short-lived session scoped to one logical operation.
    async fn open_session(&self) -> AppResult<Box<dyn DocumentSession>>;
}

/// A unit-of-work session against the document store.
///
/// Writes issued through [`store`](Self::store) and [`delete`](Self::delete)
/// are buffered in the session and become visible to other sessions only
/// after [`save_changes`](Self::save_changes) commits them atomically.
/// Dropping a session without committing discards all buffered writes, so
/// a session is released correctly on every exit path. Reads observe the
/// last committed state; there is no cross-session isolation beyond that
/// (last writer wins).
#[async_trait]
pub trait DocumentSession: Send + Sync {
    /// Load a document by its full key. Returns `None` when absent.
    async fn load(&self, key: &str) -> AppResult<Option<Value>>;

    /// Query a collection with AND-composed filter conditions.
    async fn query(&self, collection: &str, filters: &[FilterField]) -> AppResult<Vec<Document>>;

    /// Buffer an upsert of a document. The key prefix names the collection.
    fn store(&mut self, key: &str, body: Value);

    /// Buffer a deletion of a document.
    fn delete(&mut self, key: &str);

    /// Commit all buffered writes as one atomic unit.
    async fn save_changes(&mut self) -> AppResult<()>;
}
