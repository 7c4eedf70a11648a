//! In-memory document store using a Tokio RwLock for single-node use.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use doorman_core::result::AppResult;
use doorman_core::traits::store::{Document, DocumentSession, DocumentStore};
use doorman_core::types::filter::FilterField;

/// Shared committed state: document key to body.
type Documents = Arc<RwLock<BTreeMap<String, Value>>>;

/// A write buffered in a session, applied on commit.
#[derive(Debug)]
enum PendingOp {
    Store { key: String, body: Value },
    Delete { key: String },
}

/// In-memory [`DocumentStore`] backend.
///
/// Keys are `{collection}/{id}`, so a collection scan is one key-range
/// walk over the ordered map. Suitable for tests and single-node use.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    documents: Documents,
}

impl MemoryDocumentStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn open_session(&self) -> AppResult<Box<dyn DocumentSession>> {
        Ok(Box::new(MemorySession {
            documents: Arc::clone(&self.documents),
            pending: Vec::new(),
        }))
    }
}

/// Session over the memory store. Buffers writes until `save_changes`,
/// which applies them under one write-lock acquisition; dropping the
/// session discards whatever was buffered.
struct MemorySession {
    documents: Documents,
    pending: Vec<PendingOp>,
}

#[async_trait]
impl DocumentSession for MemorySession {
    async fn load(&self, key: &str) -> AppResult<Option<Value>> {
        let documents = self.documents.read().await;
        Ok(documents.get(key).cloned())
    }

    async fn query(&self, collection: &str, filters: &[FilterField]) -> AppResult<Vec<Document>> {
        let prefix = format!("{collection}/");
        let documents = self.documents.read().await;
        let matched: Vec<Document> = documents
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .filter(|(_, body)| filters.iter().all(|f| f.matches(body)))
            .map(|(key, body)| Document {
                key: key.clone(),
                body: body.clone(),
            })
            .collect();
        debug!(
            collection = collection,
            filters = filters.len(),
            matched = matched.len(),
            "Query executed"
        );
        Ok(matched)
    }

    fn store(&mut self, key: &str, body: Value) {
        self.pending.push(PendingOp::Store {
            key: key.to_string(),
            body,
        });
    }

    fn delete(&mut self, key: &str) {
        self.pending.push(PendingOp::Delete {
            key: key.to_string(),
        });
    }

    async fn save_changes(&mut self) -> AppResult<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        // One lock acquisition for the whole batch: readers see either
        // none or all of this session's writes.
        let mut documents = self.documents.write().await;
        let applied = self.pending.len();
        for op in self.pending.drain(..) {
            match op {
                PendingOp::Store { key, body } => {
                    documents.insert(key, body);
                }
                PendingOp::Delete { key } => {
                    documents.remove(&key);
                }
            }
        }
        debug!(writes = applied, "Session committed");
        Ok(())
    }
}
