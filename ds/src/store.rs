//! Core store types: keys, patches, errors, and the `DocStore` trait

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

/// A stored document is a JSON object (field name -> value).
pub type Document = Map<String, Value>;

/// Errors from store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Stored document is not a JSON object: {0}")]
    NotAnObject(String),
}

/// Result alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// A single field-level write operation.
///
/// `Set(Value::Null)` stores an explicit JSON null; `Delete` removes the
/// field entirely so subsequent reads see it as absent. A field with no
/// patch in a merge is never touched.
#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
    Set(Value),
    Delete,
}

/// Key for a document: owning user plus document id
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocKey {
    pub user_id: String,
    pub doc_id: String,
}

impl DocKey {
    pub fn new(user_id: impl Into<String>, doc_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            doc_id: doc_id.into(),
        }
    }
}

impl std::fmt::Display for DocKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.user_id, self.doc_id)
    }
}

/// Document store interface
///
/// Injected into consumers rather than accessed through a global, so tests
/// can run against [`crate::MemoryStore`] without touching disk.
#[async_trait]
pub trait DocStore: Send + Sync {
    /// Read a document. `Ok(None)` when the document does not exist.
    async fn get(&self, collection: &str, key: &DocKey) -> StoreResult<Option<Document>>;

    /// Merge-write a set of field patches into a document, creating the
    /// document if it does not exist.
    async fn merge(&self, collection: &str, key: &DocKey, patches: HashMap<String, Patch>) -> StoreResult<()>;

    /// Delete an entire document. Deleting a missing document is a no-op.
    async fn delete(&self, collection: &str, key: &DocKey) -> StoreResult<()>;
}

/// Apply field patches to a document in place.
///
/// Shared by store implementations so merge semantics cannot drift between
/// them.
pub fn apply_patches(doc: &mut Document, patches: HashMap<String, Patch>) {
    debug!(patch_count = patches.len(), "apply_patches: called");
    for (field, patch) in patches {
        match patch {
            Patch::Set(value) => {
                doc.insert(field, value);
            }
            Patch::Delete => {
                doc.remove(&field);
            }
        }
    }
}
