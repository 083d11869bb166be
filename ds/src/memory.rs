//! In-memory DocStore implementation

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::store::{DocKey, DocStore, Document, Patch, StoreResult, apply_patches};

/// In-memory document store
///
/// Used by tests and embedded deployments. Each merge holds the write lock
/// for the duration of the patch application, so individual merges are
/// atomic.
#[derive(Default)]
pub struct MemoryStore {
    docs: RwLock<HashMap<(String, DocKey), Document>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents across all collections (for tests)
    pub async fn len(&self) -> usize {
        self.docs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.docs.read().await.is_empty()
    }
}

#[async_trait]
impl DocStore for MemoryStore {
    async fn get(&self, collection: &str, key: &DocKey) -> StoreResult<Option<Document>> {
        debug!(collection, %key, "MemoryStore::get: called");
        let docs = self.docs.read().await;
        Ok(docs.get(&(collection.to_string(), key.clone())).cloned())
    }

    async fn merge(&self, collection: &str, key: &DocKey, patches: HashMap<String, Patch>) -> StoreResult<()> {
        debug!(collection, %key, patch_count = patches.len(), "MemoryStore::merge: called");
        let mut docs = self.docs.write().await;
        let doc = docs.entry((collection.to_string(), key.clone())).or_default();
        apply_patches(doc, patches);
        Ok(())
    }

    async fn delete(&self, collection: &str, key: &DocKey) -> StoreResult<()> {
        debug!(collection, %key, "MemoryStore::delete: called");
        let mut docs = self.docs.write().await;
        docs.remove(&(collection.to_string(), key.clone()));
        Ok(())
    }
}
