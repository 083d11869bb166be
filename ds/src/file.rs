//! File-backed DocStore implementation
//!
//! One JSON file per document: `<base>/<collection>/<user_id>/<doc_id>.json`.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::store::{DocKey, DocStore, Document, Patch, StoreError, StoreResult, apply_patches};

/// File-backed document store
pub struct FileStore {
    base_path: PathBuf,
    /// Serializes read-modify-write cycles so each merge is atomic
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open or create a store rooted at the given directory
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let base_path = path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path)?;
        debug!(?base_path, "Opened file store");
        Ok(Self {
            base_path,
            write_lock: Mutex::new(()),
        })
    }

    fn doc_path(&self, collection: &str, key: &DocKey) -> PathBuf {
        self.base_path
            .join(collection)
            .join(&key.user_id)
            .join(format!("{}.json", key.doc_id))
    }

    fn read_doc(&self, path: &Path) -> StoreResult<Option<Document>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&content)?;
        match value {
            Value::Object(map) => Ok(Some(map)),
            _ => Err(StoreError::NotAnObject(path.display().to_string())),
        }
    }

    fn write_doc(&self, path: &Path, doc: &Document) -> StoreResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        // Write to a sibling temp file first so readers never see a torn doc
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(doc)?)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

#[async_trait]
impl DocStore for FileStore {
    async fn get(&self, collection: &str, key: &DocKey) -> StoreResult<Option<Document>> {
        debug!(collection, %key, "FileStore::get: called");
        self.read_doc(&self.doc_path(collection, key))
    }

    async fn merge(&self, collection: &str, key: &DocKey, patches: HashMap<String, Patch>) -> StoreResult<()> {
        debug!(collection, %key, patch_count = patches.len(), "FileStore::merge: called");
        let _guard = self.write_lock.lock().await;

        let path = self.doc_path(collection, key);
        let mut doc = self.read_doc(&path)?.unwrap_or_default();
        apply_patches(&mut doc, patches);
        self.write_doc(&path, &doc)
    }

    async fn delete(&self, collection: &str, key: &DocKey) -> StoreResult<()> {
        debug!(collection, %key, "FileStore::delete: called");
        let _guard = self.write_lock.lock().await;

        let path = self.doc_path(collection, key);
        if path.exists() {
            fs::remove_file(&path)?;
            info!(collection, %key, "Deleted document");
        }
        Ok(())
    }
}
