//! Session persistence over the document store

use std::sync::Arc;

use eyre::eyre;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::config::StoreConfig;
use crate::plan::Plan;
use docstore::{DocKey, DocStore, FileStore, MemoryStore, Patch, StoreError};

use super::state::{SessionState, SessionUpdate};

/// Collection holding one document per conversation
pub const SESSIONS: &str = "sessions";

/// Collection holding committed plans
pub const PLANS: &str = "plans";

/// Errors from session persistence
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No authenticated user for this request")]
    AuthenticationMissing,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Generate a fresh conversation id
pub fn new_conversation_id() -> String {
    Uuid::now_v7().to_string()
}

/// Create a document store based on the backend specified in config
pub fn create_store(config: &StoreConfig) -> eyre::Result<Arc<dyn DocStore>> {
    debug!(backend = %config.backend, "create_store: called");
    match config.backend.as_str() {
        "memory" => Ok(Arc::new(MemoryStore::new())),
        "file" => {
            let base = match &config.base_dir {
                Some(dir) => dir.clone(),
                None => dirs::data_dir()
                    .ok_or_else(|| eyre!("No data directory available; set store.base-dir"))?
                    .join("plancoach"),
            };
            Ok(Arc::new(FileStore::open(base)?))
        }
        other => Err(eyre!("Unknown store backend: '{}'. Supported: memory, file", other)),
    }
}

/// Reads and merge-writes session documents for one store
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn DocStore>,
}

impl SessionStore {
    pub fn new(store: Arc<dyn DocStore>) -> Self {
        Self { store }
    }

    fn key(&self, user_id: &str, doc_id: &str) -> SessionResult<DocKey> {
        if user_id.is_empty() {
            return Err(SessionError::AuthenticationMissing);
        }
        Ok(DocKey {
            user_id: user_id.to_string(),
            doc_id: doc_id.to_string(),
        })
    }

    /// Load a conversation's state, if the conversation exists
    pub async fn load(&self, user_id: &str, conversation_id: &str) -> SessionResult<Option<SessionState>> {
        let key = self.key(user_id, conversation_id)?;
        debug!(%key, "SessionStore::load: called");
        let doc = match self.store.get(SESSIONS, &key).await? {
            Some(doc) => doc,
            None => return Ok(None),
        };
        let mut state: SessionState = serde_json::from_value(Value::Object(doc))?;
        state.conversation_id = conversation_id.to_string();
        Ok(Some(state))
    }

    /// Merge one turn's update into the stored document
    pub async fn apply(&self, user_id: &str, conversation_id: &str, update: &SessionUpdate) -> SessionResult<()> {
        let key = self.key(user_id, conversation_id)?;
        let patches = update.into_patches()?;
        debug!(%key, patch_count = patches.len(), "SessionStore::apply: called");
        if patches.is_empty() {
            return Ok(());
        }
        self.store.merge(SESSIONS, &key, patches).await?;
        Ok(())
    }

    /// Persist an accepted plan and return its document id
    pub async fn commit_plan(&self, user_id: &str, plan: &Plan) -> SessionResult<String> {
        let doc_id = Uuid::now_v7().to_string();
        let key = self.key(user_id, &doc_id)?;
        debug!(%key, kind = %plan.kind(), "SessionStore::commit_plan: called");

        let value = serde_json::to_value(plan)?;
        let patches = match value {
            Value::Object(map) => map
                .into_iter()
                .map(|(k, v)| (k, Patch::Set(v)))
                .collect(),
            // Plans always serialize to objects
            other => return Err(SessionError::Json(serde::de::Error::custom(format!(
                "plan serialized to non-object value: {other}"
            )))),
        };
        self.store.merge(PLANS, &key, patches).await?;
        Ok(doc_id)
    }
}
