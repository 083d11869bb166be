//! Per-conversation session state and the merge-write update type
//!
//! The stored session document uses camelCase keys. Updates never overwrite
//! the whole document: every turn produces a `SessionUpdate` whose fields
//! are `Keep`, `Set`, or `Delete`, and only `Set`/`Delete` touch the store.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::llm::ChatMessage;
use crate::plan::PlanKind;
use docstore::Patch;

/// Which kind of plan a conversation is negotiating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatMode {
    Task,
    Habit,
}

impl ChatMode {
    /// The plan shape this mode validates against
    pub fn plan_kind(&self) -> PlanKind {
        match self {
            Self::Task => PlanKind::Task,
            Self::Habit => PlanKind::Habit,
        }
    }
}

impl std::fmt::Display for ChatMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Task => write!(f, "task"),
            Self::Habit => write!(f, "habit"),
        }
    }
}

/// Coarse conversational purpose, produced by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Unknown,
    Task,
    Habit,
    Clarifying,
}

impl From<ChatMode> for Intent {
    fn from(mode: ChatMode) -> Self {
        match mode {
            ChatMode::Task => Self::Task,
            ChatMode::Habit => Self::Habit,
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Task => write!(f, "task"),
            Self::Habit => write!(f, "habit"),
            Self::Clarifying => write!(f, "clarifying"),
        }
    }
}

/// Where a conversation stands, derived from stored state rather than
/// persisted. `Accepted` only ever appears on the turn that commits a plan;
/// the stored session drops back to a clean clarifying shape afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Clarifying,
    PlanProposed,
    Accepted,
}

/// One conversation's stored state
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    /// Key of the stored document, not part of the document body
    #[serde(skip)]
    pub conversation_id: String,
    pub messages: Vec<ChatMessage>,
    pub chat_mode: ChatMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_fields: Option<Vec<String>>,
    /// Raw plan draft from the last rejected extraction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Milliseconds since the Unix epoch
    pub last_updated: i64,
}

impl SessionState {
    /// Fresh state for a conversation's first turn
    pub fn new(conversation_id: impl Into<String>, chat_mode: ChatMode, now_ms: i64) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            messages: Vec::new(),
            chat_mode,
            intent: None,
            confidence: None,
            missing_fields: None,
            extracted_data: None,
            title: None,
            last_updated: now_ms,
        }
    }

    /// Phase implied by the stored fields
    pub fn phase(&self) -> SessionPhase {
        if self.extracted_data.is_some() {
            SessionPhase::PlanProposed
        } else {
            SessionPhase::Clarifying
        }
    }
}

/// A three-way field update: leave the stored value alone, overwrite it, or
/// remove it. Removal is distinct from writing null.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate<T> {
    Keep,
    Set(T),
    Delete,
}

// Manual impl: the derive would demand `T: Default`, which the payload
// types have no reason to provide
impl<T> Default for FieldUpdate<T> {
    fn default() -> Self {
        Self::Keep
    }
}

impl<T: Serialize> FieldUpdate<T> {
    /// The store patch this update translates to, if any
    fn to_patch(&self) -> Result<Option<Patch>, serde_json::Error> {
        match self {
            Self::Keep => Ok(None),
            Self::Set(value) => Ok(Some(Patch::Set(serde_json::to_value(value)?))),
            Self::Delete => Ok(Some(Patch::Delete)),
        }
    }
}

/// The merge-write a single turn produces
#[derive(Debug, Clone, Default)]
pub struct SessionUpdate {
    pub messages: FieldUpdate<Vec<ChatMessage>>,
    pub chat_mode: FieldUpdate<ChatMode>,
    pub intent: FieldUpdate<Intent>,
    pub confidence: FieldUpdate<f64>,
    pub missing_fields: FieldUpdate<Vec<String>>,
    pub extracted_data: FieldUpdate<Value>,
    pub title: FieldUpdate<String>,
    pub last_updated: FieldUpdate<i64>,
}

impl SessionUpdate {
    /// Store patches keyed by the document's camelCase field names
    pub fn into_patches(&self) -> Result<HashMap<String, Patch>, serde_json::Error> {
        let mut patches = HashMap::new();
        if let Some(p) = self.messages.to_patch()? {
            patches.insert("messages".to_string(), p);
        }
        if let Some(p) = self.chat_mode.to_patch()? {
            patches.insert("chatMode".to_string(), p);
        }
        if let Some(p) = self.intent.to_patch()? {
            patches.insert("intent".to_string(), p);
        }
        if let Some(p) = self.confidence.to_patch()? {
            patches.insert("confidence".to_string(), p);
        }
        if let Some(p) = self.missing_fields.to_patch()? {
            patches.insert("missingFields".to_string(), p);
        }
        if let Some(p) = self.extracted_data.to_patch()? {
            patches.insert("extractedData".to_string(), p);
        }
        if let Some(p) = self.title.to_patch()? {
            patches.insert("title".to_string(), p);
        }
        if let Some(p) = self.last_updated.to_patch()? {
            patches.insert("lastUpdated".to_string(), p);
        }
        Ok(patches)
    }

    /// Mirror the update onto an in-memory state, so callers can return the
    /// post-turn state without re-reading the store
    pub fn apply_to(&self, state: &mut SessionState) {
        if let FieldUpdate::Set(v) = &self.messages {
            state.messages = v.clone();
        }
        if let FieldUpdate::Set(v) = &self.chat_mode {
            state.chat_mode = *v;
        }
        match &self.intent {
            FieldUpdate::Set(v) => state.intent = Some(*v),
            FieldUpdate::Delete => state.intent = None,
            FieldUpdate::Keep => {}
        }
        match &self.confidence {
            FieldUpdate::Set(v) => state.confidence = Some(*v),
            FieldUpdate::Delete => state.confidence = None,
            FieldUpdate::Keep => {}
        }
        match &self.missing_fields {
            FieldUpdate::Set(v) => state.missing_fields = Some(v.clone()),
            FieldUpdate::Delete => state.missing_fields = None,
            FieldUpdate::Keep => {}
        }
        match &self.extracted_data {
            FieldUpdate::Set(v) => state.extracted_data = Some(v.clone()),
            FieldUpdate::Delete => state.extracted_data = None,
            FieldUpdate::Keep => {}
        }
        match &self.title {
            FieldUpdate::Set(v) => state.title = Some(v.clone()),
            FieldUpdate::Delete => state.title = None,
            FieldUpdate::Keep => {}
        }
        if let FieldUpdate::Set(v) = &self.last_updated {
            state.last_updated = *v;
        }
    }
}
