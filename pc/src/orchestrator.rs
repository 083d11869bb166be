//! Conversation orchestrator
//!
//! Drives one turn end to end: load session, call the model, extract and
//! validate any candidate plan, run the transition rules, persist. Nothing
//! is written to the store until the model call has fully completed, so an
//! abandoned or failed turn leaves the prior state intact.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::classify::classify;
use crate::llm::{ChatMessage, CompletionRequest, LlmClient, LlmError, StreamChunk, name_conversation};
use crate::prompts::{PromptContext, PromptLoader};
use crate::session::{
    FieldUpdate, ChatMode, SessionError, SessionState, SessionStore, TurnAction, evaluate_turn,
};
use crate::validate::validate;

/// Errors from driving a conversation turn
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Prompt error: {0}")]
    Prompt(String),
}

/// Outcome of one turn, returned to the caller
#[derive(Debug)]
pub struct TurnResult {
    /// The assistant's full reply text
    pub response_text: String,
    pub action: TurnAction,
    /// Document id of the committed plan, when the turn accepted one
    pub plan_id: Option<String>,
    /// The session state after this turn
    pub session: SessionState,
}

/// Drives conversation turns against one store and one model
pub struct Orchestrator {
    llm: Arc<dyn LlmClient>,
    sessions: SessionStore,
    prompts: PromptLoader,
    max_tokens: u32,
}

impl Orchestrator {
    pub fn new(llm: Arc<dyn LlmClient>, sessions: SessionStore, prompts: PromptLoader, max_tokens: u32) -> Self {
        Self {
            llm,
            sessions,
            prompts,
            max_tokens,
        }
    }

    /// Run one blocking turn
    pub async fn step(
        &self,
        user_id: &str,
        conversation_id: &str,
        chat_mode: ChatMode,
        user_input: &str,
    ) -> Result<TurnResult, TurnError> {
        let (state, request) = self.prepare(user_id, conversation_id, chat_mode, user_input).await?;
        let response = self.llm.complete(request).await?;
        self.finish(user_id, state, user_input, response.content).await
    }

    /// Run one streaming turn.
    ///
    /// Text chunks are forwarded to `chunk_tx` as they arrive; extraction,
    /// validation, and the session write happen only once the stream has
    /// completed, on the assembled text.
    pub async fn step_streaming(
        &self,
        user_id: &str,
        conversation_id: &str,
        chat_mode: ChatMode,
        user_input: &str,
        chunk_tx: mpsc::Sender<StreamChunk>,
    ) -> Result<TurnResult, TurnError> {
        let (state, request) = self.prepare(user_id, conversation_id, chat_mode, user_input).await?;
        let response = self.llm.stream(request, chunk_tx).await?;
        self.finish(user_id, state, user_input, response.content).await
    }

    /// Load (or create) the session and build the completion request
    async fn prepare(
        &self,
        user_id: &str,
        conversation_id: &str,
        chat_mode: ChatMode,
        user_input: &str,
    ) -> Result<(SessionState, CompletionRequest), TurnError> {
        let state = match self.sessions.load(user_id, conversation_id).await? {
            Some(state) => state,
            None => {
                debug!(%conversation_id, %chat_mode, "Orchestrator::prepare: new conversation");
                SessionState::new(conversation_id, chat_mode, now_ms())
            }
        };

        let system_prompt = self
            .prompts
            .render(state.chat_mode, &PromptContext::now())
            .map_err(|e| TurnError::Prompt(e.to_string()))?;

        let mut messages = state.messages.clone();
        messages.push(ChatMessage::user(user_input));

        let request = CompletionRequest {
            system_prompt,
            messages,
            max_tokens: self.max_tokens,
        };
        Ok((state, request))
    }

    /// Post-process the assistant's full reply and persist the turn
    async fn finish(
        &self,
        user_id: &str,
        state: SessionState,
        user_input: &str,
        assistant_text: String,
    ) -> Result<TurnResult, TurnError> {
        let classification = classify(&assistant_text, state.chat_mode);
        let payload = extract_plan_json(&assistant_text)
            .map(|raw| {
                let outcome = validate(state.chat_mode.plan_kind(), &raw);
                (raw, outcome)
            });

        let mut eval = evaluate_turn(&state, user_input, &assistant_text, classification, payload, now_ms());

        // Title the conversation on its first turn; failure just leaves it
        // untitled
        if state.title.is_none() && state.messages.is_empty() {
            if let Some(title) = name_conversation(&self.llm, user_input).await {
                eval.update.title = FieldUpdate::Set(title);
            }
        }

        // The plan and the session live in separate documents and the store
        // has no transaction across them. If the session write below fails,
        // the plan stays committed and a retried turn writes a second copy
        // under a fresh id.
        let plan_id = match &eval.action {
            TurnAction::AcceptPlan(plan) => {
                let id = self.sessions.commit_plan(user_id, plan).await?;
                info!(conversation_id = %state.conversation_id, plan_id = %id, "Orchestrator::finish: plan committed");
                Some(id)
            }
            _ => None,
        };

        self.sessions.apply(user_id, &state.conversation_id, &eval.update).await?;

        let mut session = state;
        eval.update.apply_to(&mut session);

        Ok(TurnResult {
            response_text: assistant_text,
            action: eval.action,
            plan_id,
            session,
        })
    }
}

/// Pull a candidate plan object out of assistant text.
///
/// Prefers a ```json fenced block; falls back to the outermost brace pair.
/// Anything that is not a JSON object is ignored.
fn extract_plan_json(text: &str) -> Option<Value> {
    if let Some(start) = text.find("```json") {
        let rest = &text[start + "```json".len()..];
        if let Some(end) = rest.find("```")
            && let Ok(value) = serde_json::from_str::<Value>(rest[..end].trim())
            && value.is_object()
        {
            return Some(value);
        }
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str::<Value>(&text[start..=end])
        .ok()
        .filter(|v| v.is_object())
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
