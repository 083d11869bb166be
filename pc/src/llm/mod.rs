//! LLM client module
//!
//! Provides the completion abstraction the orchestrator talks to, plus the
//! OpenAI implementation.

use std::sync::Arc;

use tracing::debug;

pub mod client;
mod error;
mod openai;
mod types;

pub use client::LlmClient;
pub use error::LlmError;
pub use openai::OpenAIClient;
pub use types::{ChatMessage, CompletionRequest, CompletionResponse, Role, StreamChunk, TokenUsage};

use crate::config::LlmConfig;

/// Create an LLM client based on the provider specified in config
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    debug!(provider = %config.provider, model = %config.model, "create_client: called");
    match config.provider.as_str() {
        "openai" => Ok(Arc::new(OpenAIClient::from_config(config)?)),
        other => Err(LlmError::InvalidResponse(format!(
            "Unknown LLM provider: '{}'. Supported: openai",
            other
        ))),
    }
}

/// Generate a short conversation title from the first user message.
///
/// Best effort: any failure just means the conversation stays untitled.
pub async fn name_conversation(llm: &Arc<dyn LlmClient>, text: &str) -> Option<String> {
    debug!(text_len = text.len(), "name_conversation: called");

    let system_prompt = "Generate a 3-5 word title for this conversation. \
                         Output ONLY the title, nothing else. \
                         No quotes, no trailing punctuation.";

    let request = CompletionRequest {
        system_prompt: system_prompt.to_string(),
        messages: vec![ChatMessage::user(text)],
        max_tokens: 50,
    };

    match llm.complete(request).await {
        Ok(response) => {
            let title = response.content.trim().trim_matches('"').to_string();
            debug!(%title, "name_conversation: generated");
            (!title.is_empty()).then_some(title)
        }
        Err(e) => {
            debug!(error = %e, "name_conversation: LLM call failed");
            None
        }
    }
}
