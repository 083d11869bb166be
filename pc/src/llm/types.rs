//! Request and response types for LLM completions

use serde::{Deserialize, Serialize};

/// Who authored a conversation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// One message of a conversation, as stored and as sent to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// A single completion request; no conversation state lives in the client
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
}

/// Token accounting reported by the provider
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

/// The assembled result of a completion
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub content: String,
    pub usage: TokenUsage,
}

/// Incremental events emitted during a streaming completion
#[derive(Debug, Clone)]
pub enum StreamChunk {
    /// A piece of assistant text, forwarded as soon as it arrives
    TextDelta(String),
    /// The stream finished; the full response follows from the call itself
    MessageDone { usage: TokenUsage },
    /// The provider reported an error mid-stream
    Error(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_roles_serialize_lowercase() {
        let msg = ChatMessage::assistant("hi");
        assert_eq!(serde_json::to_value(&msg).unwrap(), json!({"role": "assistant", "content": "hi"}));

        let back: ChatMessage = serde_json::from_value(json!({"role": "system", "content": "s"})).unwrap();
        assert_eq!(back.role, Role::System);
    }
}
