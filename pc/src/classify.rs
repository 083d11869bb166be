//! Coarse intent classification of assistant output
//!
//! Deliberately a low-fidelity heuristic: it decides whether the assistant
//! is still asking the user questions or has settled into the active mode,
//! and nothing more. It must stay this crude; anything smarter belongs in
//! the model prompt, not here.

use tracing::debug;

use crate::session::{ChatMode, Intent};

const CLARIFYING_CONFIDENCE: f64 = 0.3;
const MODE_CONFIDENCE: f64 = 0.5;

/// Classifier output for one assistant turn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub intent: Intent,
    pub confidence: f64,
}

/// Classify an assistant message given the conversation's active mode.
///
/// A question mark or an interrogative keyword marks the turn as
/// clarifying; otherwise the intent echoes the mode.
pub fn classify(assistant_text: &str, chat_mode: ChatMode) -> Classification {
    let lowered = assistant_text.to_lowercase();
    let clarifying = assistant_text.contains('?')
        || lowered.contains("what")
        || lowered.contains("when")
        || lowered.contains("how");

    let classification = if clarifying {
        Classification {
            intent: Intent::Clarifying,
            confidence: CLARIFYING_CONFIDENCE,
        }
    } else {
        Classification {
            intent: chat_mode.into(),
            confidence: MODE_CONFIDENCE,
        }
    };
    debug!(
        "classify: mode={} intent={} confidence={}",
        chat_mode, classification.intent, classification.confidence
    );
    classification
}
