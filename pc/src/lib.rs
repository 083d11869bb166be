//! PlanCoach - conversational habit and task plan engine
//!
//! PlanCoach turns a back-and-forth conversation into a validated,
//! persisted plan. The model proposes; this crate validates, tracks the
//! conversation's state, and commits.
//!
//! # Core Concepts
//!
//! - **Model output is untrusted**: every candidate plan is structurally
//!   validated and cross-checked before anything is committed
//! - **Collect, don't bail**: validation reports every violation at once,
//!   so one turn can repair several fields
//! - **Merge-writes only**: session updates touch exactly the fields a
//!   turn changed; clearing a field is a deletion, never a null write
//!
//! # Modules
//!
//! - [`plan`] - habit and task plan data model
//! - [`validate`] - structural and schedule-consistency validation
//! - [`classify`] - coarse intent heuristic over assistant text
//! - [`session`] - per-conversation state, transitions, persistence
//! - [`orchestrator`] - drives one conversation turn end to end
//! - [`llm`] - LLM client trait and OpenAI implementation
//! - [`prompts`] - system prompt templates
//! - [`config`] - configuration types and loading

pub mod classify;
pub mod config;
pub mod llm;
pub mod orchestrator;
pub mod plan;
pub mod prompts;
pub mod session;
pub mod validate;

// Re-export commonly used types
pub use classify::{Classification, classify};
pub use config::{Config, LlmConfig};
pub use llm::{ChatMessage, CompletionRequest, CompletionResponse, LlmClient, LlmError, OpenAIClient, create_client};
pub use orchestrator::{Orchestrator, TurnError, TurnResult};
pub use plan::{HabitPlan, Plan, PlanKind, TaskPlan};
pub use session::{ChatMode, Intent, SessionPhase, SessionState, SessionStore, TurnAction, create_store};
pub use validate::{Violation, ViolationKind, validate};
