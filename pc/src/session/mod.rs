//! Per-conversation session state, transitions, and persistence
//!
//! `state` holds the stored document shape and the merge-write update type,
//! `machine` the pure transition rules, and `store` the persistence glue.

mod machine;
mod state;
mod store;

pub use machine::{TurnAction, TurnEvaluation, evaluate_turn};
pub use state::{ChatMode, FieldUpdate, Intent, SessionPhase, SessionState, SessionUpdate};
pub use store::{PLANS, SESSIONS, SessionError, SessionResult, SessionStore, create_store, new_conversation_id};
