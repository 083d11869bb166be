//! Turn transition rules
//!
//! `evaluate_turn` is pure: it looks at the prior state, the turn's inputs,
//! and the validation outcome, and produces the merge-write plus the action
//! to report to the caller. Persistence happens elsewhere, so a failed
//! model call or an abandoned stream never half-applies a turn.

use serde_json::Value;
use tracing::debug;

use crate::classify::Classification;
use crate::llm::ChatMessage;
use crate::plan::Plan;
use crate::validate::{Violation, missing_fields};

use super::state::{FieldUpdate, Intent, SessionPhase, SessionState, SessionUpdate};

/// What a completed turn means for the caller
#[derive(Debug, Clone)]
pub enum TurnAction {
    /// No plan surfaced; keep talking
    Continue,
    /// A candidate validated cleanly and should be committed
    AcceptPlan(Plan),
    /// A candidate failed validation; raw violations stay internal
    RejectPlan { missing_fields: Vec<String> },
}

/// Result of evaluating one turn
#[derive(Debug)]
pub struct TurnEvaluation {
    pub action: TurnAction,
    pub update: SessionUpdate,
    pub phase: SessionPhase,
}

/// Evaluate one completed turn.
///
/// `payload` is the extracted candidate JSON with its validation outcome,
/// when the assistant surfaced one. Acceptance clears the plan-negotiation
/// fields by deletion while messages, chat mode, and title persist.
pub fn evaluate_turn(
    state: &SessionState,
    user_input: &str,
    assistant_text: &str,
    classification: Classification,
    payload: Option<(Value, Result<Plan, Vec<Violation>>)>,
    now_ms: i64,
) -> TurnEvaluation {
    let mut messages = state.messages.clone();
    messages.push(ChatMessage::user(user_input));
    messages.push(ChatMessage::assistant(assistant_text));

    let mut update = SessionUpdate {
        messages: FieldUpdate::Set(messages),
        chat_mode: FieldUpdate::Set(state.chat_mode),
        last_updated: FieldUpdate::Set(now_ms),
        ..Default::default()
    };

    match payload {
        Some((_, Ok(plan))) => {
            debug!(conversation_id = %state.conversation_id, "evaluate_turn: plan accepted");
            update.intent = FieldUpdate::Delete;
            update.confidence = FieldUpdate::Delete;
            update.missing_fields = FieldUpdate::Delete;
            update.extracted_data = FieldUpdate::Delete;
            TurnEvaluation {
                action: TurnAction::AcceptPlan(plan),
                update,
                phase: SessionPhase::Accepted,
            }
        }
        Some((raw, Err(violations))) => {
            let fields = missing_fields(&violations);
            debug!(
                conversation_id = %state.conversation_id,
                violation_count = violations.len(),
                ?fields,
                "evaluate_turn: plan rejected"
            );
            update.intent = FieldUpdate::Set(classification.intent);
            update.confidence = FieldUpdate::Set(classification.confidence);
            update.missing_fields = FieldUpdate::Set(fields.clone());
            update.extracted_data = FieldUpdate::Set(raw);
            TurnEvaluation {
                action: TurnAction::RejectPlan { missing_fields: fields },
                update,
                phase: SessionPhase::Clarifying,
            }
        }
        None => {
            debug!(
                conversation_id = %state.conversation_id,
                intent = %classification.intent,
                "evaluate_turn: no candidate, continuing"
            );
            update.intent = FieldUpdate::Set(classification.intent);
            update.confidence = FieldUpdate::Set(classification.confidence);
            let phase = if classification.intent == Intent::Clarifying {
                SessionPhase::Clarifying
            } else {
                state.phase()
            };
            TurnEvaluation {
                action: TurnAction::Continue,
                update,
                phase,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::ChatMode;
    use crate::validate::{FieldPath, Violation};
    use serde_json::json;

    fn clarifying() -> Classification {
        Classification {
            intent: Intent::Clarifying,
            confidence: 0.3,
        }
    }

    #[test]
    fn test_continue_turn_appends_messages_and_persists_classifier() {
        let mut state = SessionState::new("c1", ChatMode::Habit, 0);
        state.messages.push(ChatMessage::user("earlier"));

        let eval = evaluate_turn(&state, "every morning", "What time works best?", clarifying(), None, 5_000);

        assert!(matches!(eval.action, TurnAction::Continue));
        assert_eq!(eval.phase, SessionPhase::Clarifying);
        match &eval.update.messages {
            FieldUpdate::Set(messages) => {
                assert_eq!(messages.len(), 3);
                assert_eq!(messages[1].content, "every morning");
                assert_eq!(messages[2].content, "What time works best?");
            }
            other => panic!("expected message set, got {other:?}"),
        }
        assert_eq!(eval.update.intent, FieldUpdate::Set(Intent::Clarifying));
        assert_eq!(eval.update.confidence, FieldUpdate::Set(0.3));
        // Plan fields are untouched, not cleared
        assert_eq!(eval.update.missing_fields, FieldUpdate::Keep);
        assert_eq!(eval.update.extracted_data, FieldUpdate::Keep);
    }

    #[test]
    fn test_acceptance_deletes_plan_fields_and_keeps_the_rest() {
        let state = SessionState::new("c1", ChatMode::Task, 0);
        let plan: Plan = serde_json::from_value(json!({
            "name": "n", "goal": "g", "category": "c", "description": "d",
            "task_schedule": [
                {"index": 1, "title": "t", "description": null, "date": null, "time": null, "reminders": []}
            ]
        }))
        .unwrap();

        let eval = evaluate_turn(
            &state,
            "looks good",
            "Committed!",
            Classification {
                intent: Intent::Task,
                confidence: 0.5,
            },
            Some((json!({}), Ok(plan))),
            9_000,
        );

        assert!(matches!(eval.action, TurnAction::AcceptPlan(_)));
        assert_eq!(eval.phase, SessionPhase::Accepted);
        assert_eq!(eval.update.intent, FieldUpdate::Delete);
        assert_eq!(eval.update.confidence, FieldUpdate::Delete);
        assert_eq!(eval.update.missing_fields, FieldUpdate::Delete);
        assert_eq!(eval.update.extracted_data, FieldUpdate::Delete);
        assert!(matches!(eval.update.messages, FieldUpdate::Set(_)));
        assert_eq!(eval.update.title, FieldUpdate::Keep);
    }

    #[test]
    fn test_rejection_persists_draft_and_missing_fields() {
        let state = SessionState::new("c1", ChatMode::Habit, 0);
        let draft = json!({"name": "half a habit"});
        let violations = vec![
            Violation::structural(FieldPath::root().field("difficulty"), "required field is missing"),
            Violation::structural(FieldPath::root().field("low_level_schedule"), "required field is missing"),
        ];

        let eval = evaluate_turn(
            &state,
            "here you go",
            "Here's your plan!",
            Classification {
                intent: Intent::Habit,
                confidence: 0.5,
            },
            Some((draft.clone(), Err(violations))),
            9_000,
        );

        match &eval.action {
            TurnAction::RejectPlan { missing_fields } => {
                assert_eq!(missing_fields, &["difficulty", "low_level_schedule"]);
            }
            other => panic!("expected rejection, got {other:?}"),
        }
        assert_eq!(eval.phase, SessionPhase::Clarifying);
        assert_eq!(eval.update.extracted_data, FieldUpdate::Set(draft));
        assert_eq!(
            eval.update.missing_fields,
            FieldUpdate::Set(vec!["difficulty".to_string(), "low_level_schedule".to_string()])
        );
    }

    #[test]
    fn test_non_clarifying_continue_keeps_proposed_phase() {
        let mut state = SessionState::new("c1", ChatMode::Habit, 0);
        state.extracted_data = Some(json!({"name": "draft"}));

        let eval = evaluate_turn(
            &state,
            "ok",
            "Sounds good.",
            Classification {
                intent: Intent::Habit,
                confidence: 0.5,
            },
            None,
            5_000,
        );

        assert_eq!(eval.phase, SessionPhase::PlanProposed);
    }
}
