//! Candidate plan validation
//!
//! Validation never stops at the first problem: the walkers visit every
//! independent field and return the full violation list, so one model
//! round-trip can repair several fields at once.

use serde_json::Value;
use tracing::debug;

use crate::plan::{Plan, PlanKind};

mod consistency;
mod fields;
mod habit;
mod path;
mod task;

pub use consistency::{TOLERANCE_DAYS, expected_days, is_consistent};
pub use path::{FieldPath, Violation, ViolationKind};

/// Validate a candidate document against the shape `kind` demands.
///
/// `Ok` carries the typed plan; `Err` carries at least one violation.
pub fn validate(kind: PlanKind, candidate: &Value) -> Result<Plan, Vec<Violation>> {
    let mut violations = Vec::new();
    let plan = match kind {
        PlanKind::Habit => habit::validate_habit(candidate, &mut violations).map(Plan::Habit),
        PlanKind::Task => task::validate_task(candidate, &mut violations).map(Plan::Task),
    };
    debug!(
        "validate: kind={} violations={} parsed={}",
        kind,
        violations.len(),
        plan.is_some()
    );
    match plan {
        Some(plan) if violations.is_empty() => Ok(plan),
        _ => {
            if violations.is_empty() {
                // Unreachable by construction of the walkers, but never
                // report a rejection with an empty violation list.
                violations.push(Violation::structural(
                    FieldPath::root(),
                    "candidate could not be parsed",
                ));
            }
            Err(violations)
        }
    }
}

/// Deduplicated leaf field names for the session's missing-field list,
/// in first-seen order
pub fn missing_fields(violations: &[Violation]) -> Vec<String> {
    let mut fields = Vec::new();
    for violation in violations {
        let name = match violation.path.leaf_field() {
            Some(name) => name.to_string(),
            None => continue,
        };
        if !fields.contains(&name) {
            fields.push(name);
        }
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wrong_kind_rejects() {
        // A habit-shaped document validated as a task is missing task_schedule
        let habit_shaped = json!({
            "name": "x", "goal": "y", "category": "z", "description": "d",
            "difficulty": "beginner"
        });
        let violations = validate(PlanKind::Task, &habit_shaped).unwrap_err();
        assert!(violations.iter().any(|v| v.path.to_string() == "task_schedule"));
    }

    #[test]
    fn test_non_object_candidate() {
        let violations = validate(PlanKind::Habit, &json!([1, 2, 3])).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path.to_string(), "$");
    }

    #[test]
    fn test_missing_fields_dedupes_and_keeps_order() {
        let violations = vec![
            Violation::structural(FieldPath::root().field("difficulty"), "required field is missing"),
            Violation::structural(
                FieldPath::root().field("task_schedule").index(0).field("time"),
                "must be null when the step has no date",
            ),
            Violation::structural(
                FieldPath::root().field("task_schedule").index(2).field("time"),
                "must be null when the step has no date",
            ),
        ];
        assert_eq!(missing_fields(&violations), vec!["difficulty", "time"]);
    }

    #[test]
    fn test_missing_fields_skips_rootless_paths() {
        let violations = vec![Violation::structural(FieldPath::root(), "must be an object")];
        assert!(missing_fields(&violations).is_empty());
    }
}
