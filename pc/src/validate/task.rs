//! Structural walk over a candidate task plan

use serde_json::Value;
use tracing::debug;

use crate::plan::{OffsetUnit, ReminderOffset, TaskPlan, TaskReminder, TaskStep};

use super::fields::{
    nullable_date, nullable_string, nullable_time, require_array, require_enum, require_object,
    require_string, require_u32,
};
use super::path::{FieldPath, Violation};

/// Walk a candidate task document, collecting every violation.
///
/// An undated step must carry neither a time nor reminders; those checks
/// run per step as soon as the step's own fields parse.
pub fn validate_task(candidate: &Value, out: &mut Vec<Violation>) -> Option<TaskPlan> {
    let root = FieldPath::root();
    let map = require_object(candidate, &root, out)?;
    debug!("validate_task: walking candidate with {} top-level fields", map.len());

    let name = require_string(map, "name", &root, out);
    let goal = require_string(map, "goal", &root, out);
    let category = require_string(map, "category", &root, out);
    let description = require_string(map, "description", &root, out);
    let task_schedule = walk_schedule(map, &root, out);

    Some(TaskPlan {
        name: name?,
        goal: goal?,
        category: category?,
        description: description?,
        task_schedule: task_schedule?,
    })
}

fn walk_schedule(
    map: &serde_json::Map<String, Value>,
    root: &FieldPath,
    out: &mut Vec<Violation>,
) -> Option<Vec<TaskStep>> {
    let (items, path) = require_array(map, "task_schedule", root, out, true)?;
    let mut steps = Vec::with_capacity(items.len());
    let mut clean = true;
    for (i, item) in items.iter().enumerate() {
        match walk_step(item, &path.index(i), out) {
            Some(step) => steps.push(step),
            None => clean = false,
        }
    }
    clean.then_some(steps)
}

fn walk_step(value: &Value, path: &FieldPath, out: &mut Vec<Violation>) -> Option<TaskStep> {
    let map = require_object(value, path, out)?;

    let index = require_u32(map, "index", path, out, 1);
    let title = require_string(map, "title", path, out);
    let description = nullable_string(map, "description", path, out);
    let date = nullable_date(map, "date", path, out);
    let time = nullable_time(map, "time", path, out);
    let reminders = walk_reminders(map, path, out);

    // Undated steps have nothing to anchor a clock or a reminder to.
    // Checked against the raw fields so a malformed reminder item cannot
    // mask the missing anchor.
    let mut anchored = true;
    if matches!(date, Some(None)) {
        if matches!(time, Some(Some(_))) {
            out.push(Violation::consistency(
                path.field("time"),
                "must be null when the step has no date",
            ));
            anchored = false;
        }
        if matches!(map.get("reminders"), Some(Value::Array(items)) if !items.is_empty()) {
            out.push(Violation::consistency(
                path.field("reminders"),
                "must be empty when the step has no date",
            ));
            anchored = false;
        }
    }

    let step = TaskStep {
        index: index?,
        title: title?,
        description: description?,
        date: date?,
        time: time?,
        reminders: reminders?,
    };
    if !anchored {
        return None;
    }

    Some(step)
}

fn walk_reminders(
    map: &serde_json::Map<String, Value>,
    parent: &FieldPath,
    out: &mut Vec<Violation>,
) -> Option<Vec<TaskReminder>> {
    let (items, path) = require_array(map, "reminders", parent, out, false)?;
    let mut reminders = Vec::with_capacity(items.len());
    let mut clean = true;
    for (i, item) in items.iter().enumerate() {
        match walk_reminder(item, &path.index(i), out) {
            Some(r) => reminders.push(r),
            None => clean = false,
        }
    }
    clean.then_some(reminders)
}

fn walk_reminder(value: &Value, path: &FieldPath, out: &mut Vec<Violation>) -> Option<TaskReminder> {
    let map = require_object(value, path, out)?;

    let offset_path = path.field("offset");
    let offset = match map.get("offset") {
        None => {
            out.push(Violation::structural(offset_path, "required field is missing"));
            None
        }
        Some(value) => require_object(value, &offset_path, out).and_then(|map| {
            let unit: Option<OffsetUnit> = require_enum(map, "unit", "offset unit", &offset_path, out);
            let value = require_u32(map, "value", &offset_path, out, 1);
            Some(ReminderOffset { unit: unit?, value: value? })
        }),
    };

    let time = nullable_time(map, "time", path, out);
    let message = nullable_string(map, "message", path, out);

    Some(TaskReminder {
        offset: offset?,
        time: time?,
        message: message?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::path::ViolationKind;
    use serde_json::json;

    fn sample_task() -> Value {
        json!({
            "name": "Passport renewal",
            "goal": "Renew my passport before the trip",
            "category": "admin",
            "description": "Gather documents and book the appointment",
            "task_schedule": [
                {
                    "index": 1,
                    "title": "Collect documents",
                    "description": null,
                    "date": null,
                    "time": null,
                    "reminders": []
                },
                {
                    "index": 2,
                    "title": "Appointment",
                    "description": "Bring the old passport",
                    "date": "2026-09-14",
                    "time": "10:30",
                    "reminders": [
                        {
                            "offset": { "unit": "days", "value": 2 },
                            "time": "09:00",
                            "message": "Appointment in two days"
                        }
                    ]
                }
            ]
        })
    }

    #[test]
    fn test_valid_task_parses_clean() {
        let mut out = Vec::new();
        let plan = validate_task(&sample_task(), &mut out);
        assert!(out.is_empty(), "unexpected violations: {out:?}");
        let plan = plan.unwrap();
        assert_eq!(plan.task_schedule.len(), 2);
        assert!(!plan.task_schedule[0].is_dated());
        assert!(plan.task_schedule[1].is_dated());
    }

    #[test]
    fn test_undated_step_rejects_time_and_reminders() {
        let mut candidate = sample_task();
        candidate["task_schedule"][0]["time"] = json!("08:00");
        candidate["task_schedule"][0]["reminders"] = json!([
            { "offset": { "unit": "days", "value": 1 }, "time": null, "message": null }
        ]);
        let mut out = Vec::new();

        assert!(validate_task(&candidate, &mut out).is_none());
        let paths: Vec<String> = out.iter().map(|v| v.path.to_string()).collect();
        assert!(paths.contains(&"task_schedule[0].time".to_string()));
        assert!(paths.contains(&"task_schedule[0].reminders".to_string()));
        assert!(out.iter().all(|v| v.kind == ViolationKind::Consistency));
    }

    #[test]
    fn test_undated_step_with_bare_reminder_flags_reminders() {
        // The reminder item itself is malformed (no time/message keys); the
        // missing-date violation on the list must still be reported.
        let mut candidate = sample_task();
        candidate["task_schedule"][0]["reminders"] = json!([
            { "offset": { "unit": "days", "value": 1 } }
        ]);
        let mut out = Vec::new();

        assert!(validate_task(&candidate, &mut out).is_none());
        assert!(
            out.iter().any(|v| v.path.to_string() == "task_schedule[0].reminders"
                && v.kind == ViolationKind::Consistency),
            "violations: {out:?}"
        );
    }

    #[test]
    fn test_empty_schedule_rejected() {
        let mut candidate = sample_task();
        candidate["task_schedule"] = json!([]);
        let mut out = Vec::new();

        assert!(validate_task(&candidate, &mut out).is_none());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].path.to_string(), "task_schedule");
    }

    #[test]
    fn test_bad_date_and_time_formats() {
        let mut candidate = sample_task();
        candidate["task_schedule"][1]["date"] = json!("Sept 14");
        candidate["task_schedule"][1]["time"] = json!("25:00");
        let mut out = Vec::new();

        assert!(validate_task(&candidate, &mut out).is_none());
        assert_eq!(out.len(), 2);
        assert!(out.iter().any(|v| v.path.to_string() == "task_schedule[1].date"));
        assert!(out.iter().any(|v| v.path.to_string() == "task_schedule[1].time"));
    }

    #[test]
    fn test_reminder_offset_must_be_positive() {
        let mut candidate = sample_task();
        candidate["task_schedule"][1]["reminders"][0]["offset"]["value"] = json!(0);
        let mut out = Vec::new();

        assert!(validate_task(&candidate, &mut out).is_none());
        assert!(out.iter().any(|v| v.path.to_string() == "task_schedule[1].reminders[0].offset.value"));
    }
}
