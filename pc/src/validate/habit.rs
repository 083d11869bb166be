//! Structural walk over a candidate habit plan

use serde_json::Value;
use tracing::debug;

use crate::plan::{
    DayStep, Difficulty, HabitPlan, IndexedEntry, LowLevelSchedule, Milestone, MonthDay, MonthStep,
    ProgramEntry, Reminder, Span, WeekStep, Weekday,
};

use super::consistency::check_schedule;
use super::fields::{
    nullable_string, nullable_time, nullable_u32, optional_string, require_array, require_enum,
    require_f64, require_object, require_string, require_u32,
};
use super::path::{FieldPath, Violation};

/// Walk a candidate habit document, collecting every violation.
///
/// Returns the typed plan only when the document is fully clean. The
/// schedule-consistency check runs whenever the four schedule fields parse,
/// even if other parts of the document are broken, so a single response can
/// surface structural and consistency problems together.
pub fn validate_habit(candidate: &Value, out: &mut Vec<Violation>) -> Option<HabitPlan> {
    let root = FieldPath::root();
    let map = require_object(candidate, &root, out)?;
    debug!("validate_habit: walking candidate with {} top-level fields", map.len());

    let name = require_string(map, "name", &root, out);
    let goal = require_string(map, "goal", &root, out);
    let category = require_string(map, "category", &root, out);
    let description = require_string(map, "description", &root, out);
    let difficulty: Option<Difficulty> = require_enum(map, "difficulty", "difficulty", &root, out);

    let high_level_schedule = walk_milestones(map, &root, out);
    let low_level_schedule = walk_low_level_schedule(map, &root, out);

    Some(HabitPlan {
        name: name?,
        goal: goal?,
        category: category?,
        description: description?,
        difficulty: difficulty?,
        high_level_schedule: high_level_schedule?,
        low_level_schedule: low_level_schedule?,
    })
}

fn walk_milestones(
    map: &serde_json::Map<String, Value>,
    root: &FieldPath,
    out: &mut Vec<Violation>,
) -> Option<Vec<Milestone>> {
    let (items, path) = require_array(map, "high_level_schedule", root, out, true)?;
    let mut milestones = Vec::with_capacity(items.len());
    let mut clean = true;
    for (i, item) in items.iter().enumerate() {
        match walk_milestone(item, &path.index(i), out) {
            Some(m) => milestones.push(m),
            None => clean = false,
        }
    }
    clean.then_some(milestones)
}

fn walk_milestone(value: &Value, path: &FieldPath, out: &mut Vec<Violation>) -> Option<Milestone> {
    let map = require_object(value, path, out)?;

    let index = require_u32(map, "index", path, out, 0);
    let description = require_string(map, "description", path, out);
    let completion_criteria =
        require_enum(map, "completion_criteria", "completion criteria", path, out);
    let completion_criteria_point = require_f64(map, "completion_criteria_point", path, out);
    let reward_message = require_string(map, "reward_message", path, out);

    Some(Milestone {
        index: index?,
        description: description?,
        completion_criteria: completion_criteria?,
        completion_criteria_point: completion_criteria_point?,
        reward_message: reward_message?,
    })
}

fn walk_low_level_schedule(
    map: &serde_json::Map<String, Value>,
    root: &FieldPath,
    out: &mut Vec<Violation>,
) -> Option<LowLevelSchedule> {
    let path = root.field("low_level_schedule");
    let value = match map.get("low_level_schedule") {
        Some(v) => v,
        None => {
            out.push(Violation::structural(path, "required field is missing"));
            return None;
        }
    };
    let map = require_object(value, &path, out)?;

    let span: Option<Span> = require_enum(map, "span", "span", &path, out);
    let span_value = require_u32(map, "span_value", &path, out, 1);
    let habit_schedule = nullable_u32(map, "habit_schedule", &path, out, 1);
    let habit_repeat_count = nullable_u32(map, "habit_repeat_count", &path, out, 1);

    let program = walk_program(map, span, &path, out);

    // Consistency runs independently of the program walk's outcome
    if let (Some(span), Some(span_value), Some(hs), Some(rc)) =
        (span, span_value, habit_schedule, habit_repeat_count)
    {
        check_schedule(span, span_value, hs, rc, &path, out);
    }

    Some(LowLevelSchedule {
        span: span?,
        span_value: span_value?,
        habit_schedule: habit_schedule?,
        habit_repeat_count: habit_repeat_count?,
        program: program?,
    })
}

fn walk_program(
    map: &serde_json::Map<String, Value>,
    span: Option<Span>,
    schedule_path: &FieldPath,
    out: &mut Vec<Violation>,
) -> Option<Vec<ProgramEntry>> {
    let (items, path) = require_array(map, "program", schedule_path, out, true)?;
    let mut entries = Vec::with_capacity(items.len());
    let mut clean = true;
    for (i, item) in items.iter().enumerate() {
        let entry_path = path.index(i);
        match walk_program_entry(item, &entry_path, out) {
            Some(entry) => {
                if let Some(span) = span {
                    if !entry.matches_span(span) {
                        out.push(Violation::structural(
                            entry_path,
                            format!("granularity does not match the {span} span"),
                        ));
                        clean = false;
                    }
                }
                entries.push(entry);
            }
            None => clean = false,
        }
    }
    clean.then_some(entries)
}

fn walk_program_entry(
    value: &Value,
    path: &FieldPath,
    out: &mut Vec<Violation>,
) -> Option<ProgramEntry> {
    let map = require_object(value, path, out)?;

    let mut granularities = Vec::new();
    for key in ["days_indexed", "weeks_indexed", "months_indexed"] {
        if map.contains_key(key) {
            granularities.push(key);
        }
    }
    if granularities.len() != 1 {
        out.push(Violation::structural(
            path.clone(),
            "must contain exactly one of days_indexed, weeks_indexed, months_indexed",
        ));
        return None;
    }

    match granularities[0] {
        "days_indexed" => {
            let days_indexed = walk_indexed(map, "days_indexed", path, out, walk_day_step)?;
            Some(ProgramEntry::Days { days_indexed })
        }
        "weeks_indexed" => {
            let weeks_indexed = walk_indexed(map, "weeks_indexed", path, out, walk_week_step)?;
            Some(ProgramEntry::Weeks { weeks_indexed })
        }
        _ => {
            let months_indexed = walk_indexed(map, "months_indexed", path, out, walk_month_step)?;
            Some(ProgramEntry::Months { months_indexed })
        }
    }
}

fn walk_indexed<S>(
    map: &serde_json::Map<String, Value>,
    key: &'static str,
    parent: &FieldPath,
    out: &mut Vec<Violation>,
    walk_step: fn(&Value, &FieldPath, &mut Vec<Violation>) -> Option<S>,
) -> Option<Vec<IndexedEntry<S>>> {
    let (items, path) = require_array(map, key, parent, out, true)?;
    let mut entries = Vec::with_capacity(items.len());
    let mut clean = true;
    for (i, item) in items.iter().enumerate() {
        match walk_indexed_entry(item, &path.index(i), out, walk_step) {
            Some(entry) => entries.push(entry),
            None => clean = false,
        }
    }
    clean.then_some(entries)
}

fn walk_indexed_entry<S>(
    value: &Value,
    path: &FieldPath,
    out: &mut Vec<Violation>,
    walk_step: fn(&Value, &FieldPath, &mut Vec<Violation>) -> Option<S>,
) -> Option<IndexedEntry<S>> {
    let map = require_object(value, path, out)?;

    let index = require_u32(map, "index", path, out, 1);
    let title = require_string(map, "title", path, out);
    let description = optional_string(map, "description", path, out);

    let content = require_array(map, "content", path, out, true).and_then(|(items, path)| {
        let mut steps = Vec::with_capacity(items.len());
        let mut clean = true;
        for (i, item) in items.iter().enumerate() {
            match walk_step(item, &path.index(i), out) {
                Some(step) => steps.push(step),
                None => clean = false,
            }
        }
        clean.then_some(steps)
    });

    let reminders = walk_reminders(map, path, out);

    Some(IndexedEntry {
        index: index?,
        title: title?,
        description: description?,
        content: content?,
        reminders: reminders?,
    })
}

fn walk_day_step(value: &Value, path: &FieldPath, out: &mut Vec<Violation>) -> Option<DayStep> {
    let map = require_object(value, path, out)?;
    let step = require_string(map, "step", path, out);
    let clock = nullable_time(map, "clock", path, out);
    Some(DayStep { step: step?, clock: clock? })
}

fn walk_week_step(value: &Value, path: &FieldPath, out: &mut Vec<Violation>) -> Option<WeekStep> {
    let map = require_object(value, path, out)?;
    let step = require_string(map, "step", path, out);
    let day: Option<Weekday> = require_enum(map, "day", "weekday", path, out);
    Some(WeekStep { step: step?, day: day? })
}

fn walk_month_step(value: &Value, path: &FieldPath, out: &mut Vec<Violation>) -> Option<MonthStep> {
    let map = require_object(value, path, out)?;
    let step = require_string(map, "step", path, out);

    let day_path = path.field("day");
    let day = match map.get("day") {
        None => {
            out.push(Violation::structural(day_path, "required field is missing"));
            None
        }
        Some(Value::String(s)) => match MonthDay::parse(s) {
            Some(day) => Some(day),
            None => {
                out.push(Violation::structural(
                    day_path,
                    "must be start_of_month, end_of_month, or a day 1-28",
                ));
                None
            }
        },
        Some(_) => {
            out.push(Violation::structural(day_path, "must be a string"));
            None
        }
    };

    Some(MonthStep { step: step?, day: day? })
}

fn walk_reminders(
    map: &serde_json::Map<String, Value>,
    parent: &FieldPath,
    out: &mut Vec<Violation>,
) -> Option<Vec<Reminder>> {
    let (items, path) = require_array(map, "reminders", parent, out, false)?;
    let mut reminders = Vec::with_capacity(items.len());
    let mut clean = true;
    for (i, item) in items.iter().enumerate() {
        let path = path.index(i);
        match require_object(item, &path, out) {
            Some(map) => {
                let time = nullable_time(map, "time", &path, out);
                let message = nullable_string(map, "message", &path, out);
                match (time, message) {
                    (Some(time), Some(message)) => reminders.push(Reminder { time, message }),
                    _ => clean = false,
                }
            }
            None => clean = false,
        }
    }
    clean.then_some(reminders)
}
