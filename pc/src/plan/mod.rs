//! Plan domain types
//!
//! A Plan is the structured output negotiated from a conversation: either a
//! recurring Habit with milestone tracking and a granular program, or a
//! one-off Task with dated steps. Wire field names use snake_case for
//! schedule-specific keys (`span_value`, `habit_schedule`, `days_indexed`,
//! `completion_criteria_point`, ...).

use serde::{Deserialize, Serialize};

mod habit;
mod task;

pub use habit::{
    CompletionCriteria, DayStep, Difficulty, HabitPlan, IndexedEntry, LowLevelSchedule, Milestone, MonthDay,
    MonthStep, ProgramEntry, Reminder, Span, WeekStep, Weekday,
};
pub use task::{OffsetUnit, ReminderOffset, TaskPlan, TaskReminder, TaskStep};

/// Which plan shape a candidate is expected to take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanKind {
    Habit,
    Task,
}

impl std::fmt::Display for PlanKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Habit => write!(f, "habit"),
            Self::Task => write!(f, "task"),
        }
    }
}

/// A validated plan, ready for persistence and scheduling
///
/// The wire shape is the inner object itself (no tag): which variant a
/// candidate is parsed as is decided by the conversation's chat mode, not
/// by the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Plan {
    Habit(HabitPlan),
    Task(TaskPlan),
}

impl Plan {
    pub fn kind(&self) -> PlanKind {
        match self {
            Self::Habit(_) => PlanKind::Habit,
            Self::Task(_) => PlanKind::Task,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Habit(h) => &h.name,
            Self::Task(t) => &t.name,
        }
    }

    pub fn goal(&self) -> &str {
        match self {
            Self::Habit(h) => &h.goal,
            Self::Task(t) => &t.goal,
        }
    }
}
