//! Task plan types: ordered dated steps with offset reminders

use serde::{Deserialize, Serialize};

/// Unit for a reminder offset relative to a step's date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffsetUnit {
    Days,
    Weeks,
    Months,
}

/// How far before the step date a reminder fires
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderOffset {
    pub unit: OffsetUnit,
    pub value: u32,
}

/// A reminder attached to a task step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskReminder {
    pub offset: ReminderOffset,
    /// "HH:MM" or null
    pub time: Option<String>,
    pub message: Option<String>,
}

/// One ordered step of a task
///
/// Invariant (enforced by the validator): a step without a `date` carries
/// no `time` and no `reminders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStep {
    /// 1-based position in the schedule
    pub index: u32,
    pub title: String,
    pub description: Option<String>,
    /// "YYYY-MM-DD" or null
    pub date: Option<String>,
    /// "HH:MM" or null
    pub time: Option<String>,
    pub reminders: Vec<TaskReminder>,
}

impl TaskStep {
    /// Whether this step is anchored to a calendar date
    pub fn is_dated(&self) -> bool {
        self.date.is_some()
    }
}

/// A validated task plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskPlan {
    pub name: String,
    pub goal: String,
    pub category: String,
    pub description: String,
    /// Non-empty by the validation contract
    pub task_schedule: Vec<TaskStep>,
}
