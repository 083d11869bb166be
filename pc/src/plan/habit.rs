//! Habit plan types: milestones, spans, and the granular program

use serde::{Deserialize, Serialize};

/// Habit difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

/// How a milestone is considered complete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionCriteria {
    StreakOfDays,
    StreakOfWeeks,
    StreakOfMonths,
    Percentage,
}

/// A progress-tracking milestone, independent of day-to-day steps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    /// Conventionally follows array order; uniqueness is recommended,
    /// not enforced
    pub index: u32,
    pub description: String,
    pub completion_criteria: CompletionCriteria,
    pub completion_criteria_point: f64,
    pub reward_message: String,
}

/// Repetition unit of the low-level schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Span {
    Day,
    Week,
    Month,
    Year,
}

impl Span {
    /// Day count used by the schedule-consistency check.
    ///
    /// Months and years are approximated (30/365) on purpose; the values
    /// are part of the validation contract for stored plans and must not
    /// be made calendar-accurate.
    pub fn days_per_span(&self) -> u32 {
        match self {
            Self::Day => 1,
            Self::Week => 7,
            Self::Month => 30,
            Self::Year => 365,
        }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Day => write!(f, "day"),
            Self::Week => write!(f, "week"),
            Self::Month => write!(f, "month"),
            Self::Year => write!(f, "year"),
        }
    }
}

/// A reminder attached to a program entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    /// "HH:MM" or null
    pub time: Option<String>,
    pub message: Option<String>,
}

/// One step of a day-granularity program entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayStep {
    pub step: String,
    /// "HH:MM" or null
    pub clock: Option<String>,
}

/// Day of the week for week-granularity steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

/// One step of a week-granularity program entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekStep {
    pub step: String,
    pub day: Weekday,
}

/// Day-of-month designator for month-granularity steps
///
/// Numeric days are capped at 28 so every entry exists in every month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthDay {
    StartOfMonth,
    EndOfMonth,
    Day(u8),
}

impl MonthDay {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "start_of_month" => Some(Self::StartOfMonth),
            "end_of_month" => Some(Self::EndOfMonth),
            _ => match s.parse::<u8>() {
                Ok(n) if (1..=28).contains(&n) => Some(Self::Day(n)),
                _ => None,
            },
        }
    }
}

// Display is also the wire encoding, so keep it next to `parse`.
impl std::fmt::Display for MonthDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StartOfMonth => write!(f, "start_of_month"),
            Self::EndOfMonth => write!(f, "end_of_month"),
            Self::Day(n) => write!(f, "{}", n),
        }
    }
}

impl Serialize for MonthDay {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for MonthDay {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid month day '{s}': expected start_of_month, end_of_month, or 1-28"
            ))
        })
    }
}

/// One step of a month-granularity program entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthStep {
    pub step: String,
    pub day: MonthDay,
}

/// An indexed block of program content at one granularity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedEntry<S> {
    /// 1-based position within the span
    pub index: u32,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Non-empty by the validation contract
    pub content: Vec<S>,
    pub reminders: Vec<Reminder>,
}

/// One program entry, carrying exactly one indexed collection matching the
/// schedule's span
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProgramEntry {
    Days { days_indexed: Vec<IndexedEntry<DayStep>> },
    Weeks { weeks_indexed: Vec<IndexedEntry<WeekStep>> },
    Months { months_indexed: Vec<IndexedEntry<MonthStep>> },
}

impl ProgramEntry {
    /// Span granularities this entry can serve
    pub fn matches_span(&self, span: Span) -> bool {
        match (self, span) {
            (Self::Days { .. }, Span::Day) => true,
            (Self::Weeks { .. }, Span::Week) => true,
            // Year-spanned habits are programmed month by month
            (Self::Months { .. }, Span::Month | Span::Year) => true,
            _ => false,
        }
    }
}

/// The repetitive, granular step structure of a habit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowLevelSchedule {
    pub span: Span,
    pub span_value: u32,
    /// Total duration in days; null means the habit runs forever
    pub habit_schedule: Option<u32>,
    pub habit_repeat_count: Option<u32>,
    pub program: Vec<ProgramEntry>,
}

impl LowLevelSchedule {
    /// A habit with neither a total duration nor a repeat count is infinite
    pub fn is_infinite(&self) -> bool {
        self.habit_schedule.is_none() && self.habit_repeat_count.is_none()
    }
}

/// A validated habit plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitPlan {
    pub name: String,
    pub goal: String,
    pub category: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub high_level_schedule: Vec<Milestone>,
    pub low_level_schedule: LowLevelSchedule,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_days_per_span_approximations() {
        assert_eq!(Span::Day.days_per_span(), 1);
        assert_eq!(Span::Week.days_per_span(), 7);
        assert_eq!(Span::Month.days_per_span(), 30);
        assert_eq!(Span::Year.days_per_span(), 365);
    }

    #[test]
    fn test_month_day_parse() {
        assert_eq!(MonthDay::parse("start_of_month"), Some(MonthDay::StartOfMonth));
        assert_eq!(MonthDay::parse("end_of_month"), Some(MonthDay::EndOfMonth));
        assert_eq!(MonthDay::parse("1"), Some(MonthDay::Day(1)));
        assert_eq!(MonthDay::parse("28"), Some(MonthDay::Day(28)));
        assert_eq!(MonthDay::parse("29"), None);
        assert_eq!(MonthDay::parse("0"), None);
        assert_eq!(MonthDay::parse("first"), None);
    }

    #[test]
    fn test_month_day_serde_roundtrip() {
        for raw in ["start_of_month", "end_of_month", "15"] {
            let day: MonthDay = serde_json::from_value(json!(raw)).unwrap();
            assert_eq!(serde_json::to_value(day).unwrap(), json!(raw));
        }
    }

    #[test]
    fn test_program_entry_untagged_wire_shape() {
        let entry = ProgramEntry::Days {
            days_indexed: vec![IndexedEntry {
                index: 1,
                title: "Morning".to_string(),
                description: None,
                content: vec![DayStep {
                    step: "Drink a glass of water".to_string(),
                    clock: Some("07:30".to_string()),
                }],
                reminders: vec![],
            }],
        };

        let value = serde_json::to_value(&entry).unwrap();
        assert!(value.get("days_indexed").is_some());
        // Absent description stays absent on the wire
        assert!(value["days_indexed"][0].get("description").is_none());

        let back: ProgramEntry = serde_json::from_value(value).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_program_entry_matches_span() {
        let days = ProgramEntry::Days { days_indexed: vec![] };
        let months = ProgramEntry::Months { months_indexed: vec![] };

        assert!(days.matches_span(Span::Day));
        assert!(!days.matches_span(Span::Week));
        assert!(months.matches_span(Span::Month));
        assert!(months.matches_span(Span::Year));
        assert!(!months.matches_span(Span::Day));
    }

    #[test]
    fn test_low_level_schedule_is_infinite() {
        let mut schedule = LowLevelSchedule {
            span: Span::Week,
            span_value: 1,
            habit_schedule: None,
            habit_repeat_count: None,
            program: vec![],
        };
        assert!(schedule.is_infinite());

        schedule.habit_schedule = Some(28);
        assert!(!schedule.is_infinite());
    }

    #[test]
    fn test_habit_plan_serde_roundtrip() {
        let plan = HabitPlan {
            name: "Morning pages".to_string(),
            goal: "Write daily".to_string(),
            category: "wellness".to_string(),
            description: "Three pages every morning".to_string(),
            difficulty: Difficulty::Beginner,
            high_level_schedule: vec![Milestone {
                index: 0,
                description: "First week done".to_string(),
                completion_criteria: CompletionCriteria::StreakOfDays,
                completion_criteria_point: 7.0,
                reward_message: "One week down!".to_string(),
            }],
            low_level_schedule: LowLevelSchedule {
                span: Span::Week,
                span_value: 1,
                habit_schedule: Some(28),
                habit_repeat_count: Some(4),
                program: vec![ProgramEntry::Weeks {
                    weeks_indexed: vec![IndexedEntry {
                        index: 1,
                        title: "Week one".to_string(),
                        description: Some("Ease in".to_string()),
                        content: vec![WeekStep {
                            step: "Write one page".to_string(),
                            day: Weekday::Monday,
                        }],
                        reminders: vec![Reminder {
                            time: Some("08:00".to_string()),
                            message: Some("Pages time".to_string()),
                        }],
                    }],
                }],
            },
        };

        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["difficulty"], json!("beginner"));
        assert_eq!(json["high_level_schedule"][0]["completion_criteria"], json!("streak_of_days"));
        assert_eq!(json["low_level_schedule"]["span"], json!("week"));
        assert_eq!(
            json["low_level_schedule"]["program"][0]["weeks_indexed"][0]["content"][0]["day"],
            json!("monday")
        );

        let back: HabitPlan = serde_json::from_value(json).unwrap();
        assert_eq!(back, plan);
    }
}
