//! Schedule consistency checks
//!
//! A habit's low-level schedule carries two derived quantities the model
//! tends to get wrong independently: `habit_schedule` (total active days)
//! and `habit_repeat_count` (how many spans the habit runs for). When both
//! are present they must agree with `span * span_value` within a small
//! tolerance; when exactly one is null the pair is incoherent and the null
//! side is the one flagged for re-extraction.

use crate::plan::Span;
use tracing::debug;

use super::path::{FieldPath, Violation};

/// Allowed drift between the declared and computed active-day totals.
/// Spans use whole-day approximations (month = 30, year = 365), so exact
/// equality would reject correct month- and year-based schedules.
pub const TOLERANCE_DAYS: u32 = 5;

/// Total days implied by repeating `span_value`-sized spans `repeat_count` times
pub fn expected_days(span: Span, span_value: u32, repeat_count: u32) -> u32 {
    repeat_count.saturating_mul(span_value).saturating_mul(span.days_per_span())
}

/// Whether a declared day total agrees with the computed one
pub fn is_consistent(habit_schedule: u32, expected: u32) -> bool {
    habit_schedule.abs_diff(expected) <= TOLERANCE_DAYS
}

/// Check the `habit_schedule` / `habit_repeat_count` pair.
///
/// Both null means an open-ended habit and is always fine. The structural
/// walk has already flagged malformed values, so this only sees parsed ones.
pub fn check_schedule(
    span: Span,
    span_value: u32,
    habit_schedule: Option<u32>,
    habit_repeat_count: Option<u32>,
    schedule_path: &FieldPath,
    out: &mut Vec<Violation>,
) {
    match (habit_schedule, habit_repeat_count) {
        (None, None) => {
            debug!("check_schedule: open-ended habit, nothing to check");
        }
        (Some(_), None) => {
            out.push(Violation::consistency(
                schedule_path.field("habit_repeat_count"),
                "must be set when habit_schedule is set",
            ));
        }
        (None, Some(_)) => {
            out.push(Violation::consistency(
                schedule_path.field("habit_schedule"),
                "must be set when habit_repeat_count is set",
            ));
        }
        (Some(schedule), Some(repeat)) => {
            let expected = expected_days(span, span_value, repeat);
            debug!(
                "check_schedule: declared={} expected={} span={} span_value={}",
                schedule, expected, span, span_value
            );
            if !is_consistent(schedule, expected) {
                out.push(Violation::consistency(
                    schedule_path.field("habit_schedule"),
                    format!(
                        "declares {schedule} active days but {repeat} repeats of {span_value} {span} spans imply {expected}"
                    ),
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_expected_days_per_span() {
        assert_eq!(expected_days(Span::Day, 1, 30), 30);
        assert_eq!(expected_days(Span::Week, 2, 6), 84);
        assert_eq!(expected_days(Span::Month, 1, 3), 90);
        assert_eq!(expected_days(Span::Year, 1, 1), 365);
    }

    #[test]
    fn test_both_null_is_open_ended() {
        let mut out = Vec::new();
        check_schedule(Span::Week, 1, None, None, &FieldPath::root().field("low_level_schedule"), &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_exactly_one_null_flags_the_null_field() {
        let base = FieldPath::root().field("low_level_schedule");

        let mut out = Vec::new();
        check_schedule(Span::Week, 1, Some(84), None, &base, &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].path.leaf_field(), Some("habit_repeat_count"));

        let mut out = Vec::new();
        check_schedule(Span::Week, 1, None, Some(12), &base, &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].path.leaf_field(), Some("habit_schedule"));
    }

    #[test]
    fn test_tolerance_boundary() {
        // 3 months at 30 days/month = 90; 90 days a quarter really has ~91
        assert!(is_consistent(91, expected_days(Span::Month, 1, 3)));
        assert!(is_consistent(95, 90));
        assert!(!is_consistent(96, 90));
        assert!(is_consistent(85, 90));
        assert!(!is_consistent(84, 90));
    }

    #[test]
    fn test_mismatch_points_at_habit_schedule() {
        let mut out = Vec::new();
        let base = FieldPath::root().field("low_level_schedule");
        check_schedule(Span::Day, 1, Some(10), Some(30), &base, &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].path.leaf_field(), Some("habit_schedule"));
        assert!(out[0].message.contains("30"));
    }

    proptest! {
        #[test]
        fn prop_exact_totals_always_consistent(
            span_value in 1u32..=12,
            repeat in 1u32..=52,
        ) {
            for span in [Span::Day, Span::Week, Span::Month, Span::Year] {
                let expected = expected_days(span, span_value, repeat);
                prop_assert!(is_consistent(expected, expected));
            }
        }

        #[test]
        fn prop_consistency_is_symmetric_in_drift(
            expected in 1u32..=10_000,
            drift in 0u32..=20,
        ) {
            let above = is_consistent(expected + drift, expected);
            let below = is_consistent(expected.saturating_sub(drift), expected);
            // saturation at zero can only shrink the drift
            prop_assert!(above == (drift <= TOLERANCE_DAYS));
            if expected >= drift {
                prop_assert!(below == above);
            }
        }
    }
}
