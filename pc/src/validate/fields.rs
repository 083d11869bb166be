//! Helpers for walking an untyped candidate value
//!
//! Each helper records a structural violation and returns `None` when the
//! field is absent or malformed, so callers can keep walking siblings and
//! collect every independent violation instead of stopping at the first.

use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::path::{FieldPath, Violation};

/// "HH:MM", 24-hour clock
pub static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-1][0-9]|2[0-3]):[0-5][0-9]$").expect("time regex is valid"));

/// "YYYY-MM-DD"
pub static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date regex is valid"));

/// The candidate (or a nested value) must be a JSON object
pub fn require_object<'a>(
    value: &'a Value,
    path: &FieldPath,
    out: &mut Vec<Violation>,
) -> Option<&'a Map<String, Value>> {
    match value.as_object() {
        Some(map) => Some(map),
        None => {
            out.push(Violation::structural(path.clone(), "must be an object"));
            None
        }
    }
}

/// Look up a required field, recording a violation when absent
fn field<'a>(
    map: &'a Map<String, Value>,
    key: &'static str,
    parent: &FieldPath,
    out: &mut Vec<Violation>,
) -> Option<(&'a Value, FieldPath)> {
    let path = parent.field(key);
    match map.get(key) {
        Some(value) => Some((value, path)),
        None => {
            out.push(Violation::structural(path, "required field is missing"));
            None
        }
    }
}

pub fn require_string(
    map: &Map<String, Value>,
    key: &'static str,
    parent: &FieldPath,
    out: &mut Vec<Violation>,
) -> Option<String> {
    let (value, path) = field(map, key, parent, out)?;
    match value.as_str() {
        Some(s) => Some(s.to_string()),
        None => {
            out.push(Violation::structural(path, "must be a string"));
            None
        }
    }
}

/// Required field that may hold a string or an explicit null
pub fn nullable_string(
    map: &Map<String, Value>,
    key: &'static str,
    parent: &FieldPath,
    out: &mut Vec<Violation>,
) -> Option<Option<String>> {
    let (value, path) = field(map, key, parent, out)?;
    match value {
        Value::Null => Some(None),
        Value::String(s) => Some(Some(s.clone())),
        _ => {
            out.push(Violation::structural(path, "must be a string or null"));
            None
        }
    }
}

/// Optional field: absent and null are both fine
pub fn optional_string(
    map: &Map<String, Value>,
    key: &'static str,
    parent: &FieldPath,
    out: &mut Vec<Violation>,
) -> Option<Option<String>> {
    match map.get(key) {
        None | Some(Value::Null) => Some(None),
        Some(Value::String(s)) => Some(Some(s.clone())),
        Some(_) => {
            out.push(Violation::structural(parent.field(key), "must be a string"));
            None
        }
    }
}

pub fn require_f64(
    map: &Map<String, Value>,
    key: &'static str,
    parent: &FieldPath,
    out: &mut Vec<Violation>,
) -> Option<f64> {
    let (value, path) = field(map, key, parent, out)?;
    match value.as_f64() {
        Some(n) => Some(n),
        None => {
            out.push(Violation::structural(path, "must be a number"));
            None
        }
    }
}

/// Integer with a lower bound (`min = 0` non-negative, `min = 1` positive)
pub fn require_u32(
    map: &Map<String, Value>,
    key: &'static str,
    parent: &FieldPath,
    out: &mut Vec<Violation>,
    min: u32,
) -> Option<u32> {
    let (value, path) = field(map, key, parent, out)?;
    match value.as_u64() {
        Some(n) if n >= u64::from(min) && n <= u64::from(u32::MAX) => Some(n as u32),
        _ => {
            let expected = if min == 0 { "a non-negative integer" } else { "a positive integer" };
            out.push(Violation::structural(path, format!("must be {expected}")));
            None
        }
    }
}

/// Required field holding either a bounded integer or an explicit null
pub fn nullable_u32(
    map: &Map<String, Value>,
    key: &'static str,
    parent: &FieldPath,
    out: &mut Vec<Violation>,
    min: u32,
) -> Option<Option<u32>> {
    let (value, path) = field(map, key, parent, out)?;
    match value {
        Value::Null => Some(None),
        _ => match value.as_u64() {
            Some(n) if n >= u64::from(min) && n <= u64::from(u32::MAX) => Some(Some(n as u32)),
            _ => {
                let expected = if min == 0 { "a non-negative integer" } else { "a positive integer" };
                out.push(Violation::structural(path, format!("must be {expected} or null")));
                None
            }
        },
    }
}

/// Required array field, optionally rejecting empty arrays
pub fn require_array<'a>(
    map: &'a Map<String, Value>,
    key: &'static str,
    parent: &FieldPath,
    out: &mut Vec<Violation>,
    non_empty: bool,
) -> Option<(&'a Vec<Value>, FieldPath)> {
    let (value, path) = field(map, key, parent, out)?;
    match value.as_array() {
        Some(items) => {
            if non_empty && items.is_empty() {
                out.push(Violation::structural(path, "must not be empty"));
                None
            } else {
                Some((items, path))
            }
        }
        None => {
            out.push(Violation::structural(path, "must be an array"));
            None
        }
    }
}

/// "HH:MM" string or explicit null
pub fn nullable_time(
    map: &Map<String, Value>,
    key: &'static str,
    parent: &FieldPath,
    out: &mut Vec<Violation>,
) -> Option<Option<String>> {
    let (value, path) = field(map, key, parent, out)?;
    match value {
        Value::Null => Some(None),
        Value::String(s) if TIME_RE.is_match(s) => Some(Some(s.clone())),
        _ => {
            out.push(Violation::structural(path, "must be a time in HH:MM format or null"));
            None
        }
    }
}

/// "YYYY-MM-DD" string or explicit null
pub fn nullable_date(
    map: &Map<String, Value>,
    key: &'static str,
    parent: &FieldPath,
    out: &mut Vec<Violation>,
) -> Option<Option<String>> {
    let (value, path) = field(map, key, parent, out)?;
    match value {
        Value::Null => Some(None),
        Value::String(s) if DATE_RE.is_match(s) => Some(Some(s.clone())),
        _ => {
            out.push(Violation::structural(path, "must be a date in YYYY-MM-DD format or null"));
            None
        }
    }
}

/// Required enum field, parsed through the typed representation
pub fn require_enum<T: DeserializeOwned>(
    map: &Map<String, Value>,
    key: &'static str,
    what: &str,
    parent: &FieldPath,
    out: &mut Vec<Violation>,
) -> Option<T> {
    let (value, path) = field(map, key, parent, out)?;
    match serde_json::from_value::<T>(value.clone()) {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            out.push(Violation::structural(path, format!("is not a valid {what}")));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::Difficulty;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_time_regex() {
        for good in ["00:00", "07:30", "19:59", "23:59"] {
            assert!(TIME_RE.is_match(good), "{good} should match");
        }
        for bad in ["24:00", "7:30", "12:60", "12:5", "noon", "12:30:00"] {
            assert!(!TIME_RE.is_match(bad), "{bad} should not match");
        }
    }

    #[test]
    fn test_date_regex() {
        assert!(DATE_RE.is_match("2026-04-01"));
        assert!(!DATE_RE.is_match("2026-4-1"));
        assert!(!DATE_RE.is_match("April 1st"));
        // Shape-only check by design; calendar validity is not enforced
        assert!(DATE_RE.is_match("2026-99-99"));
    }

    #[test]
    fn test_require_string_missing_and_wrong_type() {
        let map = obj(json!({"name": 42}));
        let mut out = Vec::new();

        assert!(require_string(&map, "name", &FieldPath::root(), &mut out).is_none());
        assert!(require_string(&map, "goal", &FieldPath::root(), &mut out).is_none());

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].path.to_string(), "name");
        assert_eq!(out[0].message, "must be a string");
        assert_eq!(out[1].path.to_string(), "goal");
        assert_eq!(out[1].message, "required field is missing");
    }

    #[test]
    fn test_nullable_u32_accepts_null_and_positive() {
        let map = obj(json!({"a": null, "b": 28, "c": 0, "d": -3}));
        let mut out = Vec::new();

        assert_eq!(nullable_u32(&map, "a", &FieldPath::root(), &mut out, 1), Some(None));
        assert_eq!(nullable_u32(&map, "b", &FieldPath::root(), &mut out, 1), Some(Some(28)));
        assert_eq!(nullable_u32(&map, "c", &FieldPath::root(), &mut out, 1), None);
        assert_eq!(nullable_u32(&map, "d", &FieldPath::root(), &mut out, 1), None);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_require_array_non_empty() {
        let map = obj(json!({"program": []}));
        let mut out = Vec::new();

        assert!(require_array(&map, "program", &FieldPath::root(), &mut out, true).is_none());
        assert_eq!(out[0].message, "must not be empty");
    }

    #[test]
    fn test_optional_string_absent_ok() {
        let map = obj(json!({"present": "x", "wrong": 1}));
        let mut out = Vec::new();

        assert_eq!(optional_string(&map, "absent", &FieldPath::root(), &mut out), Some(None));
        assert_eq!(
            optional_string(&map, "present", &FieldPath::root(), &mut out),
            Some(Some("x".to_string()))
        );
        assert_eq!(optional_string(&map, "wrong", &FieldPath::root(), &mut out), None);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_require_enum() {
        let map = obj(json!({"difficulty": "beginner", "bad": "expert"}));
        let mut out = Vec::new();

        let parsed: Option<Difficulty> = require_enum(&map, "difficulty", "difficulty", &FieldPath::root(), &mut out);
        assert_eq!(parsed, Some(Difficulty::Beginner));

        let bad: Option<Difficulty> = require_enum(&map, "bad", "difficulty", &FieldPath::root(), &mut out);
        assert!(bad.is_none());
        assert_eq!(out.len(), 1);
        assert!(out[0].message.contains("difficulty"));
    }
}
