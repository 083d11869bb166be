//! Typed field paths and violations
//!
//! Every violation points at a field through a `FieldPath` built from typed
//! accessors, never from parsed strings, so paths cannot drift from the
//! actual wire shape.

use std::fmt;

/// One step of a field path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Segment {
    Field(&'static str),
    Index(usize),
}

/// Path to a field within a candidate plan document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FieldPath(Vec<Segment>);

impl FieldPath {
    /// Path to the document root
    pub fn root() -> Self {
        Self::default()
    }

    /// Extend with a named field
    pub fn field(&self, name: &'static str) -> Self {
        let mut segments = self.0.clone();
        segments.push(Segment::Field(name));
        Self(segments)
    }

    /// Extend with an array index
    pub fn index(&self, i: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(Segment::Index(i));
        Self(segments)
    }

    /// Name of the innermost field, ignoring trailing indices.
    ///
    /// This is what gets surfaced to the session as a missing-field entry
    /// ("difficulty", "reminders", ...), never the full violation message.
    pub fn leaf_field(&self) -> Option<&'static str> {
        self.0.iter().rev().find_map(|seg| match seg {
            Segment::Field(name) => Some(*name),
            Segment::Index(_) => None,
        })
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "$");
        }
        for (i, seg) in self.0.iter().enumerate() {
            match seg {
                Segment::Field(name) => {
                    if i > 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{name}")?;
                }
                Segment::Index(idx) => write!(f, "[{idx}]")?,
            }
        }
        Ok(())
    }
}

/// Category of a validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// Field missing, wrong type, bad enum value, bad format, empty array
    Structural,
    /// Cross-field schedule/reminder contract broken
    Consistency,
}

/// A single validation failure with a field path and a human-readable
/// message. Messages are for logs and developers; they are never shown to
/// the end user.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub path: FieldPath,
    pub kind: ViolationKind,
    pub message: String,
}

impl Violation {
    pub fn structural(path: FieldPath, message: impl Into<String>) -> Self {
        Self {
            path,
            kind: ViolationKind::Structural,
            message: message.into(),
        }
    }

    pub fn consistency(path: FieldPath, message: impl Into<String>) -> Self {
        Self {
            path,
            kind: ViolationKind::Consistency,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}
