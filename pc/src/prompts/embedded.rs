//! Embedded prompts
//!
//! Compiled into the binary from .pmt files at build time, so the crate
//! works without any prompt files on disk.

use tracing::debug;

/// Habit coaching system prompt
pub const HABIT: &str = include_str!("../../prompts/habit.pmt");

/// Task planning system prompt
pub const TASK: &str = include_str!("../../prompts/task.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "habit" => Some(HABIT),
        "task" => Some(TASK),
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_prompts_are_templates() {
        assert!(HABIT.contains("{{today}}"));
        assert!(TASK.contains("{{today}}"));
        assert!(get_embedded("habit").is_some());
        assert!(get_embedded("task").is_some());
        assert!(get_embedded("plan").is_none());
    }
}
