//! Prompt template system
//!
//! Loads and renders `.pmt` (prompt template) system prompts, one per chat
//! mode.
//!
//! Template loading chain:
//! 1. Configured override directory (`{name}.pmt`)
//! 2. Embedded fallback in code
//!
//! Templates use Handlebars syntax for variable substitution.

pub mod embedded;
mod loader;

pub use loader::{PromptContext, PromptLoader};
