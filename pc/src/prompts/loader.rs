//! Prompt Loader
//!
//! Loads prompt templates from an override directory or falls back to the
//! embedded defaults, then renders them with Handlebars.

use std::path::{Path, PathBuf};

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

use crate::session::ChatMode;

use super::embedded;

/// Context for rendering prompt templates
#[derive(Debug, Clone, Serialize)]
pub struct PromptContext {
    /// Today's date as "YYYY-MM-DD"
    pub today: String,
}

impl PromptContext {
    /// Context for the current date
    pub fn now() -> Self {
        Self {
            today: chrono::Utc::now().format("%Y-%m-%d").to_string(),
        }
    }
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    hbs: Handlebars<'static>,
    /// Override directory; embedded templates are used when unset
    template_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a new prompt loader with an optional override directory
    pub fn new(template_dir: Option<impl AsRef<Path>>) -> Self {
        let template_dir = template_dir.map(|d| d.as_ref().to_path_buf());
        debug!(?template_dir, "PromptLoader::new: called");
        Self {
            hbs: Handlebars::new(),
            template_dir,
        }
    }

    /// Create a loader that only uses embedded prompts
    pub fn embedded_only() -> Self {
        Self {
            hbs: Handlebars::new(),
            template_dir: None,
        }
    }

    /// Load a template by name
    ///
    /// Checks the override directory for `{name}.pmt` first, then falls
    /// back to the embedded template.
    fn load_template(&self, name: &str) -> Result<String> {
        debug!(%name, "PromptLoader::load_template: called");
        if let Some(ref dir) = self.template_dir {
            let path = dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!(?path, "PromptLoader::load_template: found override");
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read prompt {}: {}", path.display(), e));
            }
            debug!(?path, "PromptLoader::load_template: no override file");
        }

        if let Some(content) = embedded::get_embedded(name) {
            debug!(%name, "PromptLoader::load_template: using embedded");
            return Ok(content.to_string());
        }

        Err(eyre!("Prompt template not found: {}", name))
    }

    /// Render the system prompt for a chat mode
    pub fn render(&self, mode: ChatMode, context: &PromptContext) -> Result<String> {
        let name = match mode {
            ChatMode::Habit => "habit",
            ChatMode::Task => "task",
        };
        debug!(%name, today = %context.today, "PromptLoader::render: called");
        let template = self.load_template(name)?;
        self.hbs
            .render_template(&template, context)
            .map_err(|e| eyre!("Failed to render template {}: {}", name, e))
    }
}
