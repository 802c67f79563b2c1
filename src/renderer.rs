//! Template renderer used for registry snippets, steps files and template files.
use std::path::Path;

use crate::error::{Error, Result};
use minijinja::Environment;

/// Trait for template rendering engines.
pub trait TemplateRenderer: Send + Sync {
    /// Renders a template string with the given context.
    ///
    /// # Arguments
    /// * `template` - Template string to render
    /// * `context` - Context variables for rendering
    ///
    /// # Returns
    /// * `Result<String>` - Rendered template string
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String>;

    /// Reads a file and renders its content as a template.
    ///
    /// # Errors
    /// * `Error::IoError` if the file cannot be read
    /// * `Error::MinijinjaError` if the file is not a valid template
    fn render_file(&self, path: &Path, context: &serde_json::Value) -> Result<String> {
        let template = std::fs::read_to_string(path).map_err(Error::IoError)?;
        self.render(&template, context)
    }
}

/// MiniJinja-based template rendering engine.
pub struct MiniJinjaRenderer {
    /// MiniJinja environment instance
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    /// Creates a new MiniJinjaRenderer instance with default environment.
    pub fn new() -> Self {
        let env = Environment::new();
        Self { env }
    }
}

impl Default for MiniJinjaRenderer {
    fn default() -> Self {
        MiniJinjaRenderer::new()
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    /// Renders a template string using MiniJinja.
    ///
    /// Undefined names render as empty strings and are falsy in conditions,
    /// which is what optional command switches rely on.
    ///
    /// # Errors
    /// * `Error::MinijinjaError` if the template has a syntax error or fails to render
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String> {
        self.env.render_str(template, context).map_err(Error::MinijinjaError)
    }
}
