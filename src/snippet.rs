//! A resolved command: registry content bound to the arguments and options of one step.

use std::fmt;
use std::sync::Arc;

use log::{error, warn};
use serde_json::{Map, Value};

use crate::commands::substitute_item;
use crate::constants::ITEM_PLACEHOLDER;
use crate::error::{Error, Result};
use crate::options::Options;
use crate::registry::{Body, Content, Parser};
use crate::renderer::{MiniJinjaRenderer, TemplateRenderer};
use crate::statement::{comment_line, epilogue, wrap, Statement, StatementFlags};

/// One step of a steps file, resolved against the registry.
///
/// A snippet without content is invalid: the name did not resolve. It still
/// renders, as a diagnostic comment, so one bad step never stops the others.
#[derive(Clone)]
pub struct Snippet {
    name: String,
    args: Vec<String>,
    options: Options,
    content: Option<Body>,
    parser: Option<Parser>,
    context: Map<String, Value>,
    renderer: Arc<dyn TemplateRenderer>,
}

impl Snippet {
    pub fn new(name: impl Into<String>, args: Vec<String>, options: Options) -> Self {
        Self {
            name: name.into(),
            args,
            options,
            content: None,
            parser: None,
            context: Map::new(),
            renderer: Arc::new(MiniJinjaRenderer::new()),
        }
    }

    pub fn with_content(mut self, content: Body) -> Self {
        self.content = Some(content);
        self
    }

    pub fn with_parser(mut self, parser: Option<Parser>) -> Self {
        self.parser = parser;
        self
    }

    /// Global variables, overlaid by the arguments and options when rendering.
    pub fn with_context(mut self, context: Map<String, Value>) -> Self {
        self.context = context;
        self
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn TemplateRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn content(&self) -> Option<&Body> {
        self.content.as_ref()
    }

    /// Runs a builder body once so invalid input surfaces when the step is resolved.
    ///
    /// # Errors
    /// * `Error::InvalidInput` from the builder
    pub fn validate(&self) -> Result<()> {
        match &self.content {
            Some(Body::Builder(builder)) => builder(&self.args, &self.options).map(|_| ()),
            _ => Ok(()),
        }
    }

    /// Renders the content with the default strategy.
    ///
    /// The context is the global context, then `args`, then the options, then
    /// `extra`; later entries win. Fragments are rendered one by one and the
    /// non-empty results joined with a space.
    ///
    /// # Errors
    /// * `Error::TemplateError` if the snippet has no content
    /// * `Error::MinijinjaError` if a template fails to render
    pub fn render_content(&self, args: &[String], extra: Map<String, Value>) -> Result<String> {
        let content = self
            .content
            .as_ref()
            .ok_or_else(|| Error::TemplateError(format!("{} has no content", self.name)))?;

        let mut context = self.context.clone();
        context.insert(
            "args".to_string(),
            Value::Array(args.iter().cloned().map(Value::String).collect()),
        );
        context.extend(self.options.to_context());
        context.extend(extra);
        let context = Value::Object(context);

        match content {
            Body::Literal(Content::Text(template)) => self.renderer.render(template, &context),
            Body::Literal(Content::Fragments(fragments)) => {
                let mut rendered = Vec::with_capacity(fragments.len());
                for fragment in fragments {
                    let output = self.renderer.render(fragment, &context)?;
                    if !output.trim().is_empty() {
                        rendered.push(output);
                    }
                }
                Ok(rendered.join(" "))
            }
            Body::Builder(builder) => builder(args, &self.options),
        }
    }

    /// Renders the inline statement for `args`, through the parser when one is bound.
    pub fn render(&self, args: &[String]) -> Result<String> {
        match self.parser {
            Some(parser) => parser(self, args),
            None => self.render_content(args, Map::new()),
        }
    }

    fn diagnostic(&self, err: &Error) -> String {
        error!("Could not render {}: {}", self.name, err);
        format!("# could not render {}: {}", self.name, err)
    }
}

impl Statement for Snippet {
    fn name(&self) -> &str {
        &self.name
    }

    fn options(&self) -> &Options {
        &self.options
    }

    fn is_valid(&self) -> bool {
        self.content.is_some()
    }

    fn is_itemized(&self) -> bool {
        self.options.items.is_some() || self.args.iter().any(|arg| arg.contains(ITEM_PLACEHOLDER))
    }

    /// Assembles the statement.
    ///
    /// Itemized snippets produce one wrapped line per item and never get the
    /// register/stop epilogue.
    fn get_statement(&self, flags: StatementFlags) -> String {
        let mut lines = Vec::new();
        lines.extend(comment_line(&self.options, flags));

        if !self.is_valid() {
            lines.push(format!("# {}: command not found", self.name));
            return lines.join("\n");
        }

        if self.is_itemized() {
            let items = self.options.items.as_deref().unwrap_or_default();
            if items.is_empty() {
                warn!("{} uses {ITEM_PLACEHOLDER} without items", self.name);
                lines.push(format!("# {}: {ITEM_PLACEHOLDER} used without items", self.name));
                return lines.join("\n");
            }

            for item in items {
                let args = substitute_item(&self.args, item);
                match self.render(&args) {
                    Ok(statement) => lines.push(wrap(&statement, &self.options, flags.cd)),
                    Err(err) => lines.push(self.diagnostic(&err)),
                }
            }
            return lines.join("\n");
        }

        match self.render(&self.args) {
            Ok(statement) => {
                lines.push(wrap(&statement, &self.options, flags.cd));
                lines.extend(epilogue(&self.options, flags));
            }
            Err(err) => lines.push(self.diagnostic(&err)),
        }
        lines.join("\n")
    }
}

impl fmt::Debug for Snippet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snippet")
            .field("name", &self.name)
            .field("args", &self.args)
            .field("options", &self.options)
            .field("content", &self.content)
            .field("parser", &self.parser.is_some())
            .finish()
    }
}

impl fmt::Display for Snippet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snippet(content: Content, args: &[&str], options: Options) -> Snippet {
        Snippet::new("test", args.iter().map(|a| a.to_string()).collect(), options)
            .with_content(Body::Literal(content))
    }

    #[test]
    fn test_fragments_skip_empty_output() {
        let content = Content::Fragments(vec![
            "rm".into(),
            "{% if force %}-f{% endif %}".into(),
            "{{ args[0] }}".into(),
        ]);
        let s = snippet(content, &["/tmp/x"], Options::new());
        assert_eq!(s.render(s.args()).unwrap(), "rm /tmp/x");
    }

    #[test]
    fn test_options_override_context() {
        let s = snippet(Content::Text("echo {{ who }}".into()), &[], {
            Options::from_map([("who".to_string(), json!("step"))])
        })
        .with_context([("who".to_string(), json!("global"))].into_iter().collect());
        assert_eq!(s.render(&[]).unwrap(), "echo step");
    }

    #[test]
    fn test_invalid_snippet_renders_diagnostic() {
        let s = Snippet::new("nope", vec![], Options::new());
        assert!(!s.is_valid());
        assert_eq!(s.get_statement(StatementFlags::default()), "# nope: command not found");
    }
}
