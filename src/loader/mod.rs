//! Reads a steps file and resolves each step against the registry.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, error, warn};
use serde_json::{Map, Value};

use crate::constants::{ADHOC_NAME_KEY, TEMPLATE_COMMAND, TEMPLATES_DIR};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::options::{normalize, stringify, Options};
use crate::registry::{Body, Entry, Family, Parser, Profile, Registry};
use crate::renderer::{MiniJinjaRenderer, TemplateRenderer};
use crate::snippet::Snippet;
use crate::statement::{Statement, StatementFlags};
use crate::template::TemplateCommand;

pub mod format;

pub use format::StepsFormat;

/// A step as parsed from the steps file: command name, positional arguments and options.
#[derive(Debug, Clone, PartialEq)]
pub struct RawStep {
    pub name: String,
    pub args: Vec<String>,
    pub options: Options,
}

/// A resolved step.
#[derive(Debug, Clone)]
pub enum Step {
    Snippet(Snippet),
    Template(TemplateCommand),
}

impl Step {
    pub fn as_snippet(&self) -> Option<&Snippet> {
        match self {
            Step::Snippet(snippet) => Some(snippet),
            Step::Template(_) => None,
        }
    }

    pub fn as_template(&self) -> Option<&TemplateCommand> {
        match self {
            Step::Template(template) => Some(template),
            Step::Snippet(_) => None,
        }
    }

    fn inner(&self) -> &dyn Statement {
        match self {
            Step::Snippet(snippet) => snippet,
            Step::Template(template) => template,
        }
    }
}

impl Statement for Step {
    fn name(&self) -> &str {
        self.inner().name()
    }

    fn options(&self) -> &Options {
        self.inner().options()
    }

    fn get_statement(&self, flags: StatementFlags) -> String {
        self.inner().get_statement(flags)
    }

    fn is_valid(&self) -> bool {
        self.inner().is_valid()
    }

    fn is_itemized(&self) -> bool {
        self.inner().is_itemized()
    }
}

/// Loads a steps file (INI or YAML) and turns its entries into [`Step`]s.
pub struct Loader {
    path: PathBuf,
    profile: Profile,
    context: Option<Context>,
    locations: Vec<PathBuf>,
    options: Options,
    registry: Arc<Registry>,
    renderer: Arc<dyn TemplateRenderer>,
    steps: Vec<RawStep>,
    is_loaded: bool,
}

impl Loader {
    /// Creates a loader for `path`. The `templates` directory next to the
    /// steps file is always the first template location.
    pub fn new<P: AsRef<Path>>(path: P, profile: Profile) -> Self {
        let path = path.as_ref().to_path_buf();
        let directory = path.parent().map(Path::to_path_buf).unwrap_or_default();

        Self {
            locations: vec![directory.join(TEMPLATES_DIR)],
            path,
            profile,
            context: None,
            options: Options::new(),
            registry: Arc::new(Registry::default()),
            renderer: Arc::new(MiniJinjaRenderer::new()),
            steps: Vec::new(),
            is_loaded: false,
        }
    }

    /// Global variables, also used to pre-render the steps file itself.
    pub fn with_context(mut self, context: Context) -> Self {
        self.context = Some(context);
        self
    }

    /// Extra template locations, searched after the default one.
    pub fn with_locations<I, P>(mut self, locations: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.locations.extend(locations.into_iter().map(Into::into));
        self
    }

    /// Default options applied under every step's own options.
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    pub fn with_registry(mut self, registry: Arc<Registry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn TemplateRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn locations(&self) -> &[PathBuf] {
        &self.locations
    }

    pub fn is_loaded(&self) -> bool {
        self.is_loaded
    }

    /// Parsed steps, available after [`Loader::load`].
    pub fn steps(&self) -> &[RawStep] {
        &self.steps
    }

    /// Loader options overlaid with the global context.
    pub fn get_context(&self) -> Map<String, Value> {
        let mut context = self.options.to_context();
        if let Some(global) = &self.context {
            context.extend(global.mapping());
        }
        context
    }

    /// Parses the steps file.
    ///
    /// # Errors
    /// * `Error::UnknownProfile` if the registry has no table for the profile
    /// * `Error::LoadError` if the file is missing, has an unsupported
    ///   extension, fails to render as a template, or cannot be parsed
    pub fn load(&mut self) -> Result<()> {
        if self.registry.table(self.profile).is_none() {
            return Err(Error::UnknownProfile { profile: self.profile.to_string() });
        }

        if !self.path.exists() {
            return Err(self.load_error("file does not exist"));
        }

        let format = StepsFormat::from_path(&self.path)
            .ok_or_else(|| self.load_error("unsupported file type, expected .ini, .yml or .yaml"))?;

        let content = self.read_file()?;
        let entries = format
            .parse(&content)
            .map_err(|e| self.load_error(&format!("not a valid {format} file: {e}")))?;

        debug!("Loaded {} steps from {}", entries.len(), self.path.display());

        self.steps = entries
            .into_iter()
            .filter_map(|(title, tokens)| self.to_raw_step(title, tokens))
            .collect();
        self.is_loaded = true;
        Ok(())
    }

    fn load_error(&self, reason: &str) -> Error {
        Error::LoadError { path: self.path.display().to_string(), reason: reason.to_string() }
    }

    /// File content, rendered as a template when a context is present.
    fn read_file(&self) -> Result<String> {
        let content = std::fs::read_to_string(&self.path)?;
        if self.context.is_none() {
            return Ok(content);
        }

        self.renderer
            .render(&content, &Value::Object(self.get_context()))
            .map_err(|e| self.load_error(&format!("failed to process file as template: {e}")))
    }

    fn to_raw_step(&self, title: String, tokens: indexmap::IndexMap<String, Value>) -> Option<RawStep> {
        let mut options = self.options.clone();
        options.set("comment", Value::String(title.clone()));

        let mut tokens = tokens.into_iter().filter(|(key, _)| !key.starts_with('_'));
        let Some((name, value)) = tokens.next() else {
            warn!("No command found for step: {title}");
            return None;
        };

        for (key, value) in tokens {
            let (key, value) = normalize(&key, value);
            options.set(&key, value);
        }

        Some(RawStep { name, args: split_args(&value), options })
    }

    /// Resolves every parsed step, in file order.
    ///
    /// # Errors
    /// * `Error::InvalidInput` if a builder rejects a step's input
    pub fn get_steps(&self) -> Result<Vec<Step>> {
        self.steps
            .iter()
            .map(|step| self.find_snippet(&step.name, step.args.clone(), step.options.clone()))
            .collect()
    }

    /// Resolves one command.
    ///
    /// Unknown names do not fail: they produce an invalid snippet that
    /// renders as a diagnostic comment.
    ///
    /// # Errors
    /// * `Error::InvalidInput` for a template without source and target, or
    ///   when a builder rejects the input
    /// * `Error::UnknownProfile` if the registry has no table for the profile
    pub fn find_snippet(&self, name: &str, args: Vec<String>, options: Options) -> Result<Step> {
        if name == TEMPLATE_COMMAND {
            let [source, target, ..] = args.as_slice() else {
                return Err(Error::InvalidInput(
                    "template requires a source and a target".to_string(),
                ));
            };
            let template = TemplateCommand::new(source, target, options)
                .with_locations(self.locations.clone())
                .with_context(self.get_context())
                .with_renderer(self.renderer.clone());
            return Ok(Step::Template(template));
        }

        let table = self
            .registry
            .table(self.profile)
            .ok_or_else(|| Error::UnknownProfile { profile: self.profile.to_string() })?;

        match table.get(name) {
            Some(Entry::Family(family)) => self.resolve_family(name, family, family.parser, args, options),
            Some(entry) => self.bind(name, entry, None, args, options),
            None if name.contains('.') => self.find_snippet_by_dotted_name(name, args, options),
            None => {
                error!("Command not found: {name}");
                Ok(Step::Snippet(self.snippet(name, args, options)))
            }
        }
    }

    /// Resolves a dotted name such as `pgsql.user.create` through nested families.
    pub fn find_snippet_by_dotted_name(
        &self,
        name: &str,
        args: Vec<String>,
        options: Options,
    ) -> Result<Step> {
        let parser = self.registry.family_parser(self.profile, name);
        match self.registry.lookup(self.profile, name) {
            Some(entry) => self.bind(name, entry, parser, args, options),
            None => {
                error!("Command not found: {name}");
                Ok(Step::Snippet(self.snippet(name, args, options)))
            }
        }
    }

    /// Picks the sub-command of a family from the first argument.
    fn resolve_family(
        &self,
        name: &str,
        family: &Family,
        parser: Option<Parser>,
        mut args: Vec<String>,
        mut options: Options,
    ) -> Result<Step> {
        let Some(sub) = args.first().cloned() else {
            warn!("No sub-command argument for: {name}");
            return Ok(Step::Snippet(self.snippet(name, args, options)));
        };

        let dotted = format!("{name}.{sub}");
        if let Some(entry) = family.entries.get(&sub) {
            args.remove(0);
            return match entry {
                Entry::Family(nested) => {
                    self.resolve_family(&dotted, nested, nested.parser.or(parser), args, options)
                }
                entry => self.bind(&dotted, entry, parser, args, options),
            };
        }

        if let Some(entry) = family.default.as_ref().and_then(|key| family.entries.get(key)) {
            args.remove(0);
            options.set(ADHOC_NAME_KEY, Value::String(sub));
            return self.bind(&dotted, entry, parser, args, options);
        }

        warn!("Sub-command could not be determined for: {name}");
        Ok(Step::Snippet(self.snippet(name, args, options)))
    }

    fn bind(
        &self,
        name: &str,
        entry: &Entry,
        parser: Option<Parser>,
        args: Vec<String>,
        options: Options,
    ) -> Result<Step> {
        let snippet = self.snippet(name, args, options);
        let snippet = match entry {
            Entry::Literal(content) => {
                snippet.with_content(Body::Literal(content.clone())).with_parser(parser)
            }
            Entry::Builder(builder) => {
                let snippet = snippet.with_content(Body::Builder(*builder));
                snippet.validate()?;
                snippet
            }
            Entry::Family(_) => {
                warn!("{name} is a command family, a sub-command is required");
                snippet
            }
        };
        Ok(Step::Snippet(snippet))
    }

    fn snippet(&self, name: &str, args: Vec<String>, options: Options) -> Snippet {
        Snippet::new(name, args, options)
            .with_context(self.get_context())
            .with_renderer(self.renderer.clone())
    }
}

/// Splits the value of a step's command key into positional arguments.
///
/// A value starting with a double quote is one argument with the quotes
/// removed; anything else is split on whitespace.
pub fn split_args(value: &Value) -> Vec<String> {
    match value {
        Value::Null => Vec::new(),
        Value::String(s) if s.starts_with('"') => vec![s.replace('"', "")],
        Value::String(s) => s.split_whitespace().map(String::from).collect(),
        Value::Array(values) => values.iter().map(stringify).collect(),
        other => vec![stringify(other)],
    }
}

/// Keeps steps matching the given environments and tags.
///
/// A step without environments matches any environment filter. When a tag
/// filter is given, a step must share at least one tag with it.
pub fn filter_steps<S: Statement>(
    steps: Vec<S>,
    environments: Option<&[String]>,
    tags: Option<&[String]>,
) -> Vec<S> {
    let shares = |wanted: &[String], have: &[String]| wanted.iter().any(|w| have.contains(w));

    steps
        .into_iter()
        .filter(|step| match environments {
            Some(wanted) if !step.environments().is_empty() => shares(wanted, step.environments()),
            _ => true,
        })
        .filter(|step| match tags {
            Some(wanted) => shares(wanted, step.tags()),
            None => true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_split_args() {
        assert_eq!(split_args(&json!("\"hello world\"")), ["hello world"]);
        assert_eq!(split_args(&json!("/opt/app  /srv")), ["/opt/app", "/srv"]);
        assert!(split_args(&Value::Null).is_empty());
        assert_eq!(split_args(&json!(["a", 1])), ["a", "1"]);
    }
}
