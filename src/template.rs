//! Template-file command: render a file and write it to a target path.
//!
//! The rendered content is emitted as a heredoc. A script template starting
//! with a shebang is split so the `#!` line is written with `echo` and the
//! rest is appended through the heredoc.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lazy_static::lazy_static;
use log::{debug, error, warn};
use regex::Regex;
use serde_json::{Map, Value};

use crate::constants::{NO_CONTENT, TEMPLATE_COMMAND};
use crate::error::{Error, Result};
use crate::options::{is_truthy, stringify, Options};
use crate::renderer::{MiniJinjaRenderer, TemplateRenderer};
use crate::statement::{comment_line, epilogue, Statement, StatementFlags};

/// Strategy used to fill in a template file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemplateParser {
    /// Jinja syntax, rendered with minijinja.
    #[default]
    Jinja,
    /// `%(name)s` placeholders.
    Percent,
    /// `$name$` tokens.
    Simple,
}

impl TemplateParser {
    /// Maps a `parser` option to a strategy. Unknown names fall back to Jinja.
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "jinja" | "jinja2" => TemplateParser::Jinja,
            "python" | "percent" => TemplateParser::Percent,
            "simple" => TemplateParser::Simple,
            other => {
                warn!("Unknown template parser '{other}', using jinja");
                TemplateParser::Jinja
            }
        }
    }
}

/// Writes a rendered template file to a target path.
#[derive(Clone)]
pub struct TemplateCommand {
    source: PathBuf,
    target: String,
    parser: TemplateParser,
    backup: bool,
    language: Option<String>,
    locations: Vec<PathBuf>,
    context: Map<String, Value>,
    options: Options,
    renderer: Arc<dyn TemplateRenderer>,
}

impl TemplateCommand {
    /// Creates the command. `parser`, `backup` and `lang` are read from the options.
    pub fn new(source: &str, target: &str, mut options: Options) -> Self {
        let parser = options
            .remove("parser")
            .map(|value| TemplateParser::from_name(&stringify(&value)))
            .unwrap_or_default();
        let backup = options.remove("backup").map(|value| is_truthy(&value)).unwrap_or(true);
        let language = options.remove("lang").map(|value| stringify(&value));
        let context = options.to_context();

        Self {
            source: expand_home(source),
            target: target.to_string(),
            parser,
            backup,
            language,
            locations: Vec::new(),
            context,
            options,
            renderer: Arc::new(MiniJinjaRenderer::new()),
        }
    }

    /// Directories searched, in order, for the source file.
    pub fn with_locations(mut self, locations: Vec<PathBuf>) -> Self {
        self.locations = locations;
        self
    }

    /// Merges global variables over the step's own options.
    pub fn with_context(mut self, global: Map<String, Value>) -> Self {
        self.context.extend(global);
        self
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn TemplateRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn parser(&self) -> TemplateParser {
        self.parser
    }

    pub fn backup(&self) -> bool {
        self.backup
    }

    /// The first location containing the source, or the source itself.
    pub fn get_template(&self) -> PathBuf {
        self.locations
            .iter()
            .map(|location| location.join(&self.source))
            .find(|candidate| candidate.exists())
            .unwrap_or_else(|| self.source.clone())
    }

    /// Renders the template file.
    ///
    /// # Errors
    /// * `Error::IoError` if the template file cannot be read
    /// * `Error::MinijinjaError` or `Error::TemplateError` if rendering fails
    pub fn render(&self) -> Result<String> {
        let path = self.get_template();
        debug!("Rendering {} with {:?}", path.display(), self.parser);

        match self.parser {
            TemplateParser::Jinja => {
                self.renderer.render_file(&path, &Value::Object(self.context.clone()))
            }
            TemplateParser::Percent => {
                let content = std::fs::read_to_string(&path)?;
                percent_format(&content, &self.context)
            }
            TemplateParser::Simple => {
                let content = std::fs::read_to_string(&path)?;
                Ok(self.context.iter().fold(content, |content, (key, value)| {
                    content.replace(&format!("${key}$"), &stringify(value))
                }))
            }
        }
    }

    /// Rendered content, or `None` after logging why it could not be rendered.
    pub fn get_content(&self) -> Option<String> {
        match self.render() {
            Ok(content) => Some(content),
            Err(err) => {
                error!("Could not render template {}: {}", self.get_template().display(), err);
                None
            }
        }
    }

    /// Language of the target file, for documentation code blocks.
    pub fn get_target_language(&self) -> &str {
        if let Some(language) = &self.language {
            return language;
        }

        match Path::new(&self.target).extension().and_then(|ext| ext.to_str()) {
            Some("conf") => "conf",
            Some("ini") => "ini",
            Some("php") => "php",
            Some("py") => "python",
            Some("sh") => "bash",
            Some("yml") | Some("yaml") => "yaml",
            _ => "text",
        }
    }

    fn sudo_line(&self, command: String) -> String {
        format!("{} {command}", self.options.sudo).trim_start().to_string()
    }
}

impl Statement for TemplateCommand {
    fn name(&self) -> &str {
        TEMPLATE_COMMAND
    }

    fn options(&self) -> &Options {
        &self.options
    }

    fn get_statement(&self, flags: StatementFlags) -> String {
        let target = &self.target;
        let mut lines = Vec::new();
        lines.extend(comment_line(&self.options, flags));

        if self.backup {
            let mv = self.sudo_line(format!("mv {target} {target}.b"));
            lines.push(format!("if [[ -f {target} ]]; then {mv}; fi;"));
        }

        let Some(content) = self.get_content() else {
            lines.push(NO_CONTENT.to_string());
            return lines.join("\n");
        };

        if content.starts_with("#!") {
            let (shebang, rest) = content.split_once('\n').unwrap_or((content.as_str(), ""));
            lines.push(self.sudo_line(format!(r#"echo "{shebang}" > {target}"#)));
            lines.push(self.sudo_line(format!("cat >> {target} << EOF")));
            lines.push(rest.to_string());
        } else {
            lines.push(self.sudo_line(format!("cat > {target} << EOF")));
            lines.push(content);
        }
        lines.push("EOF".to_string());

        lines.extend(epilogue(&self.options, flags));
        lines.join("\n")
    }
}

impl fmt::Debug for TemplateCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateCommand")
            .field("source", &self.source)
            .field("target", &self.target)
            .field("parser", &self.parser)
            .field("backup", &self.backup)
            .field("locations", &self.locations)
            .finish()
    }
}

/// Expands a leading `~` to the home directory.
fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix('~'), dirs::home_dir()) {
        (Some(""), Some(home)) => home,
        (Some(rest), Some(home)) if rest.starts_with('/') => home.join(&rest[1..]),
        _ => PathBuf::from(path),
    }
}

lazy_static! {
    static ref PERCENT_PLACEHOLDER: Regex =
        Regex::new(r"%%|%\((\w+)\)([sdifr])").expect("percent placeholder pattern is valid");
}

/// Fills `%(name)s`-style placeholders; `%%` is a literal percent sign.
///
/// # Errors
/// * `Error::TemplateError` if a placeholder names a missing variable
pub fn percent_format(template: &str, context: &Map<String, Value>) -> Result<String> {
    let mut output = String::with_capacity(template.len());
    let mut last = 0;
    for captures in PERCENT_PLACEHOLDER.captures_iter(template) {
        let Some(whole) = captures.get(0) else { continue };
        output.push_str(&template[last..whole.start()]);
        last = whole.end();

        let Some(key) = captures.get(1) else {
            output.push('%');
            continue;
        };
        let value = context.get(key.as_str()).ok_or_else(|| {
            Error::TemplateError(format!("missing value for %({})", key.as_str()))
        })?;

        match (&captures[2], value) {
            ("d" | "i", Value::Number(n)) => match n.as_i64() {
                Some(i) => output.push_str(&i.to_string()),
                None => output.push_str(&(n.as_f64().unwrap_or_default() as i64).to_string()),
            },
            ("f", Value::Number(n)) => {
                output.push_str(&format!("{:.6}", n.as_f64().unwrap_or_default()))
            }
            _ => output.push_str(&stringify(value)),
        }
    }
    output.push_str(&template[last..]);
    Ok(output)
}
