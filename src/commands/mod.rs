//! Programmatic commands.
//!
//! These are built directly from typed builder functions instead of the
//! text templates of the registry, which makes them convenient for code that
//! assembles scripts without a steps file:
//!
//! ```
//! use tease::commands::posix;
//! use tease::options::Options;
//! use tease::statement::{Statement, StatementFlags};
//!
//! let command = posix::touch(&["/tmp/ready".to_string()], Options::new()).unwrap();
//! assert_eq!(
//!     command.get_statement(StatementFlags::default()),
//!     "# touch /tmp/ready\ntouch /tmp/ready"
//! );
//! ```

use serde_json::Value;

use crate::constants::ITEM_PLACEHOLDER;
use crate::error::{Error, Result};
use crate::options::{stringify, Options};
use crate::statement::{comment_line, epilogue, wrap, Statement, StatementFlags};

pub mod django;
pub mod factory;
pub mod messages;
pub mod mysql;
pub mod pgsql;
pub mod php;
pub mod posix;
pub mod prompt;
pub mod python;
pub mod system;

pub use prompt::Prompt;

/// Constructs a command from positional arguments and options.
pub type CommandBuilder = fn(&[String], Options) -> Result<Command>;

/// A single shell statement with its options.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub name: String,
    pub statement: String,
    pub options: Options,
}

impl Command {
    pub fn new(statement: impl Into<String>, options: Options) -> Self {
        Self { name: String::new(), statement: statement.into(), options }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Statement for Command {
    fn name(&self) -> &str {
        &self.name
    }

    fn options(&self) -> &Options {
        &self.options
    }

    fn get_statement(&self, flags: StatementFlags) -> String {
        let mut lines = Vec::new();
        lines.extend(comment_line(&self.options, flags));
        lines.push(wrap(&self.statement, &self.options, flags.cd));
        lines.extend(epilogue(&self.options, flags));
        lines.join("\n")
    }
}

/// One builder fanned out over a list of items.
///
/// Every `$item` in the positional arguments is replaced by each item in
/// turn. All commands are constructed up front, so invalid input fails at
/// construction rather than when the script is emitted.
#[derive(Debug, Clone)]
pub struct ItemizedCommand {
    name: String,
    items: Vec<String>,
    args: Vec<String>,
    options: Options,
    commands: Vec<Command>,
}

impl ItemizedCommand {
    /// # Errors
    /// * Any error returned by `builder` for one of the items
    pub fn new(
        builder: CommandBuilder,
        items: Vec<String>,
        args: Vec<String>,
        options: Options,
        name: impl Into<String>,
    ) -> Result<Self> {
        let name = name.into();
        let mut per_item = options.clone();
        per_item.remove("items");

        let commands = items
            .iter()
            .map(|item| {
                let args = substitute_item(&args, item);
                builder(&args, per_item.clone()).map(|command| command.with_name(name.clone()))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { name, items, args, options, commands })
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// The constructed commands, one per item, in item order.
    pub fn get_commands(&self) -> &[Command] {
        &self.commands
    }
}

impl Statement for ItemizedCommand {
    fn name(&self) -> &str {
        &self.name
    }

    fn options(&self) -> &Options {
        &self.options
    }

    fn is_itemized(&self) -> bool {
        true
    }

    /// The family comment is emitted once; item commands never repeat it.
    fn get_statement(&self, flags: StatementFlags) -> String {
        let mut lines = Vec::new();
        if flags.include_comment {
            let comment = self.options.comment.as_deref().unwrap_or("execute multiple commands");
            lines.push(format!("# {comment}"));
        }

        let item_flags = StatementFlags { include_comment: false, ..flags };
        lines.extend(self.commands.iter().map(|command| command.get_statement(item_flags)));
        lines.join("\n")
    }
}

/// Replaces the item placeholder in every argument.
pub fn substitute_item(args: &[String], item: &str) -> Vec<String> {
    args.iter().map(|arg| arg.replace(ITEM_PLACEHOLDER, item)).collect()
}

/// Positional argument `index`, or `Error::InvalidInput` naming what is missing.
pub(crate) fn required_arg<'a>(
    args: &'a [String],
    index: usize,
    command: &str,
    what: &str,
) -> Result<&'a str> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| Error::InvalidInput(format!("{command} requires {what}")))
}

/// Option value, or `Error::InvalidInput` naming the missing option.
pub(crate) fn required_option(options: &Options, key: &str, command: &str) -> Result<String> {
    options
        .get_str(key)
        .ok_or_else(|| Error::InvalidInput(format!("{command} requires a {key} option")))
}

/// `--key=value` switches for every extra option not listed in `skip`.
///
/// Underscores in keys become dashes. `true` is a bare flag, `false` and null
/// are dropped and strings are quoted.
pub(crate) fn long_switches(options: &Options, skip: &[&str]) -> Vec<String> {
    options
        .extra
        .iter()
        .filter(|(key, _)| !skip.contains(&key.as_str()))
        .filter_map(|(key, value)| {
            let key = key.replace('_', "-");
            match value {
                Value::Bool(true) => Some(format!("--{key}")),
                Value::Bool(false) | Value::Null => None,
                Value::String(s) => Some(format!(r#"--{key}="{s}""#)),
                other => Some(format!("--{key}={}", stringify(other))),
            }
        })
        .collect()
}

/// Sets the comment unless the step already has one.
pub(crate) fn default_comment(mut options: Options, comment: String) -> Options {
    options.set_default("comment", Value::String(comment));
    options
}
