//! Statement assembly shared by snippets, template files and programmatic commands.
//!
//! Every command ends up as one rendered statement wrapped by the same clauses:
//!
//! ```text
//! # comment
//! if [[ condition ]]; then ( cd path && prefix && sudo -u user statement ); fi;
//! register=$?;
//! if [[ $register -gt 0 ]]; exit 1; fi;
//! ```

use crate::options::Options;

/// Switches controlling which optional parts of a statement are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatementFlags {
    /// Wrap the statement in `( cd <path> && ... )` when a `cd` option is set.
    pub cd: bool,
    pub include_comment: bool,
    pub include_register: bool,
    pub include_stop: bool,
}

impl StatementFlags {
    /// Flags used for documentation, where only the bare command matters.
    pub fn bare() -> Self {
        Self { cd: true, include_comment: false, include_register: false, include_stop: false }
    }
}

impl Default for StatementFlags {
    fn default() -> Self {
        Self { cd: true, include_comment: true, include_register: true, include_stop: true }
    }
}

/// Anything that can be emitted as shell text.
pub trait Statement {
    /// Canonical (possibly dotted) command name.
    fn name(&self) -> &str;

    fn options(&self) -> &Options;

    /// Renders the full statement, honoring the given flags.
    fn get_statement(&self, flags: StatementFlags) -> String;

    fn is_valid(&self) -> bool {
        true
    }

    fn is_itemized(&self) -> bool {
        false
    }

    fn comment(&self) -> Option<&str> {
        self.options().comment.as_deref()
    }

    fn tags(&self) -> &[String] {
        &self.options().tags
    }

    fn environments(&self) -> &[String] {
        &self.options().environments
    }
}

/// The `# comment` line, if one should be emitted.
pub fn comment_line(options: &Options, flags: StatementFlags) -> Option<String> {
    match &options.comment {
        Some(comment) if flags.include_comment => Some(format!("# {comment}")),
        _ => None,
    }
}

/// Wraps a rendered statement in the directory, prefix, sudo and condition clauses.
pub fn wrap(statement: &str, options: &Options, cd: bool) -> String {
    let mut parts = Vec::new();
    let change_dir = options.cd.as_deref().filter(|_| cd);

    if let Some(path) = change_dir {
        parts.push(format!("( cd {path} &&"));
    }

    if let Some(prefix) = &options.prefix {
        parts.push(format!("{prefix} &&"));
    }

    if options.sudo.enabled {
        parts.push(format!("{} {}", options.sudo, statement));
    } else {
        parts.push(statement.to_string());
    }

    if change_dir.is_some() {
        parts.push(")".to_string());
    }

    let line = parts.join(" ");
    match &options.condition {
        Some(condition) => format!("if [[ {condition} ]]; then {line}; fi;"),
        None => line,
    }
}

/// Lines capturing the exit status and stopping on failure.
///
/// A named register is used for the stop check when present; otherwise the
/// stop check falls back to `$?`. Both forms are never emitted together.
pub fn epilogue(options: &Options, flags: StatementFlags) -> Vec<String> {
    let mut lines = Vec::new();
    match &options.register {
        Some(register) if flags.include_register => {
            lines.push(format!("{register}=$?;"));
            if flags.include_stop && options.stop {
                lines.push(format!("if [[ ${register} -gt 0 ]]; exit 1; fi;"));
            }
        }
        _ => {
            if flags.include_stop && options.stop {
                lines.push("if [[ $? -gt 0 ]]; exit 1; fi;".to_string());
            }
        }
    }
    lines
}
