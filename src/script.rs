//! Shell script output.

use std::path::Path;

use crate::constants::SCRIPT_SHEBANG;
use crate::error::Result;
use crate::statement::{Statement, StatementFlags};

/// Steps that only make sense in documentation.
const DOCUMENTATION_ONLY: [&str; 2] = ["explain", "screenshot"];

/// Assembles a bash script from resolved steps.
///
/// Each statement is followed by a blank line. Invalid steps stay in the
/// script as their diagnostic comment so nothing is dropped silently.
pub fn to_script<S: Statement>(steps: &[S]) -> String {
    let mut output = vec![SCRIPT_SHEBANG.to_string(), String::new()];

    for step in steps.iter().filter(|step| !DOCUMENTATION_ONLY.contains(&step.name())) {
        let statement = step.get_statement(StatementFlags::default());
        if statement.is_empty() {
            continue;
        }
        output.push(statement);
        output.push(String::new());
    }

    output.join("\n")
}

/// Writes output to `path`, creating parent directories as needed.
///
/// # Errors
/// * `Error::IoError` if the directories or the file cannot be written
pub fn write_output<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}
