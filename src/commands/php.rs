//! PHP extension management.

use super::{default_comment, required_arg, Command};
use crate::error::Result;
use crate::options::Options;

/// Enables a PHP module with `phpenmod`.
pub fn module(args: &[String], options: Options) -> Result<Command> {
    let name = required_arg(args, 0, "php.module", "a module name")?;
    let options = default_comment(options, format!("enable php {name} module"));
    Ok(Command::new(format!("phpenmod {name}"), options))
}
