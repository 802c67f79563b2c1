use serde_json::Value;

use super::{default_comment, required_arg, Command};
use crate::error::Result;
use crate::options::Options;

/// `pip` for `version = 2`, `pip3` otherwise.
fn manager(options: &Options) -> &'static str {
    match options.get_str("version").as_deref() {
        Some("2") => "pip",
        _ => "pip3",
    }
}

/// Activates `venv` through the prefix so cd and sudo still wrap the whole line.
fn activate(mut options: Options) -> Options {
    if let Some(venv) = options.get_str("venv") {
        options.set("prefix", Value::String(format!("source {venv}/bin/activate")));
    }
    options
}

/// Installs, upgrades or removes a package.
pub fn pip(args: &[String], options: Options) -> Result<Command> {
    let package = required_arg(args, 0, "pip", "a package name")?;
    let manager = manager(&options);
    let op = options.get_str("op").unwrap_or_else(|| "install".to_string());

    let statement = if options.get_bool("upgrade", false) || op == "upgrade" {
        format!("{manager} install --upgrade {package}")
    } else if op == "remove" || op == "uninstall" {
        format!("{manager} uninstall -y {package}")
    } else {
        format!("{manager} {op} {package}")
    };

    let options = default_comment(activate(options), format!("{op} {package}"));
    Ok(Command::new(statement, options))
}

pub fn pip_file(args: &[String], options: Options) -> Result<Command> {
    let path = required_arg(args, 0, "pip_file", "a requirements file")?;
    let statement = format!("{} install -r {path}", manager(&options));
    let options =
        default_comment(activate(options), format!("install packages from pip file {path}"));
    Ok(Command::new(statement, options))
}

pub fn virtualenv(args: &[String], options: Options) -> Result<Command> {
    let name = required_arg(args, 0, "virtualenv", "an environment name")?;
    let options = default_comment(options, format!("create {name} virtual environment"));
    Ok(Command::new(format!("virtualenv {name}"), options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::{Statement, StatementFlags};
    use serde_json::json;

    #[test]
    fn test_pip_in_virtualenv() {
        let options = Options::from_map([("venv".to_string(), json!("python"))]);
        let command = pip(&["django".to_string()], options).unwrap();
        assert_eq!(
            command.get_statement(StatementFlags::default()),
            "# install django\nsource python/bin/activate && pip3 install django"
        );
    }
}
