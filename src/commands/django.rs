//! Django management commands run through `./manage.py`.
//!
//! Options other than the common ones become switches of the management
//! command.

use serde_json::{json, Value};

use super::{default_comment, long_switches, required_arg, Command};
use crate::error::Result;
use crate::options::{stringify, Options};

fn manage(command: &str, rest: &[String], options: Options, consumed: &[&str]) -> Command {
    let options = default_comment(options, format!("run {command} django management command"));

    let mut tokens = vec![format!("./manage.py {command}")];
    tokens.extend(long_switches(&options, consumed));
    tokens.extend(rest.iter().cloned());
    Command::new(tokens.join(" "), options)
}

/// Default fixture location for an `app` or `app.Model` target.
fn fixture_path(target: &str, format: &str) -> String {
    format!("../deploy/fixtures/{target}.{format}")
}

/// Any management command: the first argument names it, the rest follow it.
pub fn django(args: &[String], options: Options) -> Result<Command> {
    let command = required_arg(args, 0, "django", "a management command")?;
    Ok(manage(command, &args[1..], options, &[]))
}

pub fn check(_args: &[String], mut options: Options) -> Result<Command> {
    options.set_default("register", json!("django_checks_out"));
    let options = default_comment(options, "run django checks".to_string());
    Ok(manage("check", &[], options, &[]))
}

/// `dumpdata` into `path`, by default a fixture named after the target.
pub fn dump(args: &[String], mut options: Options) -> Result<Command> {
    let target = required_arg(args, 0, "django.dump", "an app or model")?;
    options.set_default("format", json!("json"));
    options.set_default("indent", json!(4));

    let format = options.get_str("format").unwrap_or_else(|| "json".to_string());
    let path = options.get_str("path").unwrap_or_else(|| fixture_path(target, &format));
    let options = default_comment(options, "dump app/model data".to_string());

    let rest = [target.to_string(), format!("> {path}")];
    Ok(manage("dumpdata", &rest, options, &["path"]))
}

pub fn load(args: &[String], mut options: Options) -> Result<Command> {
    let target = required_arg(args, 0, "django.load", "an app or model")?;
    let format = options
        .remove("format")
        .map(|value| stringify(&value))
        .unwrap_or_else(|| "json".to_string());
    let path = options.get_str("path").unwrap_or_else(|| fixture_path(target, &format));
    let options = default_comment(options, "load app/model data".to_string());

    Ok(manage("loaddata", &[path], options, &["path"]))
}

pub fn migrate(_args: &[String], options: Options) -> Result<Command> {
    let options = default_comment(options, "apply database migrations".to_string());
    Ok(manage("migrate", &[], options, &[]))
}

pub fn collect_static(_args: &[String], mut options: Options) -> Result<Command> {
    options.set_default("noinput", Value::Bool(true));
    let options = default_comment(options, "collect static files".to_string());
    Ok(manage("collectstatic", &[], options, &[]))
}
