//! PostgreSQL database and user administration.
//!
//! Like the MySQL commands these authenticate as `admin_user` and never run
//! under sudo. `admin_pass` is exported as `PGPASSWORD` ahead of the client.

use serde_json::{json, Value};

use super::{default_comment, long_switches, required_arg, Command};
use crate::error::{Error, Result};
use crate::options::{Options, Sudo};

const CONNECTION: [&str; 4] = ["admin_pass", "admin_user", "host", "port"];

fn pgsql(program: &str, rest: &[String], mut options: Options, consumed: &[&str]) -> Command {
    let user = options.get_str("admin_user").unwrap_or_else(|| "postgres".to_string());
    let host = options.get_str("host").unwrap_or_else(|| "localhost".to_string());
    let port = options.get_str("port").unwrap_or_else(|| "5432".to_string());

    let mut tokens = Vec::new();
    if let Some(password) = options.get_str("admin_pass") {
        tokens.push(format!(r#"export PGPASSWORD="{password}" &&"#));
    }
    tokens.push(program.to_string());
    tokens.push(format!("-U {user} --host={host} --port={port}"));

    let skip: Vec<&str> = CONNECTION.iter().chain(consumed).copied().collect();
    tokens.extend(long_switches(&options, &skip));
    tokens.extend(rest.iter().cloned());

    options.sudo = Sudo::default();
    Command::new(tokens.join(" "), options)
}

/// Creates a database. `owner` and `template` pass through as switches.
pub fn create(args: &[String], options: Options) -> Result<Command> {
    let database = required_arg(args, 0, "pgsql.create", "a database name")?;
    let options = default_comment(options, format!("create {database} postgres database"));
    Ok(pgsql("createdb", &[database.to_string()], options, &[]))
}

pub fn drop(args: &[String], options: Options) -> Result<Command> {
    let database = required_arg(args, 0, "pgsql.drop", "a database name")?;
    let options = default_comment(options, format!("drop {database} postgres database"));
    Ok(pgsql("dropdb", &[database.to_string()], options, &[]))
}

pub fn dump(args: &[String], mut options: Options) -> Result<Command> {
    let database = required_arg(args, 0, "pgsql.dump", "a database name")?;
    let path = options.get_str("path").unwrap_or_else(|| format!("{database}.sql"));
    options.set_default("column_inserts", Value::Bool(true));
    options.set("dbname", json!(database));
    options.set("file", json!(path));
    let options = default_comment(options, format!("dump {database} postgres database"));
    Ok(pgsql("pg_dump", &[], options, &["path"]))
}

pub fn exists(args: &[String], mut options: Options) -> Result<Command> {
    let database = required_arg(args, 0, "pgsql.exists", "a database name")?;
    options.set_default("register", json!(format!("{database}_exists")));
    let options =
        default_comment(options, format!("determine if {database} postgres database exists"));

    let rest = [format!(r"-lqt | cut -d \| -f 1 | grep -qw {database}")];
    Ok(pgsql("psql", &rest, options, &[]))
}

pub fn load(args: &[String], mut options: Options) -> Result<Command> {
    let database = required_arg(args, 0, "pgsql.load", "a database name")?;
    let path = required_arg(args, 1, "pgsql.load", "a file to load")?;
    options.set("dbname", json!(database));
    options.set("file", json!(path));
    let options = default_comment(options, format!("load data into {database} postgres database"));
    Ok(pgsql("psql", &[], options, &[]))
}

/// Creates, drops or checks for a role depending on the `op` option.
///
/// # Errors
/// * `Error::InvalidInput` for a missing name or an unsupported `op`
pub fn user(args: &[String], mut options: Options) -> Result<Command> {
    let name = required_arg(args, 0, "pgsql.user", "a user name")?;
    let op = options.get_str("op").unwrap_or_else(|| "create".to_string());
    let consumed = ["op", "password"];

    match op.as_str() {
        "create" => {
            let password = options.get_str("password");
            let options = default_comment(options, format!("create {name} postgres user"));
            // No database or role creation, not a superuser.
            let mut command =
                pgsql("createuser", &[format!("-DRS {name}")], options.clone(), &consumed);
            if let Some(password) = password {
                let sql = format!(r#"-c "ALTER USER {name} WITH ENCRYPTED PASSWORD '{password}';""#);
                let alter = pgsql("psql", &[sql], options, &consumed);
                command.statement = format!("{} && {}", command.statement, alter.statement);
            }
            Ok(command)
        }
        "drop" => {
            let options = default_comment(options, format!("remove {name} postgres user"));
            Ok(pgsql("dropuser", &[name.to_string()], options, &consumed))
        }
        "exists" => {
            options.set_default("register", json!("pgsql_user_exists"));
            let options =
                default_comment(options, format!("determine if {name} postgres user exists"));
            let rest = [format!(r#"-c "SELECT 1 FROM pg_roles WHERE rolname='{name}';""#)];
            Ok(pgsql("psql", &rest, options, &consumed))
        }
        other => Err(Error::InvalidInput(format!(
            "unsupported postgres user operation: {other}"
        ))),
    }
}
