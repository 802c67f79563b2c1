//! MySQL database and user administration.
//!
//! The client authenticates with `admin_user` and `admin_pass`, so these
//! commands never run under sudo. Options that are not used by a builder
//! are passed to the client as long switches.

use serde_json::{json, Value};

use super::{default_comment, long_switches, required_arg, Command};
use crate::error::{Error, Result};
use crate::options::{Options, Sudo};

const CONNECTION: [&str; 4] = ["admin_pass", "admin_user", "host", "port"];

fn host(options: &Options) -> String {
    options.get_str("host").unwrap_or_else(|| "localhost".to_string())
}

/// `program`, the connection switches, pass-through switches, then `rest`.
fn mysql(program: &str, rest: &[String], mut options: Options, consumed: &[&str]) -> Command {
    let user = options.get_str("admin_user").unwrap_or_else(|| "root".to_string());
    let port = options.get_str("port").unwrap_or_else(|| "3306".to_string());

    let mut tokens = vec![program.to_string(), format!("--user={user}")];
    if let Some(password) = options.get_str("admin_pass") {
        tokens.push(format!(r#"--password="{password}""#));
    }
    tokens.push(format!("--host={} --port={port}", host(&options)));

    let skip: Vec<&str> = CONNECTION.iter().chain(consumed).copied().collect();
    tokens.extend(long_switches(&options, &skip));
    tokens.extend(rest.iter().cloned());

    options.sudo = Sudo::default();
    Command::new(tokens.join(" "), options)
}

fn execute(sql: &str) -> String {
    format!(r#"--execute="{sql}""#)
}

fn grant_sql(privileges: &str, database: &str, to: &str, host: &str) -> String {
    format!("GRANT {privileges} ON {database}.* TO '{to}'@'{host}'")
}

/// Creates a database, granting all privileges to `owner` when given.
pub fn create(args: &[String], options: Options) -> Result<Command> {
    let database = required_arg(args, 0, "mysql.create", "a database name")?;
    let owner = options.get_str("owner");
    let options = default_comment(options, format!("create {database} mysql database"));

    let mut command =
        mysql("mysqladmin create", &[database.to_string()], options.clone(), &["owner"]);
    if let Some(owner) = owner {
        let sql = grant_sql("ALL", database, &owner, &host(&options));
        let grant = mysql("mysql", &[execute(&sql)], options, &["owner"]);
        command.statement = format!("{} && {}", command.statement, grant.statement);
    }
    Ok(command)
}

pub fn drop(args: &[String], options: Options) -> Result<Command> {
    let database = required_arg(args, 0, "mysql.drop", "a database name")?;
    let options = default_comment(options, format!("drop {database} mysql database"));
    Ok(mysql("mysqladmin drop", &[database.to_string()], options, &[]))
}

/// Dumps a database to `path`, `<database>.sql` by default.
pub fn dump(args: &[String], mut options: Options) -> Result<Command> {
    let database = required_arg(args, 0, "mysql.dump", "a database name")?;
    let path = options.get_str("path").unwrap_or_else(|| format!("{database}.sql"));
    options.set_default("complete_inserts", Value::Bool(true));
    let options = default_comment(options, format!("dump {database} mysql database"));

    let rest = [database.to_string(), format!("> {path}")];
    Ok(mysql("mysqldump", &rest, options, &["path"]))
}

pub fn exists(args: &[String], mut options: Options) -> Result<Command> {
    let database = required_arg(args, 0, "mysql.exists", "a database name")?;
    options.set_default("register", json!(format!("{database}_exists")));
    let options =
        default_comment(options, format!("determine if {database} mysql database exists"));

    let sql = format!(
        "SELECT SCHEMA_NAME FROM INFORMATION_SCHEMA.SCHEMATA WHERE SCHEMA_NAME = '{database}'"
    );
    Ok(mysql("mysql", &[execute(&sql)], options, &[]))
}

/// Grants `privileges` (default `ALL`) on `database` (default every database) to a user.
pub fn grant(args: &[String], options: Options) -> Result<Command> {
    let to = required_arg(args, 0, "mysql.grant", "a user name")?;
    let database = options.get_str("database").unwrap_or_else(|| "*".to_string());
    let privileges = options.get_str("privileges").unwrap_or_else(|| "ALL".to_string());
    let options = default_comment(options, format!("grant mysql privileges to {to}"));

    let sql = grant_sql(&privileges, &database, to, &host(&options));
    Ok(mysql("mysql", &[execute(&sql)], options, &["database", "privileges"]))
}

pub fn load(args: &[String], options: Options) -> Result<Command> {
    let database = required_arg(args, 0, "mysql.load", "a database name")?;
    let path = required_arg(args, 1, "mysql.load", "a file to load")?;
    let options = default_comment(options, format!("load data into {database} mysql database"));

    let rest = [database.to_string(), format!("< {path}")];
    Ok(mysql("mysql", &rest, options, &[]))
}

/// Creates, drops or checks for a user depending on the `op` option.
///
/// # Errors
/// * `Error::InvalidInput` for a missing name or an unsupported `op`
pub fn user(args: &[String], mut options: Options) -> Result<Command> {
    let name = required_arg(args, 0, "mysql.user", "a user name")?;
    let op = options.get_str("op").unwrap_or_else(|| "create".to_string());
    let host = host(&options);
    let consumed = ["op", "password"];

    let (sql, comment) = match op.as_str() {
        "create" => {
            let mut sql = format!("CREATE USER IF NOT EXISTS '{name}'@'{host}'");
            if let Some(password) = options.get_str("password") {
                sql.push_str(&format!(" IDENTIFIED BY '{password}'"));
            }
            (sql, format!("create {name} mysql user"))
        }
        "drop" => (
            format!("DROP USER IF EXISTS '{name}'@'{host}'"),
            format!("remove {name} mysql user"),
        ),
        "exists" => {
            options.set_default("register", json!("mysql_user_exists"));
            (
                format!("SELECT EXISTS(SELECT 1 FROM mysql.user WHERE user = '{name}')"),
                format!("determine if {name} mysql user exists"),
            )
        }
        other => {
            return Err(Error::InvalidInput(format!(
                "unsupported mysql user operation: {other}"
            )))
        }
    };

    let options = default_comment(options, comment);
    Ok(mysql("mysql", &[execute(&sql)], options, &consumed))
}
