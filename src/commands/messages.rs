//! Messages shown to the operator and notifications sent to chat services.

use url::Url;

use super::{required_arg, Command};
use crate::error::{Error, Result};
use crate::options::Options;

const CURL_JSON: &str = "curl -X POST -H 'Content-type: application/json' --data";

/// Returns the `url` option after checking it is an absolute http(s) URL.
fn webhook_url(name: &str, options: &Options) -> Result<String> {
    let raw = options
        .get_str("url")
        .ok_or_else(|| Error::InvalidInput(format!("{name} requires a url option")))?;
    let url = Url::parse(&raw)
        .map_err(|e| Error::InvalidInput(format!("{name} url '{raw}' is not valid: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(raw),
        scheme => Err(Error::InvalidInput(format!(
            "{name} url must use http or https, not {scheme}"
        ))),
    }
}

pub fn dialog(args: &[String], options: Options) -> Result<Command> {
    let message = required_arg(args, 0, "dialog", "a message")?;
    let title = options.get_str("title").unwrap_or_else(|| "Message".to_string());
    let height = options.get_str("height").unwrap_or_else(|| "15".to_string());
    let width = options.get_str("width").unwrap_or_else(|| "100".to_string());

    let statement = format!(
        r#"dialog --clear --backtitle "{title}" --msgbox "{message}" {height} {width}; clear;"#
    );
    Ok(Command::new(statement, options))
}

pub fn echo(args: &[String], options: Options) -> Result<Command> {
    let message = required_arg(args, 0, "echo", "a message")?;
    Ok(Command::new(format!(r#"echo "{message}""#), options))
}

/// Documentation-only text. The statement is the explanation itself.
pub fn explain(args: &[String], options: Options) -> Result<Command> {
    let message = required_arg(args, 0, "explain", "a message")?;
    Ok(Command::new(message, options))
}

/// Documentation-only image. The statement is the image path.
pub fn screenshot(args: &[String], options: Options) -> Result<Command> {
    let image = required_arg(args, 0, "screenshot", "an image path")?;
    Ok(Command::new(image, options))
}

/// Posts a message to a Slack webhook given by the `url` option.
///
/// # Errors
/// * `Error::InvalidInput` if the message or a valid http(s) `url` is missing
pub fn slack(args: &[String], options: Options) -> Result<Command> {
    let message = required_arg(args, 0, "slack", "a message")?;
    let url = webhook_url("slack", &options)?;
    let statement = format!(r#"{CURL_JSON} '{{"text": "{message}"}}' {url}"#);
    Ok(Command::new(statement, options))
}

/// Posts a message to a Twist integration given by the `url` option.
///
/// # Errors
/// * `Error::InvalidInput` if the message or a valid http(s) `url` is missing
pub fn twist(args: &[String], options: Options) -> Result<Command> {
    let message = required_arg(args, 0, "twist", "a message")?;
    let url = webhook_url("twist", &options)?;
    let title = options.get_str("title").unwrap_or_else(|| "Notice".to_string());
    let statement =
        format!(r#"{CURL_JSON} '{{"content": "{message}", "title": "{title}"}}' {url}"#);
    Ok(Command::new(statement, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde_json::json;

    #[test]
    fn test_slack_statement() {
        let options = Options::from_map([(
            "url".to_string(),
            json!("https://hooks.slack.com/services/T000/B000/XXX"),
        )]);
        let command = slack(&["deployed".to_string()], options).unwrap();
        assert_eq!(
            command.statement,
            r#"curl -X POST -H 'Content-type: application/json' --data '{"text": "deployed"}' https://hooks.slack.com/services/T000/B000/XXX"#
        );
    }

    #[test]
    fn test_twist_rejects_non_http_url() {
        let options = Options::from_map([("url".to_string(), json!("ftp://example.com/hook"))]);
        let result = twist(&["deployed".to_string()], options);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }
}
