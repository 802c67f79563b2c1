//! Interactive input captured into a shell variable.

use cruet::Inflector;

use super::{required_arg, Command};
use crate::error::Result;
use crate::options::{split_csv, Options};
use crate::statement::{Statement, StatementFlags};

/// Asks the operator for a value, with `read`/`select` or with `dialog`.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    /// Shell variable that receives the answer.
    pub variable: String,
    pub label: String,
    pub back_title: String,
    pub choices: Option<Vec<String>>,
    pub default: Option<String>,
    pub dialog: bool,
    pub help_text: Option<String>,
    options: Options,
}

impl Prompt {
    /// Builds a prompt from `args[0]` (the variable name) and the step options
    /// `choices`, `default`, `dialog`, `help_text`, `label` and `back_title`.
    pub fn from_options(args: &[String], mut options: Options) -> Result<Self> {
        let variable = required_arg(args, 0, "prompt", "a variable name")?.to_string();
        let label = options
            .get_str("label")
            .unwrap_or_else(|| variable.replace('_', " ").to_title_case());
        let choices = options.get("choices").map(|value| match value {
            serde_json::Value::Array(values) => {
                values.iter().map(crate::options::stringify).collect()
            }
            other => split_csv(&crate::options::stringify(&other)),
        });

        if options.comment.is_none() {
            options.comment = Some(format!("prompt user for {variable} input"));
        }

        Ok(Self {
            label,
            back_title: options.get_str("back_title").unwrap_or_else(|| "Input".to_string()),
            choices,
            default: options.get_str("default"),
            dialog: options.get_bool("dialog", false),
            help_text: options.get_str("help_text"),
            variable,
            options,
        })
    }

    fn default_line(&self) -> Option<String> {
        let var = &self.variable;
        self.default
            .as_ref()
            .map(|default| format!(r#"if [[ -z "${var}" ]]; then {var}="{default}"; fi;"#))
    }

    fn dialog_statement(&self) -> String {
        let mut command = vec![format!(
            r#"dialog --clear --backtitle "{}" --title "{}""#,
            self.back_title, self.label
        )];

        match &self.choices {
            Some(choices) => {
                let help = self.help_text.as_deref().unwrap_or("Select");
                command.push(format!(r#"--menu "{help}" 15 40 {}"#, choices.len()));
                for (number, choice) in choices.iter().enumerate() {
                    command.push(format!(r#""{choice}" {}"#, number + 1));
                }
                command.push("2>/tmp/input.txt".to_string());
            }
            None => {
                let help = self.help_text.as_deref().unwrap_or("");
                command.push(format!(r#"--inputbox "{help}""#));
                command.push("8 60 2>/tmp/input.txt".to_string());
            }
        }

        let mut lines = vec!["touch /tmp/input.txt".to_string(), command.join(" ")];
        lines.push(format!("{}=$(</tmp/input.txt)", self.variable));
        lines.push("clear".to_string());
        lines.push("rm /tmp/input.txt".to_string());
        lines.extend(self.default_line());
        lines.join("\n")
    }

    fn read_statement(&self) -> String {
        let mut lines = Vec::new();
        match &self.choices {
            Some(choices) => {
                let quoted: Vec<String> = choices.iter().map(|c| format!(r#""{c}""#)).collect();
                lines.push(format!(r#"echo "{} ""#, self.label));
                lines.push(format!("options=({})", quoted.join(" ")));
                lines.push(r#"select opt in "${options[@]}""#.to_string());
                lines.push("do".to_string());
                lines.push("    case $opt in".to_string());
                for choice in choices {
                    lines.push(format!(r#"        "{choice}") {}=$opt; break;;"#, self.variable));
                }
                lines.push(r#"        *) echo "invalid choice";;"#.to_string());
                lines.push("    esac".to_string());
                lines.push("done".to_string());
            }
            None => {
                lines.push(format!(r#"echo -n "{} ""#, self.label));
                lines.push(format!("read {}", self.variable));
            }
        }
        lines.extend(self.default_line());
        lines.join("\n")
    }
}

impl Statement for Prompt {
    fn name(&self) -> &str {
        "prompt"
    }

    fn options(&self) -> &Options {
        &self.options
    }

    /// Prompts are interactive, so the wrapping clauses and flags do not apply.
    fn get_statement(&self, _flags: StatementFlags) -> String {
        if self.dialog {
            self.dialog_statement()
        } else {
            self.read_statement()
        }
    }
}

/// Builder form of [`Prompt`] used by the registry and the factory.
pub fn prompt(args: &[String], options: Options) -> Result<Command> {
    let prompt = Prompt::from_options(args, options)?;
    let statement = prompt.get_statement(StatementFlags::default());
    Ok(Command::new(statement, prompt.options).with_name("prompt"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_read_prompt_with_default() {
        let options = Options::from_map([("default".to_string(), json!("example.com"))]);
        let prompt = Prompt::from_options(&["domain_name".to_string()], options).unwrap();
        assert_eq!(prompt.label, "Domain Name");
        assert_eq!(
            prompt.get_statement(StatementFlags::default()),
            "echo -n \"Domain Name \"\nread domain_name\nif [[ -z \"$domain_name\" ]]; then domain_name=\"example.com\"; fi;"
        );
    }

    #[test]
    fn test_select_prompt() {
        let options = Options::from_map([("choices".to_string(), json!("dev, live"))]);
        let prompt = Prompt::from_options(&["env".to_string()], options).unwrap();
        let statement = prompt.get_statement(StatementFlags::default());
        assert!(statement.contains(r#"options=("dev" "live")"#));
        assert!(statement.contains(r#""live") env=$opt; break;;"#));
    }
}
