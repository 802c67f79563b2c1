//! Documentation output.
//!
//! Explanations become paragraphs and screenshots become images. Template
//! files are shown as their rendered content. Every other step is listed
//! under its comment as a code block holding the bare command.

use clap::ValueEnum;
use cruet::Inflector;

use crate::loader::Step;
use crate::snippet::Snippet;
use crate::statement::{Statement, StatementFlags};
use crate::template::TemplateCommand;

/// Markup used for documentation output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DocFormat {
    Markdown,
    Plain,
    Rst,
}

/// Renders resolved steps as documentation.
pub fn to_docs(steps: &[Step], format: DocFormat) -> String {
    let mut output = Vec::new();
    for step in steps {
        match step {
            Step::Snippet(snippet) if snippet.name() == "explain" => {
                explanation(&mut output, snippet, format)
            }
            Step::Snippet(snippet) if snippet.name() == "screenshot" => {
                screenshot(&mut output, snippet, format)
            }
            Step::Template(template) => template_content(&mut output, template, format),
            step => statement(&mut output, step, format),
        }
    }
    output.join("\n")
}

fn explanation(output: &mut Vec<String>, snippet: &Snippet, format: DocFormat) {
    if let Some(heading) = snippet.options().get_str("heading") {
        let heading = heading.to_title_case();
        match format {
            DocFormat::Markdown => output.push(format!("## {heading}")),
            DocFormat::Plain => output.push(format!("***** {heading} *****")),
            DocFormat::Rst => {
                output.push(heading.clone());
                output.push("=".repeat(heading.chars().count()));
            }
        }
        output.push(String::new());
    }

    output.push(snippet.args().join(" "));
    output.push(String::new());
}

fn screenshot(output: &mut Vec<String>, snippet: &Snippet, format: DocFormat) {
    let Some(image) = snippet.args().first() else {
        return;
    };
    let options = snippet.options();
    let caption = options
        .get_str("caption")
        .or_else(|| options.comment.clone())
        .unwrap_or_default();

    match format {
        DocFormat::Markdown => output.push(format!("![{caption}]({image})")),
        DocFormat::Plain => output.push(image.clone()),
        DocFormat::Rst => {
            output.push(format!(".. figure:: {image}"));
            if !caption.is_empty() {
                output.push(indent(&format!(":alt: {caption}")));
            }
            for key in ["height", "width"] {
                if let Some(value) = options.get_str(key) {
                    output.push(indent(&format!(":{key}: {value}")));
                }
            }
        }
    }
    output.push(String::new());
}

fn template_content(output: &mut Vec<String>, template: &TemplateCommand, format: DocFormat) {
    label(output, template.comment());
    let content = template.get_content().unwrap_or_default();

    match format {
        DocFormat::Markdown => {
            output.push(format!("```{}", template.get_target_language()));
            output.push(content);
            output.push("```".to_string());
        }
        DocFormat::Plain => {
            output.push("+++".to_string());
            output.push(content);
            output.push("+++".to_string());
        }
        DocFormat::Rst => {
            output.push(format!(".. code-block:: {}", template.get_target_language()));
            output.push(String::new());
            output.push(indent(&content));
        }
    }
    output.push(String::new());
}

fn statement(output: &mut Vec<String>, step: &Step, format: DocFormat) {
    let statement = step.get_statement(StatementFlags::bare());
    label(output, step.comment());

    match format {
        DocFormat::Markdown => {
            output.push("```bash".to_string());
            output.push(statement);
            output.push("```".to_string());
        }
        DocFormat::Plain => {
            output.push("---".to_string());
            output.push(statement);
            output.push("---".to_string());
        }
        DocFormat::Rst => {
            output.push(".. code-block:: bash".to_string());
            output.push(String::new());
            output.push(indent(&statement));
        }
    }
    output.push(String::new());
}

/// `Comment:` line introducing a code block.
fn label(output: &mut Vec<String>, comment: Option<&str>) {
    let Some(comment) = comment.map(|c| c.replace('#', "")).filter(|c| !c.trim().is_empty()) else {
        return;
    };
    let comment = comment.trim();
    let mut chars = comment.chars();
    let capitalized: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    output.push(format!("{capitalized}:"));
    output.push(String::new());
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| if line.is_empty() { String::new() } else { format!("    {line}") })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent_keeps_blank_lines() {
        assert_eq!(indent("a\n\nb"), "    a\n\n    b");
    }

    #[test]
    fn test_label_capitalizes() {
        let mut output = Vec::new();
        label(&mut output, Some("install the packages"));
        assert_eq!(output, ["Install the packages:", ""]);
    }
}
