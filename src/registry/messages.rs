//! User-facing messages, notifications and documentation-only steps.

use super::{Entry, Table};
use crate::commands::messages;
use crate::error::Result;
use crate::options::Options;

fn slack(args: &[String], options: &Options) -> Result<String> {
    messages::slack(args, options.clone()).map(|command| command.statement)
}

fn twist(args: &[String], options: &Options) -> Result<String> {
    messages::twist(args, options.clone()).map(|command| command.statement)
}

fn prompt(args: &[String], options: &Options) -> Result<String> {
    crate::commands::prompt::prompt(args, options.clone()).map(|command| command.statement)
}

pub fn table() -> Table {
    let entries = [
        (
            "dialog",
            Entry::fragments([
                "dialog",
                "--clear",
                r#"--backtitle "{{ title|default("Message") }}""#,
                r#"--msgbox "{{ args[0] }}" {{ height|default("15") }} {{ width|default("100") }};"#,
                "clear;",
            ]),
        ),
        ("echo", Entry::text(r#"echo "{{ args[0] }}""#)),
        ("explain", Entry::text("{{ args[0] }}")),
        ("prompt", Entry::Builder(prompt)),
        ("screenshot", Entry::text("{{ args[0] }}")),
        ("slack", Entry::Builder(slack)),
        ("twist", Entry::Builder(twist)),
    ];

    entries.into_iter().map(|(name, entry)| (name.to_string(), entry)).collect()
}
