//! Common constants used throughout the tease application.

/// Steps file used when no path is given on the command line
pub const DEFAULT_STEPS_FILE: &str = "steps.ini";

/// Directory next to a steps file that is always searched for templates
pub const TEMPLATES_DIR: &str = "templates";

/// Placeholder replaced by each value of `items` during itemization
pub const ITEM_PLACEHOLDER: &str = "$item";

/// Command name that bypasses the registry and renders a template file
pub const TEMPLATE_COMMAND: &str = "template";

/// Reserved option carrying the literal name of an ad hoc sub-command
pub const ADHOC_NAME_KEY: &str = "_name";

/// Options shared by every command; these never become command switches
pub const COMMON_OPTIONS: [&str; 8] = [
    "cd",
    "comment",
    "environments",
    "prefix",
    "register",
    "shell",
    "stop",
    "tags",
];

/// Comment emitted in place of a template whose content could not be produced
pub const NO_CONTENT: &str = "# NO CONTENT AVAILABLE";

/// Interpreter line placed on top of generated scripts
pub const SCRIPT_SHEBANG: &str = "#! /usr/bin/env bash";
