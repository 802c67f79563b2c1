//! Command-line interface implementation for tease.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, CommandFactory, Parser};
use serde_json::Value;
use std::path::PathBuf;

use crate::constants::DEFAULT_STEPS_FILE;
use crate::docs::DocFormat;
use crate::error::{Error, Result};
use crate::options::{smart_cast, Options};
use crate::registry::Profile;

/// Command-line arguments structure for tease.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    disable_version_flag = true,
    about = "tease: turn declarative steps into shell scripts and documentation",
    long_about = None
)]
pub struct Args {
    /// Path to the steps file (.ini, .yml or .yaml)
    #[arg(value_name = "PATH", default_value = DEFAULT_STEPS_FILE)]
    pub path: PathBuf,

    /// Context variable used when pre-rendering the steps file and templates,
    /// in the form name:value. May be repeated.
    #[arg(short = 'C', long = "context", value_name = "NAME:VALUE")]
    pub context: Vec<String>,

    /// Output documentation instead of a script
    #[arg(short, long, value_enum, value_name = "FORMAT")]
    pub docs: Option<DocFormat>,

    /// Enable debug output
    #[arg(short = 'D', long)]
    pub debug: bool,

    /// Keep only matching steps, in the form attribute:value where attribute
    /// is tags or environments. May be repeated.
    #[arg(short, long = "filter", value_name = "ATTRIBUTE:VALUE")]
    pub filters: Vec<String>,

    /// Default option for every step, in the form name:value. May be repeated.
    #[arg(short, long = "option", value_name = "NAME:VALUE")]
    pub options: Vec<String>,

    /// Operating system profile the commands are written for
    #[arg(short = 'P', long, value_name = "PROFILE", default_value = "ubuntu")]
    pub profile: Profile,

    /// Directory searched for template files. May be repeated.
    #[arg(short = 'T', long = "template-path", value_name = "DIR")]
    pub template_paths: Vec<PathBuf>,

    /// INI file of variables to load into the context
    #[arg(short = 'V', long = "variables-file", value_name = "FILE")]
    pub variables_file: Option<PathBuf>,

    /// Environment used to select variables from the variables file
    #[arg(short, long, value_name = "NAME")]
    pub environment: Option<String>,

    /// Write the output to a file as well as standard output
    #[arg(short, long, value_name = "FILE")]
    pub write: Option<PathBuf>,

    /// Print version
    #[arg(short = 'v', long, action = clap::ArgAction::Version)]
    version: Option<bool>,
}

/// Step filters collected from `--filter` tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub environments: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
}

impl Filters {
    /// Parses `attribute:value` tokens.
    ///
    /// # Errors
    /// * `Error::InvalidInput` if a token has no value or names an unknown attribute
    pub fn from_tokens(tokens: &[String]) -> Result<Self> {
        let mut filters = Self::default();
        for token in tokens {
            let Some((attribute, value)) = token.split_once(':') else {
                return Err(Error::InvalidInput(format!(
                    "filter '{token}' must be in the form attribute:value"
                )));
            };

            let target = match attribute.trim() {
                "tags" | "tag" => &mut filters.tags,
                "environments" | "environment" | "environs" | "envs" | "env" => {
                    &mut filters.environments
                }
                other => {
                    return Err(Error::InvalidInput(format!("cannot filter on '{other}'")))
                }
            };
            target.get_or_insert_with(Vec::new).push(value.trim().to_string());
        }
        Ok(filters)
    }

    pub fn is_empty(&self) -> bool {
        self.environments.is_none() && self.tags.is_none()
    }
}

/// Builds global step options from `name:value` tokens. A bare `name` is `true`.
pub fn parse_options(tokens: &[String]) -> Options {
    Options::from_map(tokens.iter().map(|token| match token.split_once(':') {
        Some((key, value)) => (key.trim().to_string(), smart_cast(value)),
        None => (token.trim().to_string(), Value::Bool(true)),
    }))
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With clap's default error handling for argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::MissingRequiredArgument {
                let _ = Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
