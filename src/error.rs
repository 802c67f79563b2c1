//! Error handling for the tease application.
//! Defines custom error types and results used throughout the application.
//!
//! Only load-aborting failures and argument validation travel as [`Error`].
//! Per-command problems (unknown command names, missing or broken template
//! files) are logged and degrade to invalid steps instead.

use std::io;
use thiserror::Error;

/// Custom error types for tease operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// Errors raised by the template engine
    #[error("Template engine error: {0}.")]
    MinijinjaError(#[from] minijinja::Error),

    /// A YAML steps file could not be parsed
    #[error("YAML error: {0}.")]
    YamlError(#[from] serde_yaml::Error),

    /// Represents errors that occur during steps or variables file parsing
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    /// The requested profile has no command registry
    #[error("Unsupported or unrecognized profile: '{profile}'.")]
    UnknownProfile { profile: String },

    /// The steps file could not be loaded at all
    #[error("Failed to load '{path}': {reason}.")]
    LoadError { path: String, reason: String },

    /// Represents errors that occur during template processing
    #[error("Template error: {0}.")]
    TemplateError(String),

    /// A command builder was given structurally wrong arguments
    #[error("Invalid input: {0}.")]
    InvalidInput(String),
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(1);
}
