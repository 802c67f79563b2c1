//! tease turns declarative steps files into shell scripts and documentation.
//! Each step names a command that is resolved against a per-platform
//! registry of command templates and assembled into a shell statement.

/// Command-line interface module for the tease application
pub mod cli;

/// Programmatic commands built from typed builder functions
pub mod commands;

pub mod constants;

/// Variables available to templates
pub mod context;

/// Documentation output in markdown, reStructuredText or plain text
pub mod docs;

/// Error types and handling for the tease application
pub mod error;

pub mod ini;

/// Steps file loading and command resolution
pub mod loader;

/// Typed step options and value normalization
pub mod options;

/// Command tables per platform profile
pub mod registry;

/// Template rendering engine abstraction
pub mod renderer;

/// Bash script output
pub mod script;

pub mod snippet;

/// Statement assembly shared by every kind of command
pub mod statement;

/// Template-file command
pub mod template;
