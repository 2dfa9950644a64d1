//! Kinfolk CLI library.
//!
//! This library provides the core functionality for the `kinfolk` command-line
//! interface: the ancestry document format, configuration resolution, command
//! execution and output formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod document;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use document::Document;
pub use error::{CliError, Result};
pub use output::Formatter;
