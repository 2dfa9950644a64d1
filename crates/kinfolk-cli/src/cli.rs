//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Kinfolk CLI - Derive missing event dates in genealogical records.
#[derive(Debug, Parser)]
#[command(name = "kinfolk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true, default_value = "text")]
    pub format: CliFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "KINFOLK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log derivation details (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Human-readable text (default)
    Text,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Derive event dates for every person in an ancestry document
    Derive(DeriveArgs),

    /// List the registered event types and their ordering
    EventTypes,
}

/// Arguments for the derive command.
#[derive(Debug, Clone, Parser)]
pub struct DeriveArgs {
    /// Ancestry document to read
    pub input: PathBuf,

    /// Where to write the updated document (stdout when absent)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Count and log derivations without changing the document
    #[arg(long)]
    pub dry_run: bool,
}
