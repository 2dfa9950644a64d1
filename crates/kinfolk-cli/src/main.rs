//! Kinfolk CLI - Derive missing event dates in genealogical records.

use clap::Parser;
use kinfolk_cli::commands;
use kinfolk_cli::{Cli, Command, Formatter};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // Initialize tracing (log to stderr, RUST_LOG wins over --verbose)
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let formatter = Formatter::new(cli.format, !cli.no_color);
    if let Err(e) = run(cli, &formatter) {
        eprintln!("{}", formatter.error(&e.to_string()));
        std::process::exit(1);
    }
}

fn run(cli: Cli, formatter: &Formatter) -> kinfolk_cli::Result<()> {
    let config = kinfolk_cli::config::resolve(cli.config.as_deref())?;

    match cli.command {
        Command::Derive(args) => {
            commands::execute_derive(&args, config, formatter)?;
        }
        Command::EventTypes => {
            commands::execute_event_types(&config, formatter)?;
        }
    }

    Ok(())
}
