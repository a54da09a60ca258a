//! Podfeed CLI - Command-line interface
//!
//! Serves a directory of audio files as a podcast feed.

mod commands;

use std::path::PathBuf;

use clap::Parser;
use podfeed_core::tracing_setup::{CliLogLevel, init_tracing};

#[derive(Parser)]
#[command(name = "podfeed")]
#[command(about = "Serve a directory of audio files as a podcast feed")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<commands::Commands>,

    /// Console log level (RUST_LOG takes precedence)
    #[arg(long, global = true, default_value = "info")]
    log_level: CliLogLevel,

    /// Directory for a full trace log of this run
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_tracing_level(), cli.log_dir.as_deref())?;

    let command = cli.command.unwrap_or_default();
    commands::handle_command(command).await
}
