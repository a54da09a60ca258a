//! CLI command implementations

use std::net::IpAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Subcommand;
use podfeed_core::{FeedStrategy, PodfeedConfig, generate_feed};
use podfeed_web::{AppState, run_server};
use tracing::{info, warn};

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Serve the feed and files over HTTP (default)
    Serve {
        /// Address to bind to, overrides HTTP_HOST
        #[arg(long)]
        host: Option<IpAddr>,
        /// Port to bind to, overrides HTTP_PORT
        #[arg(short, long)]
        port: Option<u16>,
        /// Directory of files to publish, overrides FILES_DIR
        #[arg(short, long)]
        files_dir: Option<PathBuf>,
        /// When to build the feed (rebuild, startup), overrides FEED_STRATEGY
        #[arg(short, long)]
        strategy: Option<FeedStrategy>,
    },
    /// Build the feed once and print it to stdout
    Render {
        /// Directory of files to publish, overrides FILES_DIR
        #[arg(short, long)]
        files_dir: Option<PathBuf>,
    },
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Serve {
            host: None,
            port: None,
            files_dir: None,
            strategy: None,
        }
    }
}

/// Handle the CLI command
///
/// # Errors
/// Returns the configuration, feed or server error that stopped the command
pub async fn handle_command(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Serve {
            host,
            port,
            files_dir,
            strategy,
        } => serve(host, port, files_dir, strategy).await,
        Commands::Render { files_dir } => render(files_dir).await,
    }
}

/// Start the HTTP server
///
/// # Errors
/// - Malformed environment configuration
/// - Missing files directory, or a failed startup feed build
/// - Bind or serve failure
pub async fn serve(
    host: Option<IpAddr>,
    port: Option<u16>,
    files_dir: Option<PathBuf>,
    strategy: Option<FeedStrategy>,
) -> anyhow::Result<()> {
    let mut config = load_config(files_dir)?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(strategy) = strategy {
        config.strategy = strategy;
    }

    if config.feed.item_url.is_empty() {
        warn!("ITEM_URL is not set; item links and enclosures will be relative");
    }

    let files_dir = config.library.files_dir.clone();
    let state = AppState::initialize(config)
        .await
        .with_context(|| format!("Cannot publish files from '{}'", files_dir.display()))?;

    run_server(state).await.context("HTTP server failed")
}

/// Print the feed document
///
/// # Errors
/// - Malformed environment configuration
/// - Listing or rendering the feed failed
pub async fn render(files_dir: Option<PathBuf>) -> anyhow::Result<()> {
    let config = load_config(files_dir)?;

    let document = generate_feed(&config).await.with_context(|| {
        format!(
            "Cannot build feed from '{}'",
            config.library.files_dir.display()
        )
    })?;

    info!("Rendered feed from {}", config.library.files_dir.display());
    println!("{document}");
    Ok(())
}

fn load_config(files_dir: Option<PathBuf>) -> anyhow::Result<PodfeedConfig> {
    let mut config = PodfeedConfig::from_env().context("Invalid environment configuration")?;
    if let Some(dir) = files_dir {
        config.library.files_dir = dir;
    }
    Ok(config)
}
