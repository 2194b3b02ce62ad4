// Aria Voice Assistant Engine
// Main entry point for the Aria binary

use clap::Parser;
use aria_engine::cli::{Cli, Command};
use aria_engine::config::Config;
use aria_engine::handlers::{handle_doctor, handle_listen, handle_run, OutputFormat};
use aria_engine::telemetry::{init_telemetry, init_telemetry_with_level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize basic telemetry first (before config is loaded)
    init_telemetry();

    let version = env!("CARGO_PKG_VERSION");
    tracing::info!("Aria Engine v{}", version);

    // Determine output format
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    // Load configuration (or use custom path if provided)
    let config = if let Some(config_path) = &cli.config {
        Config::load_from_path(config_path)?
    } else {
        Config::load_or_create()?
    };

    // Re-initialize telemetry with the CLI or config log level
    // (only takes effect if RUST_LOG env var is not set)
    let log_level = cli.log.as_deref().unwrap_or(&config.core.log_level);
    init_telemetry_with_level(log_level);

    match cli.command {
        Command::Listen => handle_listen(&config).await,
        Command::Run { utterance } => handle_run(utterance, &config, format).await,
        Command::Doctor => handle_doctor(&config, format).await,
    }
}
