//! Homework Sentinel CLI
//!
//! Command-line interface for the homework review status watcher.

use std::path::PathBuf;

use clap::Parser;
use homework_sentinel::{load_config, Config, SentinelError};
use tracing::Level;

#[derive(Parser)]
#[command(name = "homework-sentinel")]
#[command(about = "Homework review status watcher with Telegram notifications")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seconds between polls (overrides config file)
    #[arg(long)]
    retry_period: Option<u64>,

    /// Run a single poll cycle and exit
    #[arg(long)]
    once: bool,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() {
    if let Err(e) = try_main(Args::parse()).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn try_main(args: Args) -> Result<(), SentinelError> {
    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!("Loaded environment from {:?}", path),
        Err(e) if e.not_found() => tracing::debug!("No .env file found"),
        Err(e) => tracing::warn!("Failed to load .env file: {}", e),
    }

    tracing::debug!(
        "Parsed command line arguments: config={:?}, retry_period={:?}, once={}, log_level={:?}",
        args.config,
        args.retry_period,
        args.once,
        args.log_level
    );

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    config.resolve_secrets();

    if let Some(retry_period) = args.retry_period {
        config.polling.retry_period_seconds = retry_period;
    }
    config.validate()?;

    if !config.check_tokens() {
        let missing = config.missing_tokens().join(", ");
        tracing::error!("Missing required variables: {}. Exiting.", missing);
        return Err(SentinelError::Config(format!(
            "missing required variables: {}",
            missing
        )));
    }

    tracing::info!("Starting homework sentinel");
    tracing::debug!("Configuration: {:?}", config);

    if args.once {
        let outcome = homework_sentinel::run_once(config).await?;
        tracing::info!("Cycle finished: {:?}", outcome);
        return Ok(());
    }

    homework_sentinel::run(config).await?;

    Ok(())
}
