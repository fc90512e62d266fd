//! Homework Sentinel - homework review status watcher
//!
//! Polls the Practicum homework status API, detects review status changes,
//! and reports them to a Telegram chat.

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod homework;
pub mod io;
pub mod notifier;
pub mod practicum;
pub mod state;
pub mod telegram;

pub use config::{load_config, Config};
pub use engine::{CycleOutcome, Engine};
pub use error::{ErrorKind, Result, SentinelError};

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::clock::SystemClock;
use crate::io::ReqwestHttpClient;
use crate::notifier::Notifier;
use crate::practicum::{PracticumClient, StatusSource};
use crate::telegram::TelegramNotifier;

/// Build an engine talking to the real Practicum and Telegram APIs
pub fn build_engine(config: &Config, cancel: CancellationToken) -> Result<Engine> {
    if !config.check_tokens() {
        return Err(SentinelError::Config(format!(
            "missing required variables: {}",
            config.missing_tokens().join(", ")
        )));
    }
    config.validate()?;

    let timeout = Duration::from_secs(config.tracker.request_timeout_seconds);
    let http: Arc<dyn io::HttpClient> = Arc::new(ReqwestHttpClient::with_timeout(timeout)?);

    let source: Arc<dyn StatusSource> =
        Arc::new(PracticumClient::new(&config.tracker, Arc::clone(&http)));
    let notifier: Arc<dyn Notifier> =
        Arc::new(TelegramNotifier::new(&config.telegram, Arc::clone(&http)));

    Ok(Engine::new(
        source,
        notifier,
        Arc::new(SystemClock),
        config,
        cancel,
    ))
}

/// Run a single poll cycle and return its outcome
pub async fn run_once(config: Config) -> Result<CycleOutcome> {
    let mut engine = build_engine(&config, CancellationToken::new())?;
    Ok(engine.run_cycle().await)
}

/// Cancel `cancel` once `signal` fires. A listener that fails to install
/// leaves the token alone, so the poll loop keeps running.
fn spawn_shutdown_listener<F>(signal: F, cancel: CancellationToken) -> tokio::task::JoinHandle<()>
where
    F: std::future::Future<Output = std::io::Result<()>> + Send + 'static,
{
    tokio::spawn(async move {
        match signal.await {
            Ok(()) => {
                tracing::info!("Shutdown signal received");
                cancel.cancel();
            }
            Err(e) => tracing::error!("Failed to listen for ctrl-c: {}", e),
        }
    })
}

/// Run the sentinel service with the given configuration until Ctrl-C
pub async fn run(config: Config) -> Result<()> {
    let cancel = CancellationToken::new();
    let mut engine = build_engine(&config, cancel.clone())?;

    spawn_shutdown_listener(tokio::signal::ctrl_c(), cancel.clone());

    tracing::info!("Homework sentinel started");

    // Run the engine (blocks until cancelled)
    engine.run().await;

    tracing::info!("Homework sentinel stopped");
    Ok(())
}
