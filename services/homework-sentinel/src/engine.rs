//! Engine: runs the fetch, validate, format, notify cycle forever

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::clock::Clock;
use crate::config::Config;
use crate::error::{ErrorKind, SentinelError};
use crate::homework::{check_response, parse_status};
use crate::notifier::Notifier;
use crate::practicum::StatusSource;
use crate::state::PollState;

/// Prefix of every failure diagnostic sent to the chat
pub const FAILURE_PREFIX: &str = "Сбой в работе программы";

/// What a single cycle ended with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The API reported no homework in the requested window
    NoUpdates,
    /// Same status message as the one already delivered
    Unchanged,
    /// A new status message was delivered
    Reported(String),
    /// The cycle failed; `alerted` is true if the diagnostic was delivered
    Failed { diagnostic: String, alerted: bool },
}

/// The engine owns the poll cursor and dedup state and drives the cycle
pub struct Engine {
    source: Arc<dyn StatusSource>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    retry_period: Duration,
    advance_cursor: bool,
    state: PollState,
    cancel: CancellationToken,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("notifier", &self.notifier)
            .field("retry_period", &self.retry_period)
            .field("advance_cursor", &self.advance_cursor)
            .field("state", &self.state)
            .finish()
    }
}

impl Engine {
    pub fn new(
        source: Arc<dyn StatusSource>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        config: &Config,
        cancel: CancellationToken,
    ) -> Self {
        let state = PollState::new(clock.unix_now());
        Self {
            source,
            notifier,
            clock,
            retry_period: Duration::from_secs(config.polling.retry_period_seconds),
            advance_cursor: config.tracker.advance_cursor,
            state,
            cancel,
        }
    }

    pub fn state(&self) -> &PollState {
        &self.state
    }

    /// Poll until the cancellation token is triggered
    pub async fn run(&mut self) {
        tracing::info!(
            "Polling homework statuses from {} every {:?}, reporting via {}",
            self.state.cursor,
            self.retry_period,
            self.notifier.type_name()
        );

        while !self.cancel.is_cancelled() {
            self.run_cycle().await;

            tokio::select! {
                _ = self.clock.sleep(self.retry_period) => {}
                _ = self.cancel.cancelled() => {
                    tracing::debug!("Poll loop cancelled");
                    break;
                }
            }
        }
    }

    /// Run one cycle. Never fails: every error ends up in the returned outcome.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        self.state.cycles += 1;
        tracing::debug!("Cycle {} starting", self.state.cycles);

        let outcome = match self.poll().await {
            Ok(None) => {
                tracing::info!("No homework status changes");
                CycleOutcome::NoUpdates
            }
            Ok(Some(message)) if !self.state.is_new_report(&message) => {
                tracing::debug!("Homework status unchanged");
                CycleOutcome::Unchanged
            }
            Ok(Some(message)) => match self.notifier.send_message(&message).await {
                Ok(()) => {
                    tracing::info!("Homework status change delivered");
                    self.state.record_report(message.clone());
                    CycleOutcome::Reported(message)
                }
                Err(e) => self.handle_failure(e).await,
            },
            Err(e) => self.handle_failure(e).await,
        };

        // Any cycle that did not fail resolves the last failure
        if !matches!(outcome, CycleOutcome::Failed { .. }) && self.state.clear_error() {
            tracing::info!("Previous failure resolved");
        }

        outcome
    }

    /// Fetch, validate and format. `None` when the API has nothing new.
    async fn poll(&mut self) -> crate::Result<Option<String>> {
        let response = self.source.get_api_answer(self.state.cursor).await?;
        let homeworks = check_response(&response)?;

        if self.advance_cursor
            && self
                .state
                .advance_cursor(response.get("current_date").and_then(Value::as_i64))
        {
            tracing::debug!("Cursor advanced to {}", self.state.cursor);
        }

        // Only the most recent record matters
        homeworks.first().map(parse_status).transpose()
    }

    async fn handle_failure(&mut self, error: SentinelError) -> CycleOutcome {
        let diagnostic = format!("{}: {}", FAILURE_PREFIX, error);
        let kind = error.kind();
        tracing::error!(?kind, "{}", diagnostic);

        if kind == ErrorKind::Fatal {
            return CycleOutcome::Failed {
                diagnostic,
                alerted: false,
            };
        }

        if !self.state.is_new_error(&diagnostic) {
            tracing::debug!("Failure already reported, not alerting again");
            return CycleOutcome::Failed {
                diagnostic,
                alerted: false,
            };
        }

        match self.notifier.send_message(&diagnostic).await {
            Ok(()) => {
                self.state.record_error(diagnostic.clone());
                CycleOutcome::Failed {
                    diagnostic,
                    alerted: true,
                }
            }
            Err(e) => {
                tracing::error!("Failure alert not delivered: {}", e);
                CycleOutcome::Failed {
                    diagnostic,
                    alerted: false,
                }
            }
        }
    }
}
