//! Configuration types for the homework sentinel service

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable holding the Practicum API token
pub const PRACTICUM_TOKEN_VAR: &str = "PRACTICUM_TOKEN";
/// Environment variable holding the Telegram bot token
pub const TELEGRAM_TOKEN_VAR: &str = "TELEGRAM_TOKEN";
/// Environment variable holding the Telegram chat id
pub const TELEGRAM_CHAT_ID_VAR: &str = "TELEGRAM_CHAT_ID";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub polling: PollingConfig,
}

/// Homework status API settings
#[derive(Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Move the `from_date` cursor to the server's `current_date` after each
    /// accepted response. Off by default: every poll asks for the window
    /// starting at process startup.
    #[serde(default)]
    pub advance_cursor: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            token: None,
            endpoint: default_endpoint(),
            request_timeout_seconds: default_request_timeout(),
            advance_cursor: false,
        }
    }
}

impl std::fmt::Debug for TrackerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackerConfig")
            .field("token", &redact(&self.token))
            .field("endpoint", &self.endpoint)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .field("advance_cursor", &self.advance_cursor)
            .finish()
    }
}

/// Telegram bot settings
#[derive(Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub chat_id: Option<String>,
    #[serde(default = "default_telegram_api_url")]
    pub api_url: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: None,
            chat_id: None,
            api_url: default_telegram_api_url(),
        }
    }
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("token", &redact(&self.token))
            .field("chat_id", &self.chat_id)
            .field("api_url", &self.api_url)
            .finish()
    }
}

/// Poll loop settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_retry_period")]
    pub retry_period_seconds: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            retry_period_seconds: default_retry_period(),
        }
    }
}

fn default_endpoint() -> String {
    "https://practicum.yandex.ru/api/user_api/homework_statuses/".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_retry_period() -> u64 {
    600
}

fn redact(secret: &Option<String>) -> &'static str {
    match secret {
        Some(_) => "<redacted>",
        None => "<unset>",
    }
}

/// True only when all three identifiers are present and non-empty
pub fn check_tokens(
    practicum_token: Option<&str>,
    telegram_token: Option<&str>,
    telegram_chat_id: Option<&str>,
) -> bool {
    [practicum_token, telegram_token, telegram_chat_id]
        .iter()
        .all(|value| value.is_some_and(|v| !v.is_empty()))
}

impl Config {
    /// Check that every credential the poll loop needs is configured
    pub fn check_tokens(&self) -> bool {
        check_tokens(
            self.tracker.token.as_deref(),
            self.telegram.token.as_deref(),
            self.telegram.chat_id.as_deref(),
        )
    }

    /// Names of the credentials that are still missing, for the startup error
    pub fn missing_tokens(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        for (name, value) in [
            (PRACTICUM_TOKEN_VAR, &self.tracker.token),
            (TELEGRAM_TOKEN_VAR, &self.telegram.token),
            (TELEGRAM_CHAT_ID_VAR, &self.telegram.chat_id),
        ] {
            if value.as_deref().is_none_or(str::is_empty) {
                missing.push(name);
            }
        }
        missing
    }

    /// Reject settings the poll loop cannot run with
    pub fn validate(&self) -> crate::Result<()> {
        if self.polling.retry_period_seconds == 0 {
            return Err(crate::SentinelError::Config(
                "polling.retry_period_seconds must be greater than zero".to_string(),
            ));
        }
        if self.tracker.request_timeout_seconds == 0 {
            return Err(crate::SentinelError::Config(
                "tracker.request_timeout_seconds must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Fill credentials from the process environment
    pub fn resolve_secrets(&mut self) {
        self.resolve_secrets_with(|name| std::env::var(name).ok());
    }

    /// Fill credentials from `lookup`. Non-empty values override the file.
    pub fn resolve_secrets_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|v| !v.is_empty());

        if let Some(token) = lookup(PRACTICUM_TOKEN_VAR) {
            tracing::debug!("Using {} from environment", PRACTICUM_TOKEN_VAR);
            self.tracker.token = Some(token);
        }
        if let Some(token) = lookup(TELEGRAM_TOKEN_VAR) {
            tracing::debug!("Using {} from environment", TELEGRAM_TOKEN_VAR);
            self.telegram.token = Some(token);
        }
        if let Some(chat_id) = lookup(TELEGRAM_CHAT_ID_VAR) {
            tracing::debug!("Using {} from environment", TELEGRAM_CHAT_ID_VAR);
            self.telegram.chat_id = Some(chat_id);
        }
    }
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::SentinelError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}
