//! Telegram Bot API notification client

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::TelegramConfig;
use crate::io::HttpClient;
use crate::notifier::Notifier;
use crate::SentinelError;

/// Sends messages to a single Telegram chat through the Bot API
pub struct TelegramNotifier {
    send_url: String,
    chat_id: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

impl TelegramNotifier {
    pub fn new(config: &TelegramConfig, http: Arc<dyn HttpClient>) -> Self {
        let token = config.token.as_deref().unwrap_or_default();
        let chat_id = config.chat_id.clone().unwrap_or_default();
        let send_url = format!(
            "{}/bot{}/sendMessage",
            config.api_url.trim_end_matches('/'),
            token
        );

        tracing::debug!("Created TelegramNotifier for chat {}", chat_id);

        Self {
            send_url,
            chat_id,
            http,
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn type_name(&self) -> &str {
        "telegram"
    }

    async fn send_message(&self, message: &str) -> crate::Result<()> {
        tracing::info!("Sending Telegram message to chat {}", self.chat_id);

        let params = [("chat_id", self.chat_id.as_str()), ("text", message)];
        let response = self
            .http
            .post_form(&self.send_url, &params)
            .await
            .map_err(|e| {
                tracing::error!("Telegram request failed: {}", e);
                SentinelError::Telegram(e.to_string())
            })?;

        if response.status != 200 {
            tracing::error!("Telegram API returned status {}", response.status);
            return Err(SentinelError::Telegram(format!(
                "Telegram API returned status {}: {}",
                response.status, response.body
            )));
        }

        tracing::debug!("Telegram message sent");
        Ok(())
    }
}
