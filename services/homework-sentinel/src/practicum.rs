//! Practicum homework status API client

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::TrackerConfig;
use crate::io::HttpClient;
use crate::SentinelError;

/// Source of homework status updates
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fetch every status change since `from_date` (Unix seconds)
    async fn get_api_answer(&self, from_date: i64) -> crate::Result<Value>;
}

/// Client for the Practicum homework status endpoint
pub struct PracticumClient {
    endpoint: String,
    authorization: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for PracticumClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PracticumClient")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl PracticumClient {
    pub fn new(config: &TrackerConfig, http: Arc<dyn HttpClient>) -> Self {
        let token = config.token.as_deref().unwrap_or_default();
        tracing::debug!("Created PracticumClient for {}", config.endpoint);

        Self {
            endpoint: config.endpoint.clone(),
            authorization: format!("OAuth {}", token),
            http,
        }
    }
}

/// Longest slice of a response body quoted in a diagnostic (in characters).
/// Keeps failure alerts well under Telegram's 4096 character message limit.
pub const MAX_BODY_CHARS: usize = 1000;

fn excerpt(body: &str) -> String {
    match body.char_indices().nth(MAX_BODY_CHARS) {
        Some((end, _)) => format!("{}…", &body[..end]),
        None => body.to_string(),
    }
}

fn reason_phrase(status: u16) -> &'static str {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown")
}

#[async_trait]
impl StatusSource for PracticumClient {
    async fn get_api_answer(&self, from_date: i64) -> crate::Result<Value> {
        let from_date = from_date.to_string();
        tracing::info!("Requesting homework statuses since {}", from_date);

        let response = self
            .http
            .get(
                &self.endpoint,
                &[("Authorization", self.authorization.as_str())],
                &[("from_date", from_date.as_str())],
            )
            .await
            .map_err(|e| SentinelError::ResponseCode(format!("request failed: {}", e)))?;

        if response.status != 200 {
            return Err(SentinelError::ResponseCode(format!(
                "status {} {}: {}",
                response.status,
                reason_phrase(response.status),
                excerpt(&response.body)
            )));
        }

        serde_json::from_str(&response.body).map_err(|e| {
            SentinelError::ResponseCode(format!(
                "status 200 with undecodable body ({}): {}",
                e,
                excerpt(&response.body)
            ))
        })
    }
}
