//! Notifier trait for delivering chat messages

use async_trait::async_trait;

/// Trait for sending a text message to the configured chat
#[async_trait]
pub trait Notifier: Send + Sync + std::fmt::Debug {
    /// Get the notifier type name (e.g. "telegram")
    fn type_name(&self) -> &str;

    /// Make one delivery attempt for `message`
    async fn send_message(&self, message: &str) -> crate::Result<()>;
}
