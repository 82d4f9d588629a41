pub mod error;
pub mod webhook;

use std::time::Duration;

use async_trait::async_trait;

pub use error::AlertError;

use crate::types::alert::WebhookPayload;

/// What the webhook answered to one POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookResponse {
    pub status: u16,
    /// Rate-limit hint from the `Retry-After` header or the `retry_after` body field.
    pub retry_after: Option<Duration>,
    pub body: String,
}

impl WebhookResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// WebhookClient trait
///
/// Any HTTP status is returned as an `Ok` response so the caller decides on retries;
/// only transport failures are errors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WebhookClient: Send + Sync {
    /// send_payload posts a rich payload with embeds.
    async fn send_payload(&self, payload: &WebhookPayload) -> Result<WebhookResponse, AlertError>;

    /// send_plain_text posts `{content, username}` only.
    ///
    /// # Arguments
    ///
    /// * `content` - The condensed message text.
    async fn send_plain_text(&self, content: &str) -> Result<WebhookResponse, AlertError>;
}
