use std::sync::Arc;
use std::time::Duration;

use opentelemetry::KeyValue;
use tracing::{error, info, instrument, warn};

use crate::core::client::alert::error::is_non_retryable_status;
use crate::core::client::{AlertError, WebhookClient};
use crate::types::alert::AlertMessage;
use crate::types::params::AlertParams;
use crate::utils::metrics::MONITOR_METRICS;

/// Delivers alerts with bounded retries and a plain-text fallback.
pub struct AlertDispatcher {
    client: Arc<dyn WebhookClient>,
    username: String,
    max_attempts: u32,
    base_delay: Duration,
}

impl AlertDispatcher {
    pub fn new(client: Arc<dyn WebhookClient>, params: &AlertParams) -> Self {
        Self {
            client,
            username: params.username.clone(),
            max_attempts: params.max_attempts.max(1),
            base_delay: params.base_delay,
        }
    }

    /// Sends `message`, retrying on 429, 5xx and transport errors.
    ///
    /// - 2xx: delivered.
    /// - 401/403/404: [`AlertError::Fatal`] after that single attempt, no fallback.
    /// - 429: waits for the server's retry-after hint, or the backoff when there is none.
    /// - anything else: waits `base_delay * attempt`.
    ///
    /// Once every attempt failed, the plain-text rendering is sent once. If that fails too,
    /// [`AlertError::Terminal`] carries both causes. There is no wait after the last attempt.
    #[instrument(skip_all, fields(kind = %message.kind()))]
    pub async fn send_with_retry(&self, message: &AlertMessage) -> Result<(), AlertError> {
        let kind = KeyValue::new("kind", message.kind().to_string());
        let payload = message.to_payload(&self.username);
        let mut last_error = None;

        for attempt in 1..=self.max_attempts {
            MONITOR_METRICS.alert_attempts.add(1, &[kind.clone()]);

            let delay = match self.client.send_payload(&payload).await {
                Ok(response) if response.is_success() => {
                    info!(attempt, status = response.status, "Alert delivered");
                    return Ok(());
                }
                Ok(response) if is_non_retryable_status(response.status) => {
                    error!(attempt, status = response.status, "Webhook rejected the alert, not retrying");
                    let error = AlertError::Fatal { status: response.status, body: response.body };
                    MONITOR_METRICS.alert_failures.add(1, &[kind, KeyValue::new("error_type", error.error_type())]);
                    return Err(error);
                }
                Ok(response) => {
                    let backoff = self.backoff(attempt);
                    let delay = match (response.status, response.retry_after) {
                        (429, Some(retry_after)) => retry_after,
                        _ => backoff,
                    };
                    warn!(attempt, status = response.status, ?delay, "Alert delivery failed");
                    last_error = Some(AlertError::Retryable { status: response.status, reason: response.body });
                    delay
                }
                Err(e) => {
                    let delay = self.backoff(attempt);
                    warn!(attempt, error = %e, ?delay, "Alert delivery failed");
                    last_error = Some(e);
                    delay
                }
            };

            if attempt < self.max_attempts {
                tokio::time::sleep(delay).await;
            }
        }

        let primary = last_error.unwrap_or_else(|| AlertError::Transport("no delivery attempt was made".to_string()));
        self.send_fallback(message, primary).await.inspect_err(|e| {
            MONITOR_METRICS.alert_failures.add(1, &[kind, KeyValue::new("error_type", e.error_type())]);
        })
    }

    async fn send_fallback(&self, message: &AlertMessage, primary: AlertError) -> Result<(), AlertError> {
        warn!(error = %primary, "Retries exhausted, sending plain-text fallback");

        let fallback = match self.client.send_plain_text(&message.to_plain_text()).await {
            Ok(response) if response.is_success() => {
                info!(status = response.status, "Plain-text fallback delivered");
                return Ok(());
            }
            Ok(response) => AlertError::from_status(response.status, response.body),
            Err(e) => e,
        };

        error!(primary = %primary, fallback = %fallback, "Alert could not be delivered");
        Err(AlertError::Terminal { primary: Box::new(primary), fallback: Box::new(fallback) })
    }

    fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}
