use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use reqwest::Client;
use serde::Serialize;
use url::Url;

use super::{AlertError, WebhookClient, WebhookResponse};
use crate::types::alert::WebhookPayload;
use crate::types::constant::MAX_RETRY_AFTER;
use crate::types::params::AlertParams;

/// [`WebhookClient`] posting JSON bodies with reqwest.
#[derive(Debug, Clone)]
pub struct HttpWebhookClient {
    client: Client,
    url: Url,
    username: String,
}

impl HttpWebhookClient {
    pub fn new(url: Url, username: impl Into<String>, request_timeout: Duration) -> Result<Self, AlertError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| AlertError::ClientSetup(e.to_string()))?;
        Ok(Self { client, url, username: username.into() })
    }

    pub fn from_params(params: &AlertParams) -> Result<Self, AlertError> {
        Self::new(params.webhook_url.clone(), params.username.clone(), params.request_timeout)
    }

    async fn post<T: Serialize + Sync>(&self, body: &T) -> Result<WebhookResponse, AlertError> {
        let response =
            self.client.post(self.url.clone()).json(body).send().await.map_err(AlertError::from_reqwest_error)?;

        let status = response.status().as_u16();
        let header_hint = response.headers().get(RETRY_AFTER).and_then(|v| v.to_str().ok()).and_then(parse_seconds);
        // The body is diagnostic only; an unreadable body must not hide the status.
        let body = response.text().await.unwrap_or_default();
        let retry_after = header_hint.or_else(|| retry_after_from_body(&body));

        Ok(WebhookResponse { status, retry_after, body })
    }
}

#[async_trait]
impl WebhookClient for HttpWebhookClient {
    async fn send_payload(&self, payload: &WebhookPayload) -> Result<WebhookResponse, AlertError> {
        self.post(payload).await
    }

    async fn send_plain_text(&self, content: &str) -> Result<WebhookResponse, AlertError> {
        self.post(&WebhookPayload::plain_text(content, Some(self.username.clone()))).await
    }
}

/// Parses a delay in seconds, integer or fractional.
pub fn parse_seconds(raw: &str) -> Option<Duration> {
    raw.trim().parse::<f64>().ok().and_then(seconds)
}

/// Negative, non-finite and unrepresentable values are no hint at all; long waits are capped.
fn seconds(value: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(value).ok().map(|delay| delay.min(MAX_RETRY_AFTER))
}

/// Reads `retry_after` (seconds) from a JSON error body.
pub fn retry_after_from_body(body: &str) -> Option<Duration> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("retry_after")? {
        serde_json::Value::Number(n) => n.as_f64().and_then(seconds),
        serde_json::Value::String(s) => parse_seconds(s),
        _ => None,
    }
}
