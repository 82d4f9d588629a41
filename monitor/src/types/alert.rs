use std::fmt;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use crate::types::block::BlockRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertKind {
    Stalled,
    Healthy,
    SystemError,
    ConfigError,
    RpcError,
    PeriodicReport,
    Simple,
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AlertKind::Stalled => "stalled",
            AlertKind::Healthy => "healthy",
            AlertKind::SystemError => "system-error",
            AlertKind::ConfigError => "config-error",
            AlertKind::RpcError => "rpc-error",
            AlertKind::PeriodicReport => "periodic-report",
            AlertKind::Simple => "simple",
        };
        write!(f, "{}", name)
    }
}

/// Information carried by one alert. Rendering lives in `alerts::format`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertMessage {
    Stalled { stalled: Vec<Address>, total_jobs: usize, range: BlockRange },
    Healthy { total_jobs: usize, range: BlockRange },
    SystemError { error: String, stack: Option<String>, request_id: String },
    ConfigError { missing: Vec<String> },
    RpcError { endpoint: String, error: String },
    PeriodicReport { total_jobs: usize, stalled_jobs: usize, range: BlockRange },
    Simple { title: String, description: String },
}

impl AlertMessage {
    pub fn kind(&self) -> AlertKind {
        match self {
            AlertMessage::Stalled { .. } => AlertKind::Stalled,
            AlertMessage::Healthy { .. } => AlertKind::Healthy,
            AlertMessage::SystemError { .. } => AlertKind::SystemError,
            AlertMessage::ConfigError { .. } => AlertKind::ConfigError,
            AlertMessage::RpcError { .. } => AlertKind::RpcError,
            AlertMessage::PeriodicReport { .. } => AlertKind::PeriodicReport,
            AlertMessage::Simple { .. } => AlertKind::Simple,
        }
    }
}

/// JSON body accepted by the webhook.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookPayload {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub embeds: Vec<Embed>,
}

impl WebhookPayload {
    /// Body of the plain-text path: `{content, username}` only.
    pub fn plain_text(content: impl Into<String>, username: Option<String>) -> Self {
        Self { content: Some(content.into()), username, embeds: Vec::new() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
    /// ISO-8601
    pub timestamp: String,
    pub fields: Vec<EmbedField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub inline: Option<bool>,
}

impl EmbedField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: value.into(), inline: None }
    }

    pub fn inline(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: value.into(), inline: Some(true) }
    }
}
