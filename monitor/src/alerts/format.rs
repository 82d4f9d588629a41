//! Rendering of [`AlertMessage`]s into webhook payloads and condensed plain text.

use alloy::primitives::Address;
use chrono::Utc;

use crate::types::alert::{AlertMessage, Embed, EmbedField, WebhookPayload};
use crate::types::constant::{colors, ALERT_MAX_LISTED_ADDRESSES, ALERT_TEXT_LIMIT, PERIODIC_REPORT_RED_THRESHOLD};
use crate::utils::helpers::{format_percentage, truncate};

const CALL_TO_ACTION: &str = "Check the keepers and the workable conditions of the listed jobs.";

impl AlertMessage {
    pub fn to_payload(&self, username: &str) -> WebhookPayload {
        WebhookPayload { content: None, username: Some(username.to_string()), embeds: vec![self.embed()] }
    }

    fn embed(&self) -> Embed {
        let (title, description, color, fields) = match self {
            AlertMessage::Stalled { stalled, total_jobs, range } => (
                "🚨 Stalled Jobs Detected".to_string(),
                format!(
                    "{} of {} jobs have not been worked in the last {} blocks.",
                    stalled.len(),
                    total_jobs,
                    range.block_count()
                ),
                colors::STALLED,
                vec![
                    EmbedField::inline("Stalled Jobs", stalled.len().to_string()),
                    EmbedField::inline("Total Jobs", total_jobs.to_string()),
                    EmbedField::inline("Stalled", format_percentage(stalled.len(), *total_jobs)),
                    EmbedField::new("Block Range", range.to_string()),
                    EmbedField::new("Addresses", address_list(stalled, "\n")),
                    EmbedField::new("Action Required", CALL_TO_ACTION),
                ],
            ),
            AlertMessage::Healthy { total_jobs, range } => (
                "✅ All Jobs Healthy".to_string(),
                format!("All {} jobs were worked within the checked range.", total_jobs),
                colors::HEALTHY,
                vec![
                    EmbedField::inline("Total Jobs", total_jobs.to_string()),
                    EmbedField::inline("Block Range", range.to_string()),
                ],
            ),
            AlertMessage::SystemError { error, stack, request_id } => {
                let mut fields = vec![EmbedField::new("Error", truncate(error, ALERT_TEXT_LIMIT))];
                if let Some(stack) = stack {
                    fields.push(EmbedField::new("Stack", truncate(stack, ALERT_TEXT_LIMIT)));
                }
                fields.push(EmbedField::new("Request ID", request_id.clone()));
                ("⚠️ System Error".to_string(), "The monitor failed to complete a run.".to_string(), colors::ERROR, fields)
            }
            AlertMessage::ConfigError { missing } => (
                "⚙️ Configuration Error".to_string(),
                "The monitor cannot start until its configuration is fixed.".to_string(),
                colors::CONFIG,
                vec![EmbedField::new("Missing or Invalid Variables", missing.join("\n"))],
            ),
            AlertMessage::RpcError { endpoint, error } => (
                "🔌 RPC Error".to_string(),
                "The monitor could not read the chain.".to_string(),
                colors::ERROR,
                vec![
                    EmbedField::new("Endpoint", endpoint.clone()),
                    EmbedField::new("Error", truncate(error, ALERT_TEXT_LIMIT)),
                ],
            ),
            AlertMessage::PeriodicReport { total_jobs, stalled_jobs, range } => (
                "📊 Job Health Report".to_string(),
                format!("{} of {} jobs are healthy.", total_jobs.saturating_sub(*stalled_jobs), total_jobs),
                periodic_report_color(*stalled_jobs),
                vec![
                    EmbedField::inline(
                        "Health",
                        format_percentage(total_jobs.saturating_sub(*stalled_jobs), *total_jobs),
                    ),
                    EmbedField::inline("Total Jobs", total_jobs.to_string()),
                    EmbedField::inline("Stalled Jobs", stalled_jobs.to_string()),
                    EmbedField::new("Block Range", range.to_string()),
                ],
            ),
            AlertMessage::Simple { title, description } => (title.clone(), description.clone(), colors::INFO, vec![]),
        };

        Embed { title, description, color, timestamp: Utc::now().to_rfc3339(), fields }
    }

    /// Condensed single-message rendering used when rich delivery keeps failing.
    pub fn to_plain_text(&self) -> String {
        match self {
            AlertMessage::Stalled { stalled, total_jobs, range } => format!(
                "[STALLED] {}/{} jobs stalled ({}) in blocks {}: {}",
                stalled.len(),
                total_jobs,
                format_percentage(stalled.len(), *total_jobs),
                range,
                address_list(stalled, ", ")
            ),
            AlertMessage::Healthy { total_jobs, range } => {
                format!("[HEALTHY] all {} jobs worked in blocks {}", total_jobs, range)
            }
            AlertMessage::SystemError { error, request_id, .. } => {
                format!("[SYSTEM ERROR] {} (request {})", truncate(error, ALERT_TEXT_LIMIT), request_id)
            }
            AlertMessage::ConfigError { missing } => format!("[CONFIG ERROR] missing: {}", missing.join(", ")),
            AlertMessage::RpcError { endpoint, error } => {
                format!("[RPC ERROR] {}: {}", endpoint, truncate(error, ALERT_TEXT_LIMIT))
            }
            AlertMessage::PeriodicReport { total_jobs, stalled_jobs, range } => format!(
                "[REPORT] {} healthy, {}/{} jobs stalled in blocks {}",
                format_percentage(total_jobs.saturating_sub(*stalled_jobs), *total_jobs),
                stalled_jobs,
                total_jobs,
                range
            ),
            AlertMessage::Simple { title, description } => format!("{}: {}", title, description),
        }
    }
}

/// At most [`ALERT_MAX_LISTED_ADDRESSES`] addresses, then `+N more`.
pub fn address_list(addresses: &[Address], separator: &str) -> String {
    let mut lines: Vec<String> =
        addresses.iter().take(ALERT_MAX_LISTED_ADDRESSES).map(|address| format!("`{}`", address)).collect();
    if addresses.len() > ALERT_MAX_LISTED_ADDRESSES {
        lines.push(format!("+{} more", addresses.len() - ALERT_MAX_LISTED_ADDRESSES));
    }
    if lines.is_empty() {
        return "-".to_string();
    }
    lines.join(separator)
}

pub fn periodic_report_color(stalled_jobs: usize) -> u32 {
    match stalled_jobs {
        0 => colors::HEALTHY,
        n if n < PERIODIC_REPORT_RED_THRESHOLD => colors::WARNING,
        _ => colors::STALLED,
    }
}
