use std::time::Duration;

use alloy::primitives::Address;
use serde::Serialize;
use tracing::{error, info};

use crate::types::block::BlockRange;
use crate::types::job::JobStatus;

/// Outcome of one successful check over all registered jobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub total_jobs: usize,
    pub stalled_jobs: usize,
    pub healthy_jobs: usize,
    pub current_block: u64,
    pub checked_block_range: BlockRange,
    pub stalled_addresses: Vec<Address>,
}

impl RunSummary {
    pub fn from_statuses(statuses: &[JobStatus], current_block: u64, checked_block_range: BlockRange) -> Self {
        let stalled_addresses: Vec<Address> =
            statuses.iter().filter(|status| status.is_stalled()).map(JobStatus::address).collect();
        Self {
            total_jobs: statuses.len(),
            stalled_jobs: stalled_addresses.len(),
            healthy_jobs: statuses.len() - stalled_addresses.len(),
            current_block,
            checked_block_range,
            stalled_addresses,
        }
    }

    pub fn has_stalled_jobs(&self) -> bool {
        self.stalled_jobs > 0
    }
}

/// Structured result of one trigger, successful or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub request_id: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<RunSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub alert_delivered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert_error: Option<String>,
    pub duration_ms: u64,
}

impl RunReport {
    pub fn succeeded(request_id: String, summary: RunSummary, alert_outcome: AlertOutcome, elapsed: Duration) -> Self {
        Self {
            request_id,
            success: true,
            summary: Some(summary),
            error: None,
            alert_delivered: alert_outcome.delivered,
            alert_error: alert_outcome.error,
            duration_ms: elapsed_ms(elapsed),
        }
    }

    pub fn failed(request_id: String, error: String, alert_outcome: AlertOutcome, elapsed: Duration) -> Self {
        Self {
            request_id,
            success: false,
            summary: None,
            error: Some(error),
            alert_delivered: alert_outcome.delivered,
            alert_error: alert_outcome.error,
            duration_ms: elapsed_ms(elapsed),
        }
    }

    /// Emits the report as a single structured log line.
    pub fn log(&self) {
        let report = serde_json::to_string(self).unwrap_or_else(|e| format!("<unserializable report: {}>", e));
        if self.success {
            info!(
                request_id = %self.request_id,
                duration_ms = self.duration_ms,
                alert_delivered = self.alert_delivered,
                report = %report,
                "Run completed"
            );
        } else {
            error!(
                request_id = %self.request_id,
                duration_ms = self.duration_ms,
                alert_delivered = self.alert_delivered,
                report = %report,
                "Run failed"
            );
        }
    }
}

/// Whether the alert of a run went out, and why not if it did not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertOutcome {
    pub delivered: bool,
    pub error: Option<String>,
}

impl AlertOutcome {
    pub fn delivered() -> Self {
        Self { delivered: true, error: None }
    }

    pub fn not_sent() -> Self {
        Self::default()
    }

    pub fn failed(error: impl ToString) -> Self {
        Self { delivered: false, error: Some(error.to_string()) }
    }
}

fn elapsed_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}
