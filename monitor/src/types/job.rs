use alloy::primitives::Address;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::constant::FAIL_SAFE_STALLED;

/// Last known staleness verdict for one job.
///
/// `is_stalled` is always equal to `last_worked_block.is_none()`; the constructors are the only
/// way to build a status so the two can never disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatus {
    address: Address,
    last_worked_block: Option<u64>,
    is_stalled: bool,
    last_checked: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl JobStatus {
    /// Verdict of a completed scan: stalled iff no work call was found.
    pub fn from_scan(address: Address, last_worked_block: Option<u64>) -> Self {
        Self {
            address,
            last_worked_block,
            is_stalled: last_worked_block.is_none(),
            last_checked: Utc::now(),
            error: None,
        }
    }

    /// Verdict for a job that could not be evaluated. Uses [`FAIL_SAFE_STALLED`].
    pub fn failed(address: Address, reason: impl Into<String>) -> Self {
        Self {
            address,
            last_worked_block: None,
            is_stalled: FAIL_SAFE_STALLED,
            last_checked: Utc::now(),
            error: Some(reason.into()),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn last_worked_block(&self) -> Option<u64> {
        self.last_worked_block
    }

    pub fn is_stalled(&self) -> bool {
        self.is_stalled
    }

    pub fn last_checked(&self) -> DateTime<Utc> {
        self.last_checked
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
