use std::time::Duration;

use crate::types::block::BlockRange;

/// How much of a range a scan covers and how long a single block fetch may take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanStrategy {
    pub name: &'static str,
    /// Number of most recent blocks covered, the whole range when `None`.
    pub window: Option<u64>,
    pub block_timeout: Duration,
}

impl ScanStrategy {
    pub fn primary(block_timeout: Duration) -> Self {
        Self { name: "primary", window: None, block_timeout }
    }

    pub fn fallback(window: u64, block_timeout: Duration) -> Self {
        Self { name: "fallback", window: Some(window), block_timeout }
    }

    pub fn bounded(&self, range: BlockRange) -> BlockRange {
        match self.window {
            Some(window) => range.top(window),
            None => range,
        }
    }
}
