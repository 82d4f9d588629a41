use std::fmt;

use alloy::primitives::{Address, Bytes, B256};
use serde::Serialize;

use crate::scanner::ScanError;

/// Minimal view of a transaction: enough to recognise a call to a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRef {
    pub to: Option<Address>,
    pub data: Bytes,
    pub hash: B256,
}

impl TransactionRef {
    /// Whether this transaction is sent to `target` with calldata starting with `selector`.
    pub fn calls(&self, target: Address, selector: &[u8]) -> bool {
        self.to == Some(target) && self.data.starts_with(selector)
    }
}

/// A fetched block with its full transaction list. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRecord {
    pub number: u64,
    pub hash: B256,
    pub timestamp: u64,
    pub transactions: Vec<TransactionRef>,
}

impl BlockRecord {
    pub fn has_call_to(&self, target: Address, selector: &[u8]) -> bool {
        self.transactions.iter().any(|tx| tx.calls(target, selector))
    }
}

/// Inclusive block range with `from <= to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockRange {
    from: u64,
    to: u64,
}

impl BlockRange {
    pub fn new(from: u64, to: u64) -> Result<Self, ScanError> {
        if from > to {
            return Err(ScanError::InvalidRange { from, to });
        }
        Ok(Self { from, to })
    }

    /// `[head - span, head]`, saturating at genesis.
    pub fn ending_at(head: u64, span: u64) -> Self {
        Self { from: head.saturating_sub(span), to: head }
    }

    pub fn from(&self) -> u64 {
        self.from
    }

    pub fn to(&self) -> u64 {
        self.to
    }

    pub fn block_count(&self) -> u64 {
        self.to - self.from + 1
    }

    /// The highest `window` blocks of the range. A zero window is treated as one block.
    pub fn top(&self, window: u64) -> Self {
        let span = window.max(1) - 1;
        Self { from: self.from.max(self.to.saturating_sub(span)), to: self.to }
    }

    /// Block numbers from `to` down to `from`.
    pub fn descending(&self) -> impl Iterator<Item = u64> {
        (self.from..=self.to).rev()
    }
}

impl fmt::Display for BlockRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} → #{}", self.from, self.to)
    }
}
