//! Staleness scanner: finds the most recent block in which a job received a `work` call.
//!
//! Blocks are examined from the top of the range downwards and the first match wins. A block that
//! cannot be fetched in time is skipped. When the primary strategy cannot read a single block,
//! the fallback strategy retries over the most recent blocks only, with a longer timeout. Every
//! fresh verdict is written to the job status cache, and non-stalled verdicts are served from it
//! until they expire.

pub mod strategy;

use std::sync::Arc;

use alloy::primitives::Address;
use futures::stream::{self, StreamExt};
use thiserror::Error;
use tracing::{debug, instrument, warn};

pub use strategy::ScanStrategy;

use crate::core::cache::TtlLruCache;
use crate::core::client::{ChainClient, ChainError};
use crate::types::block::{BlockRange, BlockRecord};
use crate::types::constant::WORK_SELECTOR;
use crate::types::job::JobStatus;
use crate::types::params::ScanParams;
use crate::utils::metrics::MONITOR_METRICS;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("Invalid block range: from block {from} is above to block {to}")]
    InvalidRange { from: u64, to: u64 },

    #[error("{strategy} scan could not read any of the {attempted} blocks it tried")]
    NoBlocksExamined { strategy: &'static str, attempted: u64 },
}

pub struct StalenessScanner {
    chain: Arc<dyn ChainClient>,
    block_cache: TtlLruCache<u64, Arc<BlockRecord>>,
    job_cache: TtlLruCache<Address, JobStatus>,
    primary: ScanStrategy,
    fallback: ScanStrategy,
    max_concurrent_scans: usize,
}

impl StalenessScanner {
    pub fn new(chain: Arc<dyn ChainClient>, params: &ScanParams) -> Self {
        Self {
            chain,
            block_cache: TtlLruCache::new(params.block_cache_capacity, params.block_cache_ttl),
            job_cache: TtlLruCache::new(params.job_cache_capacity, params.job_cache_ttl),
            primary: ScanStrategy::primary(params.block_timeout),
            fallback: ScanStrategy::fallback(params.fallback_window, params.fallback_block_timeout),
            max_concurrent_scans: params.max_concurrent_scans.get(),
        }
    }

    /// Returns the highest block in `[from_block, to_block]` containing a `work` call to `address`.
    ///
    /// `None` means stalled, including when neither strategy could read the chain.
    #[instrument(skip(self, address), fields(job = %address))]
    pub async fn evaluate(&self, address: Address, from_block: u64, to_block: u64) -> Result<Option<u64>, ScanError> {
        let range = BlockRange::new(from_block, to_block)?;

        if let Some(cached) = self.job_cache.get(&address) {
            if !cached.is_stalled() {
                debug!(last_worked_block = ?cached.last_worked_block(), "Using cached verdict");
                return Ok(cached.last_worked_block());
            }
        }

        let last_worked_block = match self.scan(address, range, &self.primary).await {
            Ok(found) => found,
            Err(e) => {
                warn!(error = %e, window = ?self.fallback.window, "Primary scan failed, retrying with the fallback strategy");
                MONITOR_METRICS.fallback_scans.add(1, &[]);
                self.scan(address, range, &self.fallback).await.unwrap_or_else(|e| {
                    warn!(error = %e, "Fallback scan failed, treating the job as stalled");
                    None
                })
            }
        };

        self.job_cache.set(address, JobStatus::from_scan(address, last_worked_block));
        Ok(last_worked_block)
    }

    /// Evaluates every address concurrently, at most `max_concurrent_scans` at a time.
    ///
    /// `output[i]` always describes `addresses[i]`. A failed evaluation becomes a
    /// [`JobStatus::failed`] entry instead of failing the batch.
    pub async fn evaluate_many(
        &self,
        addresses: &[Address],
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<JobStatus>, ScanError> {
        BlockRange::new(from_block, to_block)?;

        let statuses = stream::iter(addresses.iter().copied())
            .map(|address| async move {
                match self.evaluate(address, from_block, to_block).await {
                    Ok(last_worked_block) => JobStatus::from_scan(address, last_worked_block),
                    Err(e) => {
                        warn!(job = %address, error = %e, "Evaluation failed, marking the job as stalled");
                        JobStatus::failed(address, e.to_string())
                    }
                }
            })
            .buffered(self.max_concurrent_scans)
            .collect::<Vec<_>>()
            .await;

        MONITOR_METRICS.jobs_checked.add(statuses.len() as u64, &[]);
        Ok(statuses)
    }

    pub fn clear_caches(&self) {
        self.block_cache.clear();
        self.job_cache.clear();
    }

    /// `(blocks, jobs)` entries currently cached.
    pub fn cache_sizes(&self) -> (usize, usize) {
        (self.block_cache.size(), self.job_cache.size())
    }

    /// Cached verdict for `address`, if still fresh.
    pub fn cached_status(&self, address: &Address) -> Option<JobStatus> {
        self.job_cache.get(address)
    }

    async fn scan(
        &self,
        address: Address,
        range: BlockRange,
        strategy: &ScanStrategy,
    ) -> Result<Option<u64>, ScanError> {
        let range = strategy.bounded(range);
        let mut examined = 0u64;

        for number in range.descending() {
            let Some(block) = self.fetch_block(number, strategy).await else {
                continue;
            };
            examined += 1;
            if block.has_call_to(address, &WORK_SELECTOR) {
                debug!(block = number, strategy = strategy.name, "Found work call");
                return Ok(Some(number));
            }
        }

        if examined == 0 {
            return Err(ScanError::NoBlocksExamined { strategy: strategy.name, attempted: range.block_count() });
        }
        debug!(%range, examined, strategy = strategy.name, "No work call in range");
        Ok(None)
    }

    async fn fetch_block(&self, number: u64, strategy: &ScanStrategy) -> Option<Arc<BlockRecord>> {
        if let Some(block) = self.block_cache.get(&number) {
            return Some(block);
        }

        let fetched = tokio::time::timeout(strategy.block_timeout, self.chain.get_block_with_transactions(number))
            .await
            .unwrap_or(Err(ChainError::Timeout { method: "eth_getBlockByNumber", timeout: strategy.block_timeout }));

        match fetched {
            Ok(block) => {
                let block = Arc::new(block);
                self.block_cache.set(number, Arc::clone(&block));
                Some(block)
            }
            Err(e) => {
                warn!(block = number, strategy = strategy.name, error = %e, "Skipping block");
                MONITOR_METRICS.block_fetch_failures.add(1, &[]);
                None
            }
        }
    }
}
