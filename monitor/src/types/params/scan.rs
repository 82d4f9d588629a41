use std::num::NonZeroUsize;
use std::time::Duration;

use super::{cache_ttl, non_zero, ConfigError, ENV_BLOCKS_TO_CHECK};
use crate::cli::RunCmd;
use crate::types::constant::{
    BLOCK_CACHE_CAPACITY, BLOCK_CACHE_TTL_FACTOR, DEFAULT_BLOCK_TIMEOUT, DEFAULT_CACHE_TTL,
    DEFAULT_FALLBACK_BLOCK_TIMEOUT, DEFAULT_FALLBACK_WINDOW, DEFAULT_MAX_CONCURRENT_SCANS, JOB_CACHE_CAPACITY,
    MAX_BLOCKS_TO_CHECK,
};

/// Settings of the staleness scanner and its two caches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanParams {
    pub max_concurrent_scans: NonZeroUsize,
    pub block_timeout: Duration,
    pub fallback_window: u64,
    pub fallback_block_timeout: Duration,
    pub job_cache_capacity: NonZeroUsize,
    pub job_cache_ttl: Duration,
    pub block_cache_capacity: NonZeroUsize,
    pub block_cache_ttl: Duration,
}

impl Default for ScanParams {
    fn default() -> Self {
        Self {
            max_concurrent_scans: DEFAULT_MAX_CONCURRENT_SCANS,
            block_timeout: DEFAULT_BLOCK_TIMEOUT,
            fallback_window: DEFAULT_FALLBACK_WINDOW,
            fallback_block_timeout: DEFAULT_FALLBACK_BLOCK_TIMEOUT,
            job_cache_capacity: JOB_CACHE_CAPACITY,
            job_cache_ttl: DEFAULT_CACHE_TTL,
            block_cache_capacity: BLOCK_CACHE_CAPACITY,
            block_cache_ttl: DEFAULT_CACHE_TTL * BLOCK_CACHE_TTL_FACTOR,
        }
    }
}

impl ScanParams {
    /// Block cache capacity able to hold a whole checked range of `blocks_to_check + 1` blocks,
    /// so scanning one job never evicts blocks another job is about to read.
    pub fn block_cache_capacity_for(blocks_to_check: u64) -> NonZeroUsize {
        usize::try_from(blocks_to_check.saturating_add(1))
            .ok()
            .and_then(NonZeroUsize::new)
            .unwrap_or(NonZeroUsize::MAX)
            .max(BLOCK_CACHE_CAPACITY)
    }
}

impl TryFrom<&RunCmd> for ScanParams {
    type Error = ConfigError;

    fn try_from(run_cmd: &RunCmd) -> Result<Self, Self::Error> {
        let args = &run_cmd.scan_args;
        if args.fallback_window == 0 {
            return Err(ConfigError::invalid("JOB_MONITOR_FALLBACK_WINDOW", "must be greater than zero"));
        }
        if args.block_timeout_ms == 0 || args.fallback_block_timeout_ms == 0 {
            return Err(ConfigError::invalid("JOB_MONITOR_BLOCK_TIMEOUT_MS", "block timeouts must be greater than zero"));
        }
        if args.blocks_to_check > MAX_BLOCKS_TO_CHECK {
            return Err(ConfigError::invalid(ENV_BLOCKS_TO_CHECK, format!("must be at most {}", MAX_BLOCKS_TO_CHECK)));
        }

        let ttl = cache_ttl(run_cmd.registry_args.cache_ttl_minutes)?;
        Ok(Self {
            max_concurrent_scans: non_zero(args.max_concurrent_scans, "JOB_MONITOR_MAX_CONCURRENT_SCANS")?,
            block_timeout: Duration::from_millis(args.block_timeout_ms),
            fallback_window: args.fallback_window,
            fallback_block_timeout: Duration::from_millis(args.fallback_block_timeout_ms),
            job_cache_ttl: ttl,
            block_cache_capacity: Self::block_cache_capacity_for(args.blocks_to_check),
            block_cache_ttl: ttl * BLOCK_CACHE_TTL_FACTOR,
            ..Self::default()
        })
    }
}
