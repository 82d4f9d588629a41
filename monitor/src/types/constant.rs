use std::num::NonZeroUsize;
use std::time::Duration;

use alloy::sol;
use alloy::sol_types::SolCall;

sol! {
    /// Keeper job interface. Only the selector of `work` is used, to recognise
    /// executor calls among the transactions of a block.
    interface IJob {
        function work(bytes32 network, bytes calldata args) external;
    }
}

/// First four bytes of `keccak256("work(bytes32,bytes)")`.
pub const WORK_SELECTOR: [u8; 4] = IJob::workCall::SELECTOR;

/// Verdict recorded for a job whose evaluation failed.
///
/// Monitoring prefers a false alarm over a silently missed stall, so any job
/// we could not evaluate is reported as stalled.
pub const FAIL_SAFE_STALLED: bool = true;

pub const DEFAULT_ALERT_USERNAME: &str = "Job Monitor";

/// Webhook fields are limited to 1024 characters; error text is cut below that.
pub const ALERT_TEXT_LIMIT: usize = 1000;
pub const ALERT_MAX_LISTED_ADDRESSES: usize = 10;

pub const JOB_CACHE_CAPACITY: NonZeroUsize = NonZeroUsize::new(10_000).expect("capacity is non-zero");
pub const BLOCK_CACHE_CAPACITY: NonZeroUsize = NonZeroUsize::new(1_000).expect("capacity is non-zero");
/// Blocks are immutable, so they may outlive job verdicts in the cache.
pub const BLOCK_CACHE_TTL_FACTOR: u32 = 2;

pub const DEFAULT_BLOCK_TIMEOUT: Duration = Duration::from_millis(5_000);
pub const DEFAULT_FALLBACK_BLOCK_TIMEOUT: Duration = Duration::from_millis(15_000);
pub const DEFAULT_FALLBACK_WINDOW: u64 = 25;
pub const DEFAULT_MAX_CONCURRENT_SCANS: NonZeroUsize = NonZeroUsize::new(10).expect("limit is non-zero");
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);
/// Upper bound of `cache_ttl_minutes` (one week).
pub const MAX_CACHE_TTL_MINUTES: u64 = 7 * 24 * 60;
/// Upper bound of `blocks_to_check`; the block cache is sized to hold a whole range.
pub const MAX_BLOCKS_TO_CHECK: u64 = 100_000;

/// Longest server-requested wait honored between two webhook attempts.
pub const MAX_RETRY_AFTER: Duration = Duration::from_secs(60 * 60);

pub mod colors {
    pub const STALLED: u32 = 0xE74C3C;
    pub const HEALTHY: u32 = 0x2ECC71;
    pub const ERROR: u32 = 0x992D22;
    pub const CONFIG: u32 = 0xE67E22;
    pub const WARNING: u32 = 0xF1C40F;
    pub const INFO: u32 = 0x3498DB;
}

/// Stalled count from which a periodic report is rendered red instead of yellow.
pub const PERIODIC_REPORT_RED_THRESHOLD: usize = 5;
