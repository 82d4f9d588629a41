use clap::Args;

#[derive(Debug, Clone, Args)]
pub struct ScanCliArgs {
    /// Number of blocks below the chain head inspected on every run.
    #[arg(env = "JOB_MONITOR_BLOCKS_TO_CHECK", long, default_value_t = 100)]
    pub blocks_to_check: u64,

    /// Maximum number of jobs scanned concurrently.
    #[arg(env = "JOB_MONITOR_MAX_CONCURRENT_SCANS", long, default_value_t = 10)]
    pub max_concurrent_scans: usize,

    /// Number of most recent blocks scanned when the full scan could not read any block.
    #[arg(env = "JOB_MONITOR_FALLBACK_WINDOW", long, default_value_t = 25)]
    pub fallback_window: u64,

    #[arg(env = "JOB_MONITOR_BLOCK_TIMEOUT_MS", long, default_value_t = 5_000)]
    pub block_timeout_ms: u64,

    #[arg(env = "JOB_MONITOR_FALLBACK_BLOCK_TIMEOUT_MS", long, default_value_t = 15_000)]
    pub fallback_block_timeout_ms: u64,
}
