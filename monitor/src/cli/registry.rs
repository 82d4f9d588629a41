use clap::Args;

#[derive(Debug, Clone, Args)]
pub struct RegistryCliArgs {
    /// Address of the job registry contract (`numJobs()` / `jobAt(uint256)`).
    #[arg(env = "JOB_MONITOR_REGISTRY_ADDRESS", long)]
    pub registry_address: Option<String>,

    /// How registry entries are fetched: `batched` or `parallel`.
    #[arg(env = "JOB_MONITOR_REGISTRY_FETCH_STRATEGY", long, default_value = "batched")]
    pub registry_fetch_strategy: String,

    /// Number of `jobAt` lookups issued together when fetching in batches.
    #[arg(env = "JOB_MONITOR_BATCH_SIZE", long, default_value_t = 20)]
    pub batch_size: usize,

    /// TTL of the registry, job status and block caches, in minutes.
    #[arg(env = "JOB_MONITOR_CACHE_TTL_MINUTES", long, default_value_t = 5)]
    pub cache_ttl_minutes: u64,
}
