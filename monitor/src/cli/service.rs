use clap::Args;

#[derive(Debug, Clone, Args)]
pub struct ServiceCliArgs {
    /// Also notify the webhook when every job is healthy.
    #[arg(env = "JOB_MONITOR_REPORT_HEALTHY", long, default_value_t = false)]
    pub report_healthy: bool,

    /// Seconds between two runs of the `run` command.
    #[arg(env = "JOB_MONITOR_INTERVAL_SECS", long, default_value_t = 300)]
    pub interval_secs: u64,

    /// Send a health report every N runs of the `run` command (0 disables it).
    #[arg(env = "JOB_MONITOR_PERIODIC_REPORT_EVERY", long, default_value_t = 0)]
    pub periodic_report_every: u64,
}
