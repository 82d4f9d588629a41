use clap::Args;

#[derive(Debug, Clone, Args)]
pub struct WebhookCliArgs {
    /// Webhook receiving the alerts.
    #[arg(env = "JOB_MONITOR_WEBHOOK_URL", long)]
    pub webhook_url: Option<String>,

    /// Display name used for the webhook messages.
    #[arg(env = "JOB_MONITOR_WEBHOOK_USERNAME", long, default_value = "Job Monitor")]
    pub webhook_username: String,

    #[arg(env = "JOB_MONITOR_ALERT_MAX_ATTEMPTS", long, default_value_t = 3)]
    pub alert_max_attempts: u32,

    /// Linear backoff unit: attempt `n` waits `n * base delay`.
    #[arg(env = "JOB_MONITOR_ALERT_BASE_DELAY_MS", long, default_value_t = 1_000)]
    pub alert_base_delay_ms: u64,

    /// Timeout of a single webhook request.
    #[arg(env = "JOB_MONITOR_WEBHOOK_TIMEOUT_SECS", long, default_value_t = 10)]
    pub webhook_timeout_secs: u64,
}
