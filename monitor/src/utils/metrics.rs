use job_monitor_utils::metrics::{register_counter, register_gauge, Metrics};
use job_monitor_utils::register_metric;
use opentelemetry::global;
use opentelemetry::metrics::{Counter, Gauge};

register_metric!(MONITOR_METRICS, MonitorMetrics);

pub struct MonitorMetrics {
    pub jobs_checked: Counter<u64>,
    pub jobs_stalled: Gauge<f64>,
    pub block_fetch_failures: Counter<u64>,
    pub fallback_scans: Counter<u64>,
    pub alert_attempts: Counter<u64>,
    pub alert_failures: Counter<u64>,
}

impl Metrics for MonitorMetrics {
    fn register() -> Self {
        let meter = global::meter("crates.job-monitor.opentelemetry");

        Self {
            jobs_checked: register_counter(&meter, "jobs_checked", "Jobs evaluated across all runs", "jobs"),
            jobs_stalled: register_gauge(&meter, "jobs_stalled", "Stalled jobs found by the latest run", "jobs"),
            block_fetch_failures: register_counter(
                &meter,
                "block_fetch_failures",
                "Block fetches that failed or timed out and were skipped",
                "blocks",
            ),
            fallback_scans: register_counter(
                &meter,
                "fallback_scans",
                "Scans retried with the fallback strategy",
                "scans",
            ),
            alert_attempts: register_counter(&meter, "alert_attempts", "Webhook POSTs issued", "requests"),
            alert_failures: register_counter(&meter, "alert_failures", "Alerts that could not be delivered", "alerts"),
        }
    }
}
