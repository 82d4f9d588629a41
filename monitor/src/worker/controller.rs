use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::MonitorService;

/// Fires [`MonitorService::run_once`] every `interval` until cancelled.
pub struct WorkerController {
    service: Arc<MonitorService>,
    interval: Duration,
    periodic_report_every: u64,
    cancellation_token: CancellationToken,
}

impl WorkerController {
    pub fn new(service: Arc<MonitorService>, cancellation_token: CancellationToken) -> Self {
        let interval = service.params().interval;
        let periodic_report_every = service.params().periodic_report_every;
        Self { service, interval, periodic_report_every, cancellation_token }
    }

    /// Runs until the token is cancelled and returns the number of completed runs.
    /// A run in progress is finished before the loop stops.
    pub async fn run(&self) -> u64 {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut runs = 0u64;

        info!(interval = ?self.interval, "Worker loop started");
        loop {
            tokio::select! {
                _ = self.cancellation_token.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let report = self.service.run_once().await;
            report.log();
            runs += 1;

            if self.is_report_due(runs) {
                if let Some(summary) = &report.summary {
                    if let Err(e) = self.service.send_periodic_report(summary).await {
                        warn!(error = %e, "Failed to send periodic report");
                    }
                }
            }
        }

        info!(runs, "Worker loop stopped");
        runs
    }

    pub fn is_report_due(&self, runs: u64) -> bool {
        self.periodic_report_every > 0 && runs % self.periodic_report_every == 0
    }
}
