use std::time::Duration;

use super::ConfigError;
use crate::cli::RunCmd;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceParams {
    pub blocks_to_check: u64,
    pub report_healthy: bool,
    pub interval: Duration,
    /// 0 disables the periodic report.
    pub periodic_report_every: u64,
}

impl TryFrom<&RunCmd> for ServiceParams {
    type Error = ConfigError;

    fn try_from(run_cmd: &RunCmd) -> Result<Self, Self::Error> {
        let args = &run_cmd.service_args;
        if args.interval_secs == 0 {
            return Err(ConfigError::invalid("JOB_MONITOR_INTERVAL_SECS", "must be greater than zero"));
        }
        Ok(Self {
            blocks_to_check: run_cmd.scan_args.blocks_to_check,
            report_healthy: args.report_healthy,
            interval: Duration::from_secs(args.interval_secs),
            periodic_report_every: args.periodic_report_every,
        })
    }
}
