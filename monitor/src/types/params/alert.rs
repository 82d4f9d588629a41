use std::time::Duration;

use url::Url;

use super::{parse_http_url, required, ConfigError, ENV_WEBHOOK_URL};
use crate::cli::RunCmd;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertParams {
    pub webhook_url: Url,
    pub username: String,
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub request_timeout: Duration,
}

impl AlertParams {
    /// Params good enough to report a configuration problem, when the webhook URL itself is valid.
    pub fn best_effort(run_cmd: &RunCmd) -> Option<Self> {
        let args = &run_cmd.webhook_args;
        let webhook_url = args.webhook_url.as_deref().and_then(|raw| parse_http_url(raw.trim(), ENV_WEBHOOK_URL).ok())?;
        Some(Self {
            webhook_url,
            username: args.webhook_username.clone(),
            max_attempts: args.alert_max_attempts.max(1),
            base_delay: Duration::from_millis(args.alert_base_delay_ms),
            request_timeout: Duration::from_secs(args.webhook_timeout_secs.max(1)),
        })
    }
}

impl TryFrom<&RunCmd> for AlertParams {
    type Error = ConfigError;

    fn try_from(run_cmd: &RunCmd) -> Result<Self, Self::Error> {
        let args = &run_cmd.webhook_args;
        let webhook_url = parse_http_url(required(&args.webhook_url, ENV_WEBHOOK_URL)?, ENV_WEBHOOK_URL)?;

        if args.alert_max_attempts == 0 {
            return Err(ConfigError::invalid("JOB_MONITOR_ALERT_MAX_ATTEMPTS", "at least one attempt is required"));
        }
        if args.webhook_timeout_secs == 0 {
            return Err(ConfigError::invalid("JOB_MONITOR_WEBHOOK_TIMEOUT_SECS", "must be greater than zero"));
        }

        Ok(Self {
            webhook_url,
            username: args.webhook_username.clone(),
            max_attempts: args.alert_max_attempts,
            base_delay: Duration::from_millis(args.alert_base_delay_ms),
            request_timeout: Duration::from_secs(args.webhook_timeout_secs),
        })
    }
}
