use std::num::NonZeroUsize;
use std::str::FromStr;
use std::time::Duration;

use alloy::primitives::Address;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use url::Url;

use crate::cli::RunCmd;
use crate::types::constant::MAX_CACHE_TTL_MINUTES;

pub mod alert;
pub mod chain;
pub mod registry;
pub mod scan;
pub mod service;

pub use alert::AlertParams;
pub use chain::ChainParams;
pub use registry::RegistryParams;
pub use scan::ScanParams;
pub use service::ServiceParams;

pub const ENV_RPC_URL: &str = "JOB_MONITOR_RPC_URL";
pub const ENV_REGISTRY_ADDRESS: &str = "JOB_MONITOR_REGISTRY_ADDRESS";
pub const ENV_WEBHOOK_URL: &str = "JOB_MONITOR_WEBHOOK_URL";
pub const ENV_CACHE_TTL_MINUTES: &str = "JOB_MONITOR_CACHE_TTL_MINUTES";
pub const ENV_BLOCKS_TO_CHECK: &str = "JOB_MONITOR_BLOCKS_TO_CHECK";

static ADDRESS_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^0x[0-9a-fA-F]{40}$").expect("valid address regex"));

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration: {}", .0.join(", "))]
    Missing(Vec<String>),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: String, reason: String },
}

impl ConfigError {
    pub fn invalid(name: &str, reason: impl Into<String>) -> Self {
        Self::Invalid { name: name.to_string(), reason: reason.into() }
    }

    /// Names to report in the config-error alert.
    pub fn variables(&self) -> Vec<String> {
        match self {
            ConfigError::Missing(names) => names.clone(),
            ConfigError::Invalid { name, reason } => vec![format!("{} ({})", name, reason)],
        }
    }
}

/// Every validated setting needed to run the monitor.
#[derive(Debug, Clone)]
pub struct MonitorParams {
    pub chain: ChainParams,
    pub registry: RegistryParams,
    pub scan: ScanParams,
    pub alert: AlertParams,
    pub service: ServiceParams,
}

impl TryFrom<&RunCmd> for MonitorParams {
    type Error = ConfigError;

    fn try_from(run_cmd: &RunCmd) -> Result<Self, Self::Error> {
        // All missing names are reported together before any value is parsed.
        let missing: Vec<String> = [
            (ENV_RPC_URL, &run_cmd.chain_args.rpc_url),
            (ENV_REGISTRY_ADDRESS, &run_cmd.registry_args.registry_address),
            (ENV_WEBHOOK_URL, &run_cmd.webhook_args.webhook_url),
        ]
        .into_iter()
        .filter(|(_, value)| present(value).is_none())
        .map(|(name, _)| name.to_string())
        .collect();

        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        Ok(Self {
            chain: ChainParams::try_from(run_cmd)?,
            registry: RegistryParams::try_from(run_cmd)?,
            scan: ScanParams::try_from(run_cmd)?,
            alert: AlertParams::try_from(run_cmd)?,
            service: ServiceParams::try_from(run_cmd)?,
        })
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub(crate) fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str, ConfigError> {
    present(value).ok_or_else(|| ConfigError::Missing(vec![name.to_string()]))
}

pub(crate) fn parse_http_url(value: &str, name: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value).map_err(|e| ConfigError::invalid(name, e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::invalid(name, format!("unsupported scheme {:?}", other))),
    }
}

pub(crate) fn parse_address(value: &str, name: &str) -> Result<Address, ConfigError> {
    if !ADDRESS_PATTERN.is_match(value) {
        return Err(ConfigError::invalid(name, "expected 0x followed by 40 hex characters"));
    }
    Address::from_str(value).map_err(|e| ConfigError::invalid(name, e.to_string()))
}

/// `cache_ttl_minutes` as a TTL, between one minute and [`MAX_CACHE_TTL_MINUTES`].
pub(crate) fn cache_ttl(minutes: u64) -> Result<Duration, ConfigError> {
    if minutes == 0 {
        return Err(ConfigError::invalid(ENV_CACHE_TTL_MINUTES, "must be greater than zero"));
    }
    if minutes > MAX_CACHE_TTL_MINUTES {
        return Err(ConfigError::invalid(
            ENV_CACHE_TTL_MINUTES,
            format!("must be at most {} minutes", MAX_CACHE_TTL_MINUTES),
        ));
    }
    Ok(Duration::from_secs(minutes * 60))
}

pub(crate) fn non_zero(value: usize, name: &str) -> Result<NonZeroUsize, ConfigError> {
    NonZeroUsize::new(value).ok_or_else(|| ConfigError::invalid(name, "must be greater than zero"))
}
