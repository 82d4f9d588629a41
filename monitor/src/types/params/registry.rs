use std::time::Duration;

use alloy::primitives::Address;

use super::{cache_ttl, non_zero, parse_address, required, ConfigError, ENV_REGISTRY_ADDRESS};
use crate::cli::RunCmd;
use crate::registry::FetchStrategy;

#[derive(Debug, Clone)]
pub struct RegistryParams {
    pub address: Address,
    pub fetch_strategy: FetchStrategy,
    pub cache_ttl: Duration,
}

impl TryFrom<&RunCmd> for RegistryParams {
    type Error = ConfigError;

    fn try_from(run_cmd: &RunCmd) -> Result<Self, Self::Error> {
        let args = &run_cmd.registry_args;
        let address = parse_address(required(&args.registry_address, ENV_REGISTRY_ADDRESS)?, ENV_REGISTRY_ADDRESS)?;

        let fetch_strategy = match args.registry_fetch_strategy.trim().to_ascii_lowercase().as_str() {
            "batched" => FetchStrategy::Batched { batch_size: non_zero(args.batch_size, "JOB_MONITOR_BATCH_SIZE")? },
            "parallel" => FetchStrategy::Parallel,
            other => {
                return Err(ConfigError::invalid(
                    "JOB_MONITOR_REGISTRY_FETCH_STRATEGY",
                    format!("expected `batched` or `parallel`, got {:?}", other),
                ))
            }
        };

        Ok(Self { address, fetch_strategy, cache_ttl: cache_ttl(args.cache_ttl_minutes)? })
    }
}
