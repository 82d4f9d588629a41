use url::Url;

use super::{parse_http_url, required, ConfigError, ENV_RPC_URL};
use crate::cli::RunCmd;

#[derive(Debug, Clone)]
pub struct ChainParams {
    pub rpc_url: Url,
}

impl TryFrom<&RunCmd> for ChainParams {
    type Error = ConfigError;

    fn try_from(run_cmd: &RunCmd) -> Result<Self, Self::Error> {
        let raw = required(&run_cmd.chain_args.rpc_url, ENV_RPC_URL)?;
        Ok(Self { rpc_url: parse_http_url(raw, ENV_RPC_URL)? })
    }
}
