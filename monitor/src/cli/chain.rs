use clap::Args;

#[derive(Debug, Clone, Args)]
pub struct ChainCliArgs {
    /// The URL of the Ethereum RPC node.
    #[arg(env = "JOB_MONITOR_RPC_URL", long)]
    pub rpc_url: Option<String>,
}
