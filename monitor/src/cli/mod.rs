use clap::{Parser, Subcommand};

pub mod alert;
pub mod chain;
pub mod registry;
pub mod scan;
pub mod service;

#[derive(Parser, Debug)]
#[command(
    name = "job-monitor",
    about = "Job Monitor - detects stalled keeper jobs and alerts a webhook",
    long_about = "Job Monitor reads the job registry, scans recent blocks for work() calls to every \
    registered job and alerts the configured webhook when a job has not been worked.\n\n\
    Every option can also be provided through its JOB_MONITOR_* environment variable or a .env file.",
    after_help = "Examples:\n  \
    job-monitor check --rpc-url http://localhost:8545 --registry-address 0x... --webhook-url https://...\n  \
    job-monitor run --interval-secs 600"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check all jobs every `--interval-secs` until interrupted
    Run {
        #[command(flatten)]
        run_command: Box<RunCmd>,
    },
    /// Check all jobs once and exit; the exit code reflects the outcome
    Check {
        #[command(flatten)]
        run_command: Box<RunCmd>,
    },
}

#[derive(Parser, Debug, Clone)]
pub struct RunCmd {
    #[clap(flatten)]
    pub chain_args: chain::ChainCliArgs,

    #[clap(flatten)]
    pub registry_args: registry::RegistryCliArgs,

    #[clap(flatten)]
    pub scan_args: scan::ScanCliArgs,

    #[clap(flatten)]
    pub webhook_args: alert::WebhookCliArgs,

    #[clap(flatten)]
    pub service_args: service::ServiceCliArgs,
}
