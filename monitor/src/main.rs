use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser as _;
use dotenvy::dotenv;
use job_monitor::alerts::AlertDispatcher;
use job_monitor::cli::{Cli, Commands, RunCmd};
use job_monitor::core::client::alert::webhook::HttpWebhookClient;
use job_monitor::types::alert::AlertMessage;
use job_monitor::types::params::{AlertParams, ConfigError, MonitorParams};
use job_monitor::utils::logging::init_logging;
use job_monitor::utils::signal_handler::cancel_on_shutdown;
use job_monitor::worker::controller::WorkerController;
use job_monitor::worker::MonitorService;
use job_monitor::MonitorResult;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    init_logging();
    info!("Starting job monitor");
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Run { run_command } => run_monitor(run_command).await,
        Commands::Check { run_command } => check_once(run_command).await,
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!(error = %e, error_chain = ?e, "Job monitor failed to start");
            ExitCode::FAILURE
        }
    }
}

/// run_monitor - checks the jobs periodically until SIGINT/SIGTERM
async fn run_monitor(run_cmd: &RunCmd) -> MonitorResult<bool> {
    let (service, params) = build_service(run_cmd).await?;
    let token = CancellationToken::new();
    let signal_task = tokio::spawn(cancel_on_shutdown(token.clone()));

    let controller = WorkerController::new(Arc::new(service), token.clone());
    let runs = controller.run().await;

    token.cancel();
    if let Err(e) = signal_task.await {
        warn!(error = %e, "Signal handler task failed");
    }
    info!(runs, registry = %params.registry.address, "Job monitor shutting down");
    Ok(true)
}

/// check_once - a single run; success means the check itself completed
async fn check_once(run_cmd: &RunCmd) -> MonitorResult<bool> {
    let (service, _) = build_service(run_cmd).await?;
    let report = service.run_once().await;
    report.log();
    Ok(report.success)
}

async fn build_service(run_cmd: &RunCmd) -> MonitorResult<(MonitorService, MonitorParams)> {
    let params = match MonitorParams::try_from(run_cmd) {
        Ok(params) => params,
        Err(e) => {
            notify_config_error(run_cmd, &e).await;
            return Err(e.into());
        }
    };

    let service = MonitorService::from_params(&params)?;
    service.check_registry(params.registry.address).await;
    Ok((service, params))
}

/// Best effort: the webhook URL itself may be what is missing.
async fn notify_config_error(run_cmd: &RunCmd, config_error: &ConfigError) {
    let Some(alert_params) = AlertParams::best_effort(run_cmd) else {
        warn!("No usable webhook URL, configuration error is only logged");
        return;
    };
    let client = match HttpWebhookClient::from_params(&alert_params) {
        Ok(client) => client,
        Err(e) => {
            warn!(error = %e, "Could not build webhook client for the configuration alert");
            return;
        }
    };

    let dispatcher = AlertDispatcher::new(Arc::new(client), &alert_params);
    let message = AlertMessage::ConfigError { missing: config_error.variables() };
    if let Err(e) = dispatcher.send_with_retry(&message).await {
        warn!(error = %e, "Failed to deliver configuration alert");
    }
}
