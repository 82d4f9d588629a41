//! One monitoring run: read the head, list the jobs, scan them, alert.

pub mod controller;

use std::sync::Arc;

use alloy::primitives::Address;
use tokio::time::Instant;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::alerts::AlertDispatcher;
use crate::core::client::alert::webhook::HttpWebhookClient;
use crate::core::client::chain::is_contract;
use crate::core::client::chain::rpc::RpcChainClient;
use crate::core::client::registry::contract::RegistryContractClient;
use crate::core::client::{AlertError, ChainClient};
use crate::error::{MonitorError, MonitorResult};
use crate::registry::RegistryReader;
use crate::scanner::StalenessScanner;
use crate::types::alert::AlertMessage;
use crate::types::block::BlockRange;
use crate::types::params::{MonitorParams, ServiceParams};
use crate::types::report::{AlertOutcome, RunReport, RunSummary};
use crate::utils::helpers::redact_endpoint;
use crate::utils::metrics::MONITOR_METRICS;

pub struct MonitorService {
    chain: Arc<dyn ChainClient>,
    scanner: StalenessScanner,
    registry: RegistryReader,
    dispatcher: AlertDispatcher,
    params: ServiceParams,
    /// RPC endpoint as shown in rpc-error alerts.
    endpoint: String,
}

impl MonitorService {
    pub fn new(
        chain: Arc<dyn ChainClient>,
        scanner: StalenessScanner,
        registry: RegistryReader,
        dispatcher: AlertDispatcher,
        params: ServiceParams,
        endpoint: String,
    ) -> Self {
        Self { chain, scanner, registry, dispatcher, params, endpoint }
    }

    /// Builds the RPC, registry and webhook clients. One provider is shared by chain and registry reads.
    pub fn from_params(params: &MonitorParams) -> MonitorResult<Self> {
        let rpc = RpcChainClient::new(params.chain.rpc_url.clone());
        let registry_client = RegistryContractClient::new(params.registry.address, rpc.provider());
        let webhook = HttpWebhookClient::from_params(&params.alert)?;

        let chain: Arc<dyn ChainClient> = Arc::new(rpc);
        Ok(Self::new(
            Arc::clone(&chain),
            StalenessScanner::new(Arc::clone(&chain), &params.scan),
            RegistryReader::new(Arc::new(registry_client), &params.registry),
            AlertDispatcher::new(Arc::new(webhook), &params.alert),
            params.service.clone(),
            redact_endpoint(&params.chain.rpc_url),
        ))
    }

    /// Warns when the registry address holds no code. Never fails startup.
    pub async fn check_registry(&self, registry: Address) {
        match is_contract(self.chain.as_ref(), registry).await {
            Ok(true) => info!(%registry, "Registry contract found"),
            Ok(false) => warn!(%registry, "No contract code at the registry address, every run will fail"),
            Err(e) => warn!(%registry, error = %e, "Could not verify the registry address"),
        }
    }

    /// Head, job list and per-job verdicts, without alerting.
    pub async fn check_jobs(&self) -> MonitorResult<RunSummary> {
        let current_block = self.chain.get_block_number().await?;
        let range = BlockRange::ending_at(current_block, self.params.blocks_to_check);
        let jobs = self.registry.get_all_jobs().await?;
        info!(jobs = jobs.len(), %range, "Checking jobs");

        let statuses = self.scanner.evaluate_many(&jobs, range.from(), range.to()).await?;
        let summary = RunSummary::from_statuses(&statuses, current_block, range);
        MONITOR_METRICS.jobs_stalled.record(summary.stalled_jobs as f64, &[]);
        Ok(summary)
    }

    /// Runs one check and sends the matching alert. Never fails: the outcome is in the report.
    #[instrument(skip(self), fields(request_id = tracing::field::Empty))]
    pub async fn run_once(&self) -> RunReport {
        let request_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("request_id", request_id.as_str());
        let started = Instant::now();

        match self.check_jobs().await {
            Ok(summary) => {
                info!(total = summary.total_jobs, stalled = summary.stalled_jobs, "Check completed");
                let outcome = match self.alert_for(&summary) {
                    Some(message) => self.deliver(&message).await,
                    None => AlertOutcome::not_sent(),
                };
                RunReport::succeeded(request_id, summary, outcome, started.elapsed())
            }
            Err(e) => {
                error!(error = %e, "Check failed");
                let outcome = self.deliver(&self.failure_alert(&e, &request_id)).await;
                // The report keeps the check error even when the alert failed as well.
                RunReport::failed(request_id, e.to_string(), outcome, started.elapsed())
            }
        }
    }

    pub async fn send_periodic_report(&self, summary: &RunSummary) -> Result<(), AlertError> {
        let message = AlertMessage::PeriodicReport {
            total_jobs: summary.total_jobs,
            stalled_jobs: summary.stalled_jobs,
            range: summary.checked_block_range,
        };
        self.dispatcher.send_with_retry(&message).await
    }

    pub fn params(&self) -> &ServiceParams {
        &self.params
    }

    fn alert_for(&self, summary: &RunSummary) -> Option<AlertMessage> {
        if summary.has_stalled_jobs() {
            Some(AlertMessage::Stalled {
                stalled: summary.stalled_addresses.clone(),
                total_jobs: summary.total_jobs,
                range: summary.checked_block_range,
            })
        } else if self.params.report_healthy {
            Some(AlertMessage::Healthy { total_jobs: summary.total_jobs, range: summary.checked_block_range })
        } else {
            None
        }
    }

    fn failure_alert(&self, error: &MonitorError, request_id: &str) -> AlertMessage {
        match error {
            MonitorError::ChainRead(e) => AlertMessage::RpcError { endpoint: self.endpoint.clone(), error: e.to_string() },
            other => AlertMessage::SystemError {
                error: other.to_string(),
                stack: Some(format!("{:?}", other)),
                request_id: request_id.to_string(),
            },
        }
    }

    async fn deliver(&self, message: &AlertMessage) -> AlertOutcome {
        match self.dispatcher.send_with_retry(message).await {
            Ok(()) => AlertOutcome::delivered(),
            Err(e) => {
                error!(kind = %message.kind(), error = %e, "Failed to deliver alert");
                AlertOutcome::failed(e)
            }
        }
    }
}
