use std::num::NonZeroUsize;
use std::time::Duration;

use assert_matches::assert_matches;
use clap::Parser as _;
use rstest::rstest;

use crate::cli::RunCmd;
use crate::registry::FetchStrategy;
use crate::types::params::{AlertParams, ConfigError, MonitorParams};

const REGISTRY: &str = "0x5aBc0000000000000000000000000000000000Ef";

fn run_cmd(args: &[&str]) -> RunCmd {
    RunCmd::try_parse_from(std::iter::once("job-monitor").chain(args.iter().copied())).unwrap()
}

fn complete(extra: &[&str]) -> RunCmd {
    let mut args = vec![
        "--rpc-url",
        "https://eth.example.org/v2/secret-key",
        "--registry-address",
        REGISTRY,
        "--webhook-url",
        "https://hooks.example.org/webhooks/1/abc",
    ];
    args.extend_from_slice(extra);
    run_cmd(&args)
}

#[rstest]
fn all_missing_variables_are_reported_together() {
    let result = MonitorParams::try_from(&run_cmd(&[]));

    assert_matches!(result, Err(ConfigError::Missing(names)) if names == vec![
        "JOB_MONITOR_RPC_URL".to_string(),
        "JOB_MONITOR_REGISTRY_ADDRESS".to_string(),
        "JOB_MONITOR_WEBHOOK_URL".to_string(),
    ]);
}

#[rstest]
fn blank_values_count_as_missing() {
    let result = MonitorParams::try_from(&run_cmd(&["--rpc-url", " ", "--registry-address", REGISTRY]));

    assert_matches!(result, Err(ConfigError::Missing(names)) if names.len() == 2 && names[0] == "JOB_MONITOR_RPC_URL");
}

#[rstest]
fn defaults_apply_when_only_required_values_are_set() {
    let params = MonitorParams::try_from(&complete(&[])).unwrap();

    assert_eq!(params.service.blocks_to_check, 100);
    assert_eq!(params.service.interval, Duration::from_secs(300));
    assert!(!params.service.report_healthy);
    assert_eq!(params.registry.fetch_strategy, FetchStrategy::Batched { batch_size: NonZeroUsize::new(20).unwrap() });
    assert_eq!(params.registry.cache_ttl, Duration::from_secs(300));
    assert_eq!(params.scan.job_cache_ttl, Duration::from_secs(300));
    assert_eq!(params.scan.block_cache_ttl, Duration::from_secs(600));
    assert_eq!(params.scan.block_timeout, Duration::from_millis(5_000));
    assert_eq!(params.scan.fallback_block_timeout, Duration::from_millis(15_000));
    assert_eq!(params.scan.fallback_window, 25);
    assert_eq!(params.scan.max_concurrent_scans.get(), 10);
    assert_eq!(params.alert.max_attempts, 3);
    assert_eq!(params.alert.base_delay, Duration::from_secs(1));
    assert_eq!(params.alert.username, "Job Monitor");
    assert_eq!(params.registry.address.to_string().to_lowercase(), REGISTRY.to_lowercase());
}

#[rstest]
#[case("0x5abc")]
#[case("5aBc0000000000000000000000000000000000Ef00")]
#[case("0xZZbc0000000000000000000000000000000000Ef")]
fn malformed_registry_address_is_invalid(#[case] address: &str) {
    let cmd = run_cmd(&[
        "--rpc-url",
        "http://localhost:8545",
        "--registry-address",
        address,
        "--webhook-url",
        "https://hooks.example.org/1",
    ]);

    assert_matches!(
        MonitorParams::try_from(&cmd),
        Err(ConfigError::Invalid { name, .. }) if name == "JOB_MONITOR_REGISTRY_ADDRESS"
    );
}

#[rstest]
fn non_http_rpc_url_is_invalid() {
    let cmd = run_cmd(&[
        "--rpc-url",
        "ws://localhost:8546",
        "--registry-address",
        REGISTRY,
        "--webhook-url",
        "https://hooks.example.org/1",
    ]);

    assert_matches!(
        MonitorParams::try_from(&cmd),
        Err(ConfigError::Invalid { name, .. }) if name == "JOB_MONITOR_RPC_URL"
    );
}

#[rstest]
#[case("parallel", Some(FetchStrategy::Parallel))]
#[case("PARALLEL", Some(FetchStrategy::Parallel))]
#[case("batched", Some(FetchStrategy::Batched { batch_size: NonZeroUsize::new(20).unwrap() }))]
#[case("sequential", None)]
fn fetch_strategy_is_parsed(#[case] raw: &str, #[case] expected: Option<FetchStrategy>) {
    let result = MonitorParams::try_from(&complete(&["--registry-fetch-strategy", raw]));

    match expected {
        Some(strategy) => assert_eq!(result.unwrap().registry.fetch_strategy, strategy),
        None => assert_matches!(result, Err(ConfigError::Invalid { .. })),
    }
}

#[rstest]
#[case(&["--batch-size", "0"], "JOB_MONITOR_BATCH_SIZE")]
#[case(&["--max-concurrent-scans", "0"], "JOB_MONITOR_MAX_CONCURRENT_SCANS")]
#[case(&["--alert-max-attempts", "0"], "JOB_MONITOR_ALERT_MAX_ATTEMPTS")]
#[case(&["--interval-secs", "0"], "JOB_MONITOR_INTERVAL_SECS")]
#[case(&["--cache-ttl-minutes", "0"], "JOB_MONITOR_CACHE_TTL_MINUTES")]
fn zero_limits_are_invalid(#[case] extra: &[&str], #[case] variable: &str) {
    assert_matches!(
        MonitorParams::try_from(&complete(extra)),
        Err(ConfigError::Invalid { name, .. }) if name == variable
    );
}

#[rstest]
#[case(&["--cache-ttl-minutes", "18446744073709551615"], "JOB_MONITOR_CACHE_TTL_MINUTES")]
#[case(&["--cache-ttl-minutes", "10081"], "JOB_MONITOR_CACHE_TTL_MINUTES")]
#[case(&["--blocks-to-check", "100001"], "JOB_MONITOR_BLOCKS_TO_CHECK")]
#[case(&["--blocks-to-check", "18446744073709551615"], "JOB_MONITOR_BLOCKS_TO_CHECK")]
fn oversized_limits_are_invalid(#[case] extra: &[&str], #[case] variable: &str) {
    assert_matches!(
        MonitorParams::try_from(&complete(extra)),
        Err(ConfigError::Invalid { name, .. }) if name == variable
    );
}

#[rstest]
fn longest_cache_ttl_is_accepted() {
    let params = MonitorParams::try_from(&complete(&["--cache-ttl-minutes", "10080"])).unwrap();

    assert_eq!(params.registry.cache_ttl, Duration::from_secs(7 * 24 * 60 * 60));
    assert_eq!(params.scan.job_cache_ttl, params.registry.cache_ttl);
    assert_eq!(params.scan.block_cache_ttl, params.registry.cache_ttl * 2);
}

#[rstest]
#[case::default_range(100, 1_000)]
#[case::just_fits(999, 1_000)]
#[case::one_over(1_000, 1_001)]
#[case::largest(100_000, 100_001)]
fn block_cache_holds_a_whole_range(#[case] blocks_to_check: u64, #[case] capacity: usize) {
    let params = MonitorParams::try_from(&complete(&["--blocks-to-check", &blocks_to_check.to_string()])).unwrap();

    assert_eq!(params.scan.block_cache_capacity, NonZeroUsize::new(capacity).unwrap());
    assert_eq!(params.service.blocks_to_check, blocks_to_check);
}

#[rstest]
fn config_alert_is_possible_with_only_a_webhook() {
    let cmd = run_cmd(&["--webhook-url", "https://hooks.example.org/1"]);

    assert!(MonitorParams::try_from(&cmd).is_err());
    let alert = AlertParams::best_effort(&cmd).unwrap();
    assert_eq!(alert.webhook_url.as_str(), "https://hooks.example.org/1");
}

#[rstest]
fn config_alert_needs_a_valid_webhook() {
    assert!(AlertParams::best_effort(&run_cmd(&[])).is_none());
    assert!(AlertParams::best_effort(&run_cmd(&["--webhook-url", "not a url"])).is_none());
}

#[rstest]
fn config_error_variables_name_the_problem() {
    let invalid = ConfigError::invalid("JOB_MONITOR_RPC_URL", "relative URL without a base");
    assert_eq!(invalid.variables(), vec!["JOB_MONITOR_RPC_URL (relative URL without a base)".to_string()]);
    assert_eq!(
        ConfigError::Missing(vec!["A".to_string(), "B".to_string()]).to_string(),
        "Missing required configuration: A, B"
    );
}
