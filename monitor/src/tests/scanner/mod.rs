use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use chrono::Utc;
use rstest::rstest;

use crate::core::client::chain::MockChainClient;
use crate::scanner::{ScanError, StalenessScanner};
use crate::tests::common::{block, job, scan_params, unrelated_tx, work_tx, FakeChain};
use crate::types::params::ScanParams;

fn scanner(chain: Arc<FakeChain>, params: &ScanParams) -> StalenessScanner {
    StalenessScanner::new(chain, params)
}

#[rstest]
#[tokio::test]
async fn evaluate_returns_the_block_with_the_work_call() {
    let target = job(1);
    let chain = Arc::new(
        FakeChain::new(12)
            .with_block(block(12, vec![unrelated_tx(job(9))]))
            .with_block(block(11, vec![work_tx(target)])),
    );
    let scanner = scanner(chain.clone(), &scan_params());

    assert_eq!(scanner.evaluate(target, 10, 12).await.unwrap(), Some(11));

    let cached = scanner.cached_status(&target).unwrap();
    assert!(!cached.is_stalled());
    assert_eq!(cached.last_worked_block(), Some(11));
    assert_eq!(chain.fetches(), vec![12, 11]);
}

#[rstest]
#[tokio::test]
async fn evaluate_stops_at_the_highest_matching_block() {
    let target = job(1);
    let chain = Arc::new(
        FakeChain::new(20).with_block(block(20, vec![work_tx(target)])).with_block(block(15, vec![work_tx(target)])),
    );
    let scanner = scanner(chain.clone(), &scan_params());

    assert_eq!(scanner.evaluate(target, 10, 20).await.unwrap(), Some(20));
    assert_eq!(chain.fetches(), vec![20]);
}

#[rstest]
#[tokio::test]
async fn evaluate_without_work_call_is_stalled() {
    let target = job(1);
    let chain = Arc::new(FakeChain::new(12).with_block(block(11, vec![unrelated_tx(target)])));
    let scanner = scanner(chain.clone(), &scan_params());

    assert_eq!(scanner.evaluate(target, 10, 12).await.unwrap(), None);

    let cached = scanner.cached_status(&target).unwrap();
    assert!(cached.is_stalled());
    assert_eq!(cached.last_worked_block(), None);
    assert_eq!(chain.fetches(), vec![12, 11, 10]);
}

#[rstest]
#[tokio::test]
async fn only_calls_to_the_job_with_the_work_selector_match() {
    let target = job(1);
    let chain = Arc::new(
        FakeChain::new(12)
            // Right selector, wrong recipient.
            .with_block(block(12, vec![work_tx(job(2))]))
            // Right recipient, wrong selector.
            .with_block(block(11, vec![unrelated_tx(target)])),
    );
    let scanner = scanner(chain, &scan_params());

    assert_eq!(scanner.evaluate(target, 11, 12).await.unwrap(), None);
}

#[rstest]
#[case::worked(Some(11))]
#[case::stalled(None)]
#[tokio::test]
async fn repeated_evaluation_is_served_from_cache(#[case] worked_at: Option<u64>) {
    let target = job(1);
    let mut chain = FakeChain::new(12);
    if let Some(number) = worked_at {
        chain = chain.with_block(block(number, vec![work_tx(target)]));
    }
    let chain = Arc::new(chain);
    let scanner = scanner(chain.clone(), &scan_params());

    let first = scanner.evaluate(target, 10, 12).await.unwrap();
    let reads_after_first = chain.fetches().len();
    let second = scanner.evaluate(target, 10, 12).await.unwrap();

    assert_eq!(first, worked_at);
    assert_eq!(first, second);
    assert_eq!(chain.fetches().len(), reads_after_first);
}

#[rstest]
#[tokio::test]
async fn cached_blocks_are_shared_between_jobs() {
    let chain = Arc::new(FakeChain::new(12));
    let scanner = scanner(chain.clone(), &scan_params());

    scanner.evaluate(job(1), 10, 12).await.unwrap();
    scanner.evaluate(job(2), 10, 12).await.unwrap();

    assert_eq!(chain.fetches(), vec![12, 11, 10]);
    assert_eq!(scanner.cache_sizes(), (3, 2));
}

#[rstest]
#[case::default_capacity(999)]
#[case::range_larger_than_default_capacity(1_000)]
#[case::much_larger_range(2_500)]
#[tokio::test]
async fn whole_range_stays_cached_across_jobs(#[case] blocks_to_check: u64) {
    let head = 5_000;
    let from = head - blocks_to_check;
    let chain = Arc::new(FakeChain::new(head));
    let params = ScanParams {
        block_cache_capacity: ScanParams::block_cache_capacity_for(blocks_to_check),
        ..scan_params()
    };
    let scanner = scanner(chain.clone(), &params);

    scanner.evaluate(job(1), from, head).await.unwrap();
    let first_scan = chain.fetches().len() as u64;
    scanner.evaluate(job(2), from, head).await.unwrap();
    // Stalled verdicts are re-scanned, from cached blocks only.
    scanner.evaluate(job(1), from, head).await.unwrap();

    assert_eq!(first_scan, blocks_to_check + 1);
    assert_eq!(chain.fetches().len() as u64, first_scan);
}

#[rstest]
#[tokio::test]
async fn invalid_range_is_rejected_before_any_read() {
    let chain = Arc::new(FakeChain::new(12));
    let scanner = scanner(chain.clone(), &scan_params());

    assert_matches!(scanner.evaluate(job(1), 12, 10).await, Err(ScanError::InvalidRange { from: 12, to: 10 }));
    assert_matches!(
        scanner.evaluate_many(&[job(1), job(2)], 12, 10).await,
        Err(ScanError::InvalidRange { from: 12, to: 10 })
    );
    assert!(chain.fetches().is_empty());
    assert_eq!(scanner.cache_sizes(), (0, 0));
}

#[rstest]
#[tokio::test]
async fn invalid_range_makes_no_chain_call() {
    // No expectations: any call on the mock fails the test.
    let chain = MockChainClient::new();
    let scanner = StalenessScanner::new(Arc::new(chain), &scan_params());

    assert_matches!(scanner.evaluate(job(1), 5, 4).await, Err(ScanError::InvalidRange { .. }));
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn timed_out_block_is_skipped() {
    let target = job(1);
    let chain = Arc::new(
        FakeChain::new(12).slow(12, Duration::from_secs(60)).with_block(block(11, vec![work_tx(target)])),
    );
    let scanner = scanner(chain.clone(), &scan_params());

    assert_eq!(scanner.evaluate(target, 10, 12).await.unwrap(), Some(11));
    assert_eq!(chain.fetches(), vec![12, 11]);
}

#[rstest]
#[tokio::test]
async fn failed_block_is_skipped() {
    let target = job(1);
    let chain =
        Arc::new(FakeChain::new(12).always_failing([12]).with_block(block(11, vec![work_tx(target)])));
    let scanner = scanner(chain.clone(), &scan_params());

    assert_eq!(scanner.evaluate(target, 10, 12).await.unwrap(), Some(11));
}

#[rstest]
#[tokio::test]
async fn fallback_scans_the_top_window_when_no_block_could_be_read() {
    let target = job(1);
    // Every block fails on its first read, so the primary pass over 0..=99 examines nothing.
    let chain = Arc::new(FakeChain::new(99).failing_once(0..=99).with_block(block(80, vec![work_tx(target)])));
    let scanner = scanner(chain.clone(), &scan_params());

    assert_eq!(scanner.evaluate(target, 0, 99).await.unwrap(), Some(80));

    let fetches = chain.fetches();
    assert_eq!(fetches.len(), 100 + 20);
    assert_eq!(fetches[100..], (80..=99).rev().collect::<Vec<_>>()[..]);
}

#[rstest]
#[tokio::test]
async fn fallback_failure_is_stalled_not_an_error() {
    let target = job(1);
    let params = ScanParams { fallback_window: 10, ..scan_params() };
    let chain = Arc::new(FakeChain::new(99).always_failing(0..=99));
    let scanner = scanner(chain.clone(), &params);

    assert_eq!(scanner.evaluate(target, 0, 99).await.unwrap(), None);

    let fetches = chain.fetches();
    assert_eq!(fetches.len(), 100 + 10);
    assert!(fetches[100..].iter().all(|n| *n >= 90));
    assert!(scanner.cached_status(&target).unwrap().is_stalled());
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn fallback_uses_the_longer_block_timeout() {
    let target = job(1);
    let params = ScanParams {
        block_timeout: Duration::from_secs(5),
        fallback_block_timeout: Duration::from_secs(15),
        fallback_window: 1,
        ..scan_params()
    };
    // 10s is too slow for the primary pass but fits the fallback timeout.
    let chain = Arc::new(FakeChain::new(3).slow(3, Duration::from_secs(10)).with_block(block(3, vec![work_tx(target)])));
    let scanner = scanner(chain.clone(), &params);

    assert_eq!(scanner.evaluate(target, 3, 3).await.unwrap(), Some(3));
    assert_eq!(chain.fetches(), vec![3, 3]);
}

#[rstest]
#[case::sequential(1)]
#[case::bounded(3)]
#[case::unbounded(64)]
#[tokio::test]
async fn evaluate_many_preserves_input_order(#[case] max_concurrent_scans: usize) {
    let addresses: Vec<_> = (1..=8).map(job).collect();
    let mut chain = FakeChain::new(50);
    for (i, address) in addresses.iter().enumerate().filter(|(i, _)| i % 2 == 0) {
        chain = chain.with_block(block(50 - i as u64, vec![work_tx(*address)]));
    }
    let params = ScanParams { max_concurrent_scans: NonZeroUsize::new(max_concurrent_scans).unwrap(), ..scan_params() };
    let scanner = scanner(Arc::new(chain), &params);

    let statuses = scanner.evaluate_many(&addresses, 40, 50).await.unwrap();

    assert_eq!(statuses.len(), addresses.len());
    for (i, (status, address)) in statuses.iter().zip(&addresses).enumerate() {
        assert_eq!(status.address(), *address);
        if i % 2 == 0 {
            assert_eq!(status.last_worked_block(), Some(50 - i as u64));
        } else {
            assert!(status.is_stalled());
        }
    }
}

#[rstest]
#[tokio::test]
async fn evaluate_many_of_nothing_is_empty() {
    let chain = Arc::new(FakeChain::new(50));
    let scanner = scanner(chain.clone(), &scan_params());

    assert!(scanner.evaluate_many(&[], 40, 50).await.unwrap().is_empty());
    assert!(chain.fetches().is_empty());
}

#[rstest]
#[tokio::test]
async fn jobs_without_work_calls_are_all_stalled() {
    let addresses = [job(0xa), job(0xb), job(0xc)];
    let scanner = scanner(Arc::new(FakeChain::new(12)), &scan_params());

    let statuses = scanner.evaluate_many(&addresses, 10, 12).await.unwrap();

    assert_eq!(statuses.len(), 3);
    for status in statuses {
        assert!(status.is_stalled());
        assert_eq!(status.last_worked_block(), None);
        assert!(Utc::now() - status.last_checked() < chrono::Duration::seconds(60));
    }
}

#[rstest]
#[tokio::test]
async fn clear_caches_empties_both_caches() {
    let target = job(1);
    let chain = Arc::new(FakeChain::new(12).with_block(block(12, vec![work_tx(target)])));
    let scanner = scanner(chain.clone(), &scan_params());
    scanner.evaluate(target, 10, 12).await.unwrap();
    assert_eq!(scanner.cache_sizes(), (1, 1));

    scanner.clear_caches();

    assert_eq!(scanner.cache_sizes(), (0, 0));
    scanner.evaluate(target, 10, 12).await.unwrap();
    assert_eq!(chain.fetches(), vec![12, 12]);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn expired_verdict_triggers_a_new_scan() {
    let target = job(1);
    let params = scan_params();
    let chain = Arc::new(FakeChain::new(12).with_block(block(12, vec![work_tx(target)])));
    let scanner = scanner(chain.clone(), &params);

    scanner.evaluate(target, 10, 12).await.unwrap();
    tokio::time::advance(params.block_cache_ttl).await;
    scanner.evaluate(target, 10, 12).await.unwrap();

    assert_eq!(chain.fetches(), vec![12, 12]);
}
