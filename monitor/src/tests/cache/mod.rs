use std::num::NonZeroUsize;
use std::time::Duration;

use rstest::rstest;

use crate::core::cache::TtlLruCache;

const TTL: Duration = Duration::from_secs(60);

fn cache(capacity: usize) -> TtlLruCache<&'static str, u64> {
    TtlLruCache::new(NonZeroUsize::new(capacity).unwrap(), TTL)
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn set_then_get_returns_latest_value() {
    let cache = cache(4);
    assert_eq!(cache.get(&"a"), None);

    cache.set("a", 1);
    cache.set("a", 2);

    assert_eq!(cache.get(&"a"), Some(2));
    assert_eq!(cache.size(), 1);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn expired_entry_is_a_miss_even_when_most_recently_used() {
    let cache = cache(4);
    cache.set("a", 1);
    cache.set("b", 2);
    assert_eq!(cache.get(&"a"), Some(1));

    tokio::time::advance(TTL).await;

    assert_eq!(cache.get(&"a"), None);
    // The expired read dropped the entry; `b` is still stored until touched.
    assert_eq!(cache.size(), 1);
    assert_eq!(cache.get(&"b"), None);
    assert_eq!(cache.size(), 0);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn entry_is_fresh_until_its_ttl_elapses() {
    let cache = cache(4);
    cache.set("a", 1);

    tokio::time::advance(TTL - Duration::from_millis(1)).await;
    assert_eq!(cache.get(&"a"), Some(1));

    tokio::time::advance(Duration::from_millis(1)).await;
    assert_eq!(cache.get(&"a"), None);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn overwrite_restarts_the_ttl() {
    let cache = cache(4);
    cache.set("a", 1);
    tokio::time::advance(Duration::from_secs(40)).await;
    cache.set("a", 2);
    tokio::time::advance(Duration::from_secs(40)).await;

    assert_eq!(cache.get(&"a"), Some(2));
}

#[rstest]
fn inserting_past_capacity_evicts_least_recently_accessed() {
    let cache = cache(2);
    cache.set("a", 1);
    cache.set("b", 2);
    // `a` becomes the most recently used, leaving `b` as the victim.
    assert_eq!(cache.get(&"a"), Some(1));

    cache.set("c", 3);

    assert_eq!(cache.size(), 2);
    assert_eq!(cache.get(&"b"), None);
    assert_eq!(cache.get(&"a"), Some(1));
    assert_eq!(cache.get(&"c"), Some(3));
}

#[rstest]
fn overwriting_does_not_evict() {
    let cache = cache(2);
    cache.set("a", 1);
    cache.set("b", 2);
    cache.set("a", 10);

    assert_eq!(cache.size(), 2);
    assert_eq!(cache.get(&"b"), Some(2));
    assert_eq!(cache.get(&"a"), Some(10));
}

#[rstest]
fn clear_empties_the_cache() {
    let cache = cache(8);
    for (i, key) in ["a", "b", "c"].into_iter().enumerate() {
        cache.set(key, i as u64);
    }

    cache.clear();

    assert_eq!(cache.size(), 0);
    assert_eq!(cache.get(&"a"), None);
}

#[rstest]
fn remove_drops_a_single_key() {
    let cache = cache(8);
    cache.set("a", 1);
    cache.set("b", 2);

    assert_eq!(cache.remove(&"a"), Some(1));
    assert_eq!(cache.remove(&"a"), None);
    assert_eq!(cache.size(), 1);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn unrepresentable_ttl_never_expires() {
    let cache = TtlLruCache::new(NonZeroUsize::new(2).unwrap(), Duration::MAX);

    cache.set("a", 1);
    tokio::time::advance(Duration::from_secs(365 * 24 * 60 * 60)).await;

    assert_eq!(cache.get(&"a"), Some(1));
}
