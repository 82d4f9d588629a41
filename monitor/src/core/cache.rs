//! Bounded, TTL-expiring key/value store shared by the scanner and the registry reader.
//!
//! Every entry carries its own expiry instant and a recency tick. Reads past the expiry treat the
//! entry as absent and drop it; inserting beyond capacity evicts the entry with the oldest tick.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug)]
struct CacheEntry<V> {
    value: V,
    /// `None` when the TTL reaches past what `Instant` can represent.
    expires_at: Option<Instant>,
    tick: u64,
}

#[derive(Debug)]
struct CacheState<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    /// tick -> key, oldest access first.
    recency: BTreeMap<u64, K>,
    next_tick: u64,
}

impl<K, V> CacheState<K, V> {
    fn advance(&mut self) -> u64 {
        let tick = self.next_tick;
        self.next_tick += 1;
        tick
    }
}

#[derive(Debug)]
pub struct TtlLruCache<K, V> {
    state: Mutex<CacheState<K, V>>,
    capacity: NonZeroUsize,
    ttl: Duration,
}

impl<K, V> TtlLruCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(capacity: NonZeroUsize, ttl: Duration) -> Self {
        Self {
            state: Mutex::new(CacheState { entries: HashMap::new(), recency: BTreeMap::new(), next_tick: 0 }),
            capacity,
            ttl,
        }
    }

    /// Holders never panic while mutating, so a poisoned lock still guards consistent state.
    fn lock(&self) -> MutexGuard<'_, CacheState<K, V>> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns the value if present and not expired, marking it as most recently used.
    pub fn get(&self, key: &K) -> Option<V> {
        let now = Instant::now();
        let mut guard = self.lock();
        let state = &mut *guard;

        let entry = state.entries.get(key)?;
        let previous_tick = entry.tick;
        if entry.expires_at.is_some_and(|expires_at| now >= expires_at) {
            state.recency.remove(&previous_tick);
            state.entries.remove(key);
            return None;
        }

        let tick = state.advance();
        let entry = state.entries.get_mut(key)?;
        entry.tick = tick;
        let value = entry.value.clone();
        state.recency.remove(&previous_tick);
        state.recency.insert(tick, key.clone());
        Some(value)
    }

    /// Inserts or overwrites `key`, evicting least recently used entries beyond capacity.
    pub fn set(&self, key: K, value: V) {
        let expires_at = Instant::now().checked_add(self.ttl);
        let mut guard = self.lock();
        let state = &mut *guard;

        let tick = state.advance();
        if let Some(replaced) = state.entries.insert(key.clone(), CacheEntry { value, expires_at, tick }) {
            state.recency.remove(&replaced.tick);
        }
        state.recency.insert(tick, key);

        while state.entries.len() > self.capacity.get() {
            let Some((_, victim)) = state.recency.pop_first() else { break };
            state.entries.remove(&victim);
        }
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        let mut guard = self.lock();
        let state = &mut *guard;
        let entry = state.entries.remove(key)?;
        state.recency.remove(&entry.tick);
        Some(entry.value)
    }

    pub fn clear(&self) {
        let mut state = self.lock();
        state.entries.clear();
        state.recency.clear();
    }

    /// Stored entries, including expired ones nobody has read since they expired.
    pub fn size(&self) -> usize {
        self.lock().entries.len()
    }
}
