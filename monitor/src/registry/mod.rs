//! Enumerates the monitored jobs from the registry contract.

use std::num::NonZeroUsize;
use std::sync::Arc;

use alloy::primitives::Address;
use futures::future::join_all;
use tracing::{debug, info, instrument, warn};

use crate::core::cache::TtlLruCache;
use crate::core::client::{RegistryClient, RegistryError};
use crate::types::params::RegistryParams;

const ALL_JOBS_KEY: &str = "all_jobs";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStrategy {
    /// Sequential batches; lookups inside a batch run concurrently.
    Batched { batch_size: NonZeroUsize },
    /// Every lookup at once.
    Parallel,
}

pub struct RegistryReader {
    client: Arc<dyn RegistryClient>,
    strategy: FetchStrategy,
    cache: TtlLruCache<&'static str, Arc<Vec<Address>>>,
}

impl RegistryReader {
    pub fn new(client: Arc<dyn RegistryClient>, params: &RegistryParams) -> Self {
        Self { client, strategy: params.fetch_strategy, cache: TtlLruCache::new(NonZeroUsize::MIN, params.cache_ttl) }
    }

    pub async fn count(&self) -> Result<u64, RegistryError> {
        self.client.num_jobs().await
    }

    pub async fn job_at(&self, index: u64) -> Result<Address, RegistryError> {
        self.client.job_at(index).await
    }

    /// All registered jobs in ascending index order.
    ///
    /// Entries whose lookup fails are left out; only a failing `count` fails the call.
    /// A complete list is cached for the configured TTL.
    #[instrument(skip(self))]
    pub async fn get_all_jobs(&self) -> Result<Vec<Address>, RegistryError> {
        if let Some(jobs) = self.cache.get(&ALL_JOBS_KEY) {
            debug!(count = jobs.len(), "Using cached job list");
            return Ok(jobs.as_ref().clone());
        }

        let count = self.count().await?;
        let jobs = match self.strategy {
            FetchStrategy::Batched { batch_size } => self.fetch_batched(count, batch_size.get()).await,
            FetchStrategy::Parallel => self.fetch_all(0..count).await,
        };

        if (jobs.len() as u64) < count {
            warn!(count, fetched = jobs.len(), "Some registry entries could not be read, not caching the job list");
        } else {
            info!(count, "Loaded jobs from registry");
            self.cache.set(ALL_JOBS_KEY, Arc::new(jobs.clone()));
        }
        Ok(jobs)
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    async fn fetch_batched(&self, count: u64, batch_size: usize) -> Vec<Address> {
        let indices: Vec<u64> = (0..count).collect();
        let mut jobs = Vec::with_capacity(indices.len());
        for batch in indices.chunks(batch_size) {
            jobs.extend(self.fetch_all(batch.iter().copied()).await);
        }
        jobs
    }

    /// Looks up `indices` concurrently, keeping their order and dropping failures.
    async fn fetch_all(&self, indices: impl Iterator<Item = u64>) -> Vec<Address> {
        join_all(indices.map(|index| self.lookup(index))).await.into_iter().flatten().collect()
    }

    async fn lookup(&self, index: u64) -> Option<Address> {
        match self.client.job_at(index).await {
            Ok(address) => Some(address),
            Err(e) => {
                warn!(index, error = %e, "Dropping registry entry after lookup failure");
                None
            }
        }
    }
}
