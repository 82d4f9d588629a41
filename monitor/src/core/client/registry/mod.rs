pub mod contract;
pub mod error;

use alloy::primitives::Address;
use async_trait::async_trait;

pub use error::RegistryError;

/// Directory contract listing the monitored jobs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistryClient: Send + Sync {
    async fn num_jobs(&self) -> Result<u64, RegistryError>;

    /// Job stored at `index`, for `index < num_jobs()`.
    async fn job_at(&self, index: u64) -> Result<Address, RegistryError>;
}
