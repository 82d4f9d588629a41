use alloy::primitives::{Address, U256};
use alloy::sol;
use async_trait::async_trait;

use super::{RegistryClient, RegistryError};
use crate::core::client::chain::rpc::HttpProvider;

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface IJobRegistry {
        function numJobs() external view returns (uint256);
        function jobAt(uint256 index) external view returns (address);
    }
}

/// [`RegistryClient`] reading the registry contract through `eth_call`.
pub struct RegistryContractClient {
    address: Address,
    provider: HttpProvider,
}

impl RegistryContractClient {
    pub fn new(address: Address, provider: HttpProvider) -> Self {
        Self { address, provider }
    }
}

#[async_trait]
impl RegistryClient for RegistryContractClient {
    async fn num_jobs(&self) -> Result<u64, RegistryError> {
        let registry = IJobRegistry::new(self.address, self.provider.clone());
        let count = registry.numJobs().call().await.map_err(|e| RegistryError::CountFailed(e.to_string()))?._0;
        u64::try_from(count).map_err(|_| RegistryError::CountFailed(format!("job count {} does not fit in u64", count)))
    }

    async fn job_at(&self, index: u64) -> Result<Address, RegistryError> {
        let registry = IJobRegistry::new(self.address, self.provider.clone());
        let job = registry
            .jobAt(U256::from(index))
            .call()
            .await
            .map_err(|e| RegistryError::IndexFailed { index, message: e.to_string() })?;
        Ok(job._0)
    }
}
