pub mod error;
pub mod rpc;

use alloy::primitives::{Address, Bytes};
use async_trait::async_trait;

pub use error::ChainError;

use crate::types::block::BlockRecord;

/// Read-only access to the chain the jobs live on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Current head of the chain.
    async fn get_block_number(&self) -> Result<u64, ChainError>;

    /// Fetches a block with its full transactions.
    ///
    /// # Errors
    ///
    /// [`ChainError::BlockNotFound`] when the node does not know the block.
    async fn get_block_with_transactions(&self, number: u64) -> Result<BlockRecord, ChainError>;

    /// Deployed bytecode at `address`, empty for externally owned accounts.
    async fn get_code(&self, address: Address) -> Result<Bytes, ChainError>;
}

/// Whether `address` holds contract code.
pub async fn is_contract(client: &dyn ChainClient, address: Address) -> Result<bool, ChainError> {
    Ok(!client.get_code(address).await?.is_empty())
}
