use alloy::consensus::Transaction;
use alloy::network::TransactionResponse;
use alloy::primitives::{Address, Bytes};
use alloy::providers::{Provider, ProviderBuilder, RootProvider};
use alloy::rpc::types::{Block, BlockNumberOrTag, BlockTransactionsKind};
use alloy::transports::http::{Client, Http};
use async_trait::async_trait;
use url::Url;

use super::{ChainClient, ChainError};
use crate::types::block::{BlockRecord, TransactionRef};

pub type HttpProvider = RootProvider<Http<Client>>;

/// [`ChainClient`] over a JSON-RPC HTTP endpoint.
#[derive(Clone)]
pub struct RpcChainClient {
    provider: HttpProvider,
}

impl RpcChainClient {
    pub fn new(rpc_url: Url) -> Self {
        Self { provider: ProviderBuilder::new().on_http(rpc_url) }
    }

    /// The underlying provider, shared with the registry contract binding.
    pub fn provider(&self) -> HttpProvider {
        self.provider.clone()
    }
}

#[async_trait]
impl ChainClient for RpcChainClient {
    async fn get_block_number(&self) -> Result<u64, ChainError> {
        self.provider.get_block_number().await.map_err(|e| ChainError::rpc("eth_blockNumber", e))
    }

    async fn get_block_with_transactions(&self, number: u64) -> Result<BlockRecord, ChainError> {
        let block = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Number(number), BlockTransactionsKind::Full)
            .await
            .map_err(|e| ChainError::rpc("eth_getBlockByNumber", e))?
            .ok_or(ChainError::BlockNotFound(number))?;
        Ok(block_record(block))
    }

    async fn get_code(&self, address: Address) -> Result<Bytes, ChainError> {
        self.provider.get_code_at(address).await.map_err(|e| ChainError::rpc("eth_getCode", e))
    }
}

fn block_record(block: Block) -> BlockRecord {
    let transactions = block
        .transactions
        .into_transactions()
        .map(|tx| TransactionRef {
            to: Transaction::to(&tx),
            data: Transaction::input(&tx).clone(),
            hash: TransactionResponse::tx_hash(&tx),
        })
        .collect();

    BlockRecord {
        number: block.header.number,
        hash: block.header.hash,
        timestamp: block.header.timestamp,
        transactions,
    }
}
