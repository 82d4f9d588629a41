use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("RPC call {method} failed: {message}")]
    Rpc { method: &'static str, message: String },

    #[error("RPC call {method} timed out after {timeout:?}")]
    Timeout { method: &'static str, timeout: Duration },

    #[error("Block {0} not found")]
    BlockNotFound(u64),
}

impl ChainError {
    pub fn rpc(method: &'static str, error: impl std::fmt::Display) -> Self {
        Self::Rpc { method, message: error.to_string() }
    }
}
