use thiserror::Error;

use crate::core::client::{AlertError, ChainError, RegistryError};
use crate::scanner::ScanError;
use crate::types::params::ConfigError;

pub type MonitorResult<T> = Result<T, MonitorError>;

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Chain read error: {0}")]
    ChainRead(#[from] ChainError),

    #[error("Registry read error: {0}")]
    RegistryRead(#[from] RegistryError),

    #[error("Alert delivery error: {0}")]
    Delivery(#[from] AlertError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
}
