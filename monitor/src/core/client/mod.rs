pub mod alert;
pub mod chain;
pub mod registry;

pub use alert::{AlertError, WebhookClient, WebhookResponse};
pub use chain::{ChainClient, ChainError};
pub use registry::{RegistryClient, RegistryError};
