use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Failed to read the number of registered jobs: {0}")]
    CountFailed(String),

    #[error("Failed to read the job at index {index}: {message}")]
    IndexFailed { index: u64, message: String },
}
