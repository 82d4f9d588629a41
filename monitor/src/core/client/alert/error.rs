use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlertError {
    /// 401, 403 and 404: retrying cannot help.
    #[error("Webhook rejected the alert with status {status}: {body}")]
    Fatal { status: u16, body: String },

    /// 429 and other non-2xx statuses.
    #[error("Webhook answered with status {status}: {reason}")]
    Retryable { status: u16, reason: String },

    #[error("Webhook request failed: {0}")]
    Transport(String),

    #[error("Failed to build webhook client: {0}")]
    ClientSetup(String),

    #[error("Alert delivery failed ({primary}); plain-text fallback failed too ({fallback})")]
    Terminal { primary: Box<AlertError>, fallback: Box<AlertError> },
}

impl AlertError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, AlertError::Retryable { .. } | AlertError::Transport(_))
    }

    pub fn from_reqwest_error(source: reqwest::Error) -> Self {
        let message = if source.is_timeout() {
            "request timed out".to_string()
        } else if source.is_connect() {
            format!("connection failed: {}", source)
        } else {
            source.to_string()
        };
        AlertError::Transport(message)
    }

    /// Error for a non-2xx response, classified by status.
    pub fn from_status(status: u16, body: String) -> Self {
        if is_non_retryable_status(status) {
            AlertError::Fatal { status, body }
        } else {
            AlertError::Retryable { status, reason: body }
        }
    }

    /// Label for metrics.
    pub fn error_type(&self) -> &'static str {
        match self {
            AlertError::Fatal { .. } => "fatal",
            AlertError::Retryable { .. } => "retryable",
            AlertError::Transport(_) => "transport",
            AlertError::ClientSetup(_) => "client_setup",
            AlertError::Terminal { .. } => "terminal",
        }
    }
}

pub fn is_non_retryable_status(status: u16) -> bool {
    matches!(status, 401 | 403 | 404)
}
