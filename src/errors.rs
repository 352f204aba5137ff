use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailcastError {
    #[error("Failed to extract email content: {0}")]
    ExtractionError(String),

    #[error("Failed to reach the page: {0}")]
    BridgeError(String),

    #[error("Invalid email data: {0}")]
    ValidationError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Failed to summarize email: {0}")]
    ProviderError(String),

    #[error("Failed to synthesize speech: {0}")]
    SynthesisError(String),

    #[error("Failed to send HTTP request: {0}")]
    NetworkError(String),

    /// Error answered by the server, carrying its `{detail}` text.
    #[error("{detail}")]
    ServerError { status: u16, detail: String },
}

impl MailcastError {
    /// HTTP status used when this error crosses the API boundary.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::ValidationError(_) => 400,
            Self::ServerError { status, .. } => *status,
            _ => 500,
        }
    }
}

impl From<reqwest::Error> for MailcastError {
    fn from(error: reqwest::Error) -> Self {
        MailcastError::NetworkError(error.to_string())
    }
}

impl From<tokio::sync::oneshot::error::RecvError> for MailcastError {
    fn from(error: tokio::sync::oneshot::error::RecvError) -> Self {
        MailcastError::BridgeError(format!("Reply channel closed: {error}"))
    }
}
