use thiserror::Error;

/// Errors that can occur when talking to a go-links service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport error (connection refused, timeout, truncated body)
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with `ok: false`
    #[error("{0}")]
    Service(String),

    /// The response could not be decoded
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The configured endpoint is not a usable base URL
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

impl ApiError {
    /// Whether the service itself reported the failure.
    pub fn is_service(&self) -> bool {
        matches!(self, ApiError::Service(_))
    }
}

impl From<url::ParseError> for ApiError {
    fn from(e: url::ParseError) -> Self {
        ApiError::InvalidEndpoint(e.to_string())
    }
}

/// Result type alias for go-links API operations
pub type Result<T> = std::result::Result<T, ApiError>;
