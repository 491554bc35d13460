use crate::llm::LlmError;
use thiserror::Error;

/// Errors from a single attempt at an outbound call.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Request timeout")]
    Timeout,

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The upstream answered, but reported no match.
    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Llm(#[from] LlmError),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout
        } else if err.is_decode() {
            UpstreamError::InvalidResponse(err.to_string())
        } else if let Some(status) = err.status() {
            UpstreamError::Status(status.as_u16())
        } else {
            UpstreamError::Connection(err.to_string())
        }
    }
}
