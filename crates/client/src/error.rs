//! Error types for the backend client.

use thiserror::Error;
use wealthdesk_core::errors::{Error as CoreError, ValidationError};

/// Result type alias for backend client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Non-success response from the backend. `message` is the text found in
    /// its error payload, if the payload had one.
    #[error("API error ({status}): {}", message.as_deref().unwrap_or("no details"))]
    Api { status: u16, message: Option<String> },

    /// Invalid request (bad base URL, malformed token, etc.)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    pub fn api(status: u16, message: Option<String>) -> Self {
        Self::Api { status, message }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }
}

impl From<ClientError> for CoreError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Api { status, message } => CoreError::Upstream { status, message },
            ClientError::Http(e) => CoreError::Transport(e.to_string()),
            ClientError::Json(e) => CoreError::Transport(format!("Malformed response: {e}")),
            ClientError::InvalidRequest(reason) => {
                CoreError::Validation(ValidationError::InvalidInput(reason))
            }
        }
    }
}
