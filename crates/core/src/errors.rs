//! Core error types for the Wealthdesk engine.
//!
//! This module defines transport-agnostic error types. Client-specific errors
//! (from reqwest, JSON decoding, etc.) are converted to these types by the
//! client crate at the collaborator boundary.

use chrono::ParseError as ChronoParseError;
use thiserror::Error;

use crate::constants::GENERIC_RECALCULATION_ERROR;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the engine.
///
/// Only orchestration and collaborator calls produce these. The classification
/// and aggregation functions are total and never return an error.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The backend answered with a non-success status.
    /// `message` is the human-readable text extracted from its error payload, if any.
    #[error("Upstream request failed ({status}): {}", message.as_deref().unwrap_or("no details"))]
    Upstream {
        status: u16,
        message: Option<String>,
    },

    /// The backend could not be reached or its response could not be decoded.
    #[error("Upstream transport error: {0}")]
    Transport(String),

    #[error("Invalid state transition: {0}")]
    InvalidState(String),

    #[error("An IRR recalculation is already running for portfolio {0}")]
    RecalculationInProgress(i64),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// Message suitable for showing to the user after a failed recalculation.
    ///
    /// Prefers the text carried in the upstream error payload and falls back to
    /// a generic sentence when there is none.
    pub fn user_message(&self) -> String {
        match self {
            Error::Upstream {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            Error::Validation(e) => e.to_string(),
            Error::RecalculationInProgress(_) => self.to_string(),
            _ => GENERIC_RECALCULATION_ERROR.to_string(),
        }
    }
}

/// Validation errors for user input and identifiers.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid identifier for '{field}': {value:?}")]
    InvalidIdentifier { field: String, value: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Failed to parse date: {0}")]
    DateParse(#[from] ChronoParseError),
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateParse(err))
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Export(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Transport(err.to_string())
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_upstream_payload() {
        let err = Error::Upstream {
            status: 422,
            message: Some("IRR date cannot be in the future".to_string()),
        };
        assert_eq!(err.user_message(), "IRR date cannot be in the future");
    }

    #[test]
    fn test_user_message_falls_back_to_generic() {
        let err = Error::Upstream {
            status: 500,
            message: None,
        };
        assert_eq!(err.user_message(), GENERIC_RECALCULATION_ERROR);

        let blank = Error::Upstream {
            status: 500,
            message: Some("   ".to_string()),
        };
        assert_eq!(blank.user_message(), GENERIC_RECALCULATION_ERROR);

        let transport = Error::Transport("connection reset".to_string());
        assert_eq!(transport.user_message(), GENERIC_RECALCULATION_ERROR);
    }
}
