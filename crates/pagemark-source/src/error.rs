//! Bookmark-service error types.

use thiserror::Error;

/// Result type for bookmark-service operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// Errors that can occur talking to the bookmark service.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Invalid client configuration.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Transport-level failure (connect, timeout, body decode).
    #[error("Bookmark service transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success response from the service.
    #[error("Bookmark service error ({status}): {message}")]
    Api { status: u16, message: String },
}

impl SourceError {
    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an API error from a status code and response body.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Status code of an API error, if this is one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
