//! Document-database error types.

use thiserror::Error;

/// Result type for document-database operations.
pub type MirrorResult<T> = Result<T, MirrorError>;

/// Errors that can occur talking to the document database.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// Invalid client configuration.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Transport-level failure (connect, timeout, body decode).
    #[error("Document database transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success response from the database.
    #[error("Document database error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response body missing an expected field.
    #[error("Malformed document database response: {message}")]
    Malformed { message: String },
}

impl MirrorError {
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

    /// Create a malformed-response error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }
}
