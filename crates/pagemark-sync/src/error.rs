//! Sync error types.

use thiserror::Error;

use pagemark_mirror::MirrorError;
use pagemark_source::SourceError;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur during a sync or reconciliation run.
///
/// Listing, search, and write failures abort the whole run; the next
/// scheduled invocation re-derives its decisions from mirror state, so an
/// aborted run never needs a checkpoint.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Bookmark service failure.
    #[error("Bookmark service error: {0}")]
    Source(#[from] SourceError),

    /// Document database failure.
    #[error("Document database error: {0}")]
    Mirror(#[from] MirrorError),

    /// Invalid settings.
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl SyncError {
    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}
