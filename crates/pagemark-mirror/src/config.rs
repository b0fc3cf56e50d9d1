//! Document-database client configuration.

use serde::{Deserialize, Serialize};

use crate::error::{MirrorError, MirrorResult};

fn default_timeout_secs() -> u64 {
    30
}

fn default_lookup_chunk() -> usize {
    25
}

/// Configuration for the document-database client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Base URL of the document database API, without a trailing slash.
    pub base_url: String,

    /// Bearer token for authentication.
    pub token: String,

    /// Identifier of the database holding the mirrored pages.
    pub database_id: String,

    /// Identifiers per existence-lookup request. The database caps the
    /// number of clauses per compound filter.
    #[serde(default = "default_lookup_chunk")]
    pub lookup_chunk: usize,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl MirrorConfig {
    /// Create a configuration with default chunking and timeout.
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        database_id: impl Into<String>,
    ) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            token: token.into(),
            database_id: database_id.into(),
            lookup_chunk: default_lookup_chunk(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Override the lookup chunk size.
    #[must_use]
    pub fn with_lookup_chunk(mut self, chunk: usize) -> Self {
        self.lookup_chunk = chunk;
        self
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> MirrorResult<()> {
        if self.base_url.is_empty() {
            return Err(MirrorError::configuration("base_url must not be empty"));
        }
        if self.token.is_empty() {
            return Err(MirrorError::configuration("token must not be empty"));
        }
        if self.database_id.is_empty() {
            return Err(MirrorError::configuration("database_id must not be empty"));
        }
        if self.lookup_chunk == 0 {
            return Err(MirrorError::configuration("lookup_chunk must be positive"));
        }
        Ok(())
    }

    /// Debug representation with the token redacted.
    #[must_use]
    pub fn redacted(&self) -> String {
        format!(
            "MirrorConfig {{ base_url: {}, database_id: {}, token: *** }}",
            self.base_url, self.database_id
        )
    }
}
