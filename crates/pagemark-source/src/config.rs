//! Bookmark-service client configuration.

use serde::{Deserialize, Serialize};

use crate::error::{SourceError, SourceResult};

fn default_timeout_secs() -> u64 {
    30
}

/// Configuration for the bookmark-service client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Base URL of the bookmark service API, without a trailing slash.
    pub base_url: String,

    /// Bearer token for authentication.
    pub token: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl SourceConfig {
    /// Create a configuration with the default timeout.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            token: token.into(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Override the request timeout.
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> SourceResult<()> {
        if self.base_url.is_empty() {
            return Err(SourceError::configuration("base_url must not be empty"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(SourceError::configuration(
                "base_url must start with http:// or https://",
            ));
        }
        if self.token.is_empty() {
            return Err(SourceError::configuration("token must not be empty"));
        }
        Ok(())
    }

    /// Debug representation with the token redacted.
    #[must_use]
    pub fn redacted(&self) -> String {
        format!("SourceConfig {{ base_url: {}, token: *** }}", self.base_url)
    }
}
