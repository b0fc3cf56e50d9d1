//! Application configuration loaded from environment variables.
//!
//! Fail-fast loading with validation: required variables must be present
//! and valid or the process exits with a clear error before any I/O.

use std::env;
use std::str::FromStr;

use thiserror::Error;

use pagemark_mirror::MirrorConfig;
use pagemark_source::SourceConfig;
use pagemark_sync::{DeleteMode, SyncSettings};

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("Missing required environment variable: {var}")]
    MissingVar { var: String },

    /// A variable is set but unusable.
    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Log filter directive.
    pub rust_log: String,
    /// Bookmark-service client configuration.
    pub source: SourceConfig,
    /// Document-database client configuration.
    pub mirror: MirrorConfig,
    /// Sync tuning knobs.
    pub settings: SyncSettings,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&|var| env::var(var).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let source = SourceConfig::new(
            require(lookup, "SOURCE_API_URL")?,
            require(lookup, "SOURCE_TOKEN")?,
        );
        let mirror = MirrorConfig::new(
            require(lookup, "MIRROR_API_URL")?,
            require(lookup, "MIRROR_TOKEN")?,
            require(lookup, "MIRROR_DATABASE_ID")?,
        );

        let settings = SyncSettings {
            collection: parse_required(lookup, "SOURCE_COLLECTION_ID")?,
            lookback_hours: parse_or(lookup, "LOOKBACK_HOURS", 48)?,
            overlap_minutes: parse_or(lookup, "OVERLAP_MINUTES", 60)?,
            page_size: parse_or(lookup, "PAGE_SIZE", 50)?,
            max_pages: parse_or(lookup, "MAX_PAGES", 10)?,
            stop_threshold: parse_or(lookup, "STOP_THRESHOLD", 25)?,
            write_delay_ms: parse_or(lookup, "WRITE_DELAY_MS", 350)?,
            delete_mode: parse_or(lookup, "DELETE_MODE", DeleteMode::Archive)?,
            delete_grace_hours: parse_or(lookup, "DELETE_GRACE_HOURS", 24)?,
            reconcile_max_pages: parse_or(lookup, "RECONCILE_MAX_PAGES", 200)?,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(lookup, "PORT", 8080)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            source,
            mirror,
            settings,
        })
    }
}

fn require(
    lookup: &dyn Fn(&str) -> Option<String>,
    var: &str,
) -> Result<String, ConfigError> {
    match lookup(var) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar {
            var: var.to_string(),
        }),
    }
}

fn parse_required<T>(
    lookup: &dyn Fn(&str) -> Option<String>,
    var: &str,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = require(lookup, var)?;
    raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        var: var.to_string(),
        message: e.to_string(),
    })
}

fn parse_or<T>(
    lookup: &dyn Fn(&str) -> Option<String>,
    var: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        Some(raw) if !raw.is_empty() => {
            raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
                var: var.to_string(),
                message: e.to_string(),
            })
        }
        _ => Ok(default),
    }
}
