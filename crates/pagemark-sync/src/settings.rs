//! Sync settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{SyncError, SyncResult};

/// What to do with pages whose delete grace period has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteMode {
    /// Archive the page permanently.
    Archive,
    /// Keep flagged pages forever; never archive.
    Off,
}

impl DeleteMode {
    /// Convert to string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            DeleteMode::Archive => "archive",
            DeleteMode::Off => "off",
        }
    }
}

impl std::fmt::Display for DeleteMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DeleteMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "archive" => Ok(DeleteMode::Archive),
            "off" => Ok(DeleteMode::Off),
            _ => Err(format!("Unknown delete mode: {s}")),
        }
    }
}

/// Tuning knobs for both sync paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Bookmark collection being mirrored.
    pub collection: i64,
    /// Incremental lookback in hours.
    pub lookback_hours: i64,
    /// Overlap margin in minutes, absorbing clock skew and pagination
    /// races at the window edge.
    pub overlap_minutes: i64,
    /// Items per page for listing and search.
    pub page_size: usize,
    /// Page budget for the incremental scans.
    pub max_pages: usize,
    /// Consecutive already-mirrored items required, once past the window
    /// edge, before the recency scan stops.
    pub stop_threshold: usize,
    /// Fixed delay between mutating calls, respecting the document
    /// database's rate limits.
    pub write_delay_ms: u64,
    /// What happens after the delete grace period.
    pub delete_mode: DeleteMode,
    /// Hours a page stays flagged before it may be archived.
    pub delete_grace_hours: i64,
    /// Page budget for the full reconciliation enumeration.
    pub reconcile_max_pages: usize,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            collection: 0,
            lookback_hours: 48,
            overlap_minutes: 60,
            page_size: 50,
            max_pages: 10,
            stop_threshold: 25,
            write_delay_ms: 350,
            delete_mode: DeleteMode::Archive,
            delete_grace_hours: 24,
            reconcile_max_pages: 200,
        }
    }
}

impl SyncSettings {
    /// Pacing delay between mutating calls.
    #[must_use]
    pub fn write_delay(&self) -> Duration {
        Duration::from_millis(self.write_delay_ms)
    }

    /// Delete grace period.
    #[must_use]
    pub fn delete_grace(&self) -> chrono::Duration {
        chrono::Duration::hours(self.delete_grace_hours)
    }

    /// Check that the settings are usable.
    pub fn validate(&self) -> SyncResult<()> {
        if self.lookback_hours < 1 {
            return Err(SyncError::configuration(
                "lookback_hours must be at least 1",
            ));
        }
        if self.overlap_minutes < 0 {
            return Err(SyncError::configuration(
                "overlap_minutes must not be negative",
            ));
        }
        if self.page_size == 0 {
            return Err(SyncError::configuration("page_size must be positive"));
        }
        if self.max_pages == 0 {
            return Err(SyncError::configuration("max_pages must be positive"));
        }
        if self.stop_threshold == 0 {
            return Err(SyncError::configuration(
                "stop_threshold must be positive",
            ));
        }
        if self.delete_grace_hours < 0 {
            return Err(SyncError::configuration(
                "delete_grace_hours must not be negative",
            ));
        }
        if self.reconcile_max_pages == 0 {
            return Err(SyncError::configuration(
                "reconcile_max_pages must be positive",
            ));
        }
        Ok(())
    }
}
