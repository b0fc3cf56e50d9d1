//! Delete-tracking state machine for mirrored pages.
//!
//! A page is `Present` until a reconciliation run observes the bookmark
//! missing from the source; it then carries `DeletionDetected` with the
//! observation timestamp until either the bookmark reappears (back to
//! `Present`) or the grace period elapses and the page is archived.
//! `Archived` is terminal.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Delete-tracking state of a mirrored page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DeleteState {
    /// The bookmark was present in the source on the last reconciliation.
    Present,
    /// The bookmark was missing from the source, first observed at `at`.
    DeletionDetected {
        /// When absence was first observed.
        at: DateTime<Utc>,
    },
    /// The page has been archived. Terminal.
    Archived,
}

impl DeleteState {
    /// Whether the page currently carries a deletion flag.
    #[must_use]
    pub fn is_flagged(&self) -> bool {
        matches!(self, DeleteState::DeletionDetected { .. })
    }

    /// When absence was first observed, if flagged.
    #[must_use]
    pub fn detected_at(&self) -> Option<DateTime<Utc>> {
        match self {
            DeleteState::DeletionDetected { at } => Some(*at),
            _ => None,
        }
    }

    /// Whether the grace period has elapsed since detection.
    ///
    /// Always false for unflagged states.
    #[must_use]
    pub fn grace_elapsed(&self, now: DateTime<Utc>, grace: Duration) -> bool {
        match self {
            DeleteState::DeletionDetected { at } => now - *at >= grace,
            _ => false,
        }
    }
}
