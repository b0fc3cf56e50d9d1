//! Lookback window for the incremental path.

use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Time window an incremental run considers.
///
/// Pure function of its inputs. The window deliberately overlaps the
/// previous run's so an item landing just outside one window is still
/// caught by the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncWindow {
    /// Inclusive lower bound.
    pub since: DateTime<Utc>,
    /// Date-only truncation of `since`, for search queries that accept
    /// only date granularity.
    pub since_date: NaiveDate,
}

impl SyncWindow {
    /// Compute the window ending at `now`.
    #[must_use]
    pub fn compute(now: DateTime<Utc>, lookback_hours: i64, overlap_minutes: i64) -> Self {
        let since = now - Duration::minutes(lookback_hours * 60 + overlap_minutes);
        Self {
            since,
            since_date: since.date_naive(),
        }
    }

    /// Whether a timestamp falls inside the window.
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.since
    }
}
