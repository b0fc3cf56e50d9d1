//! Structured run summaries.

use serde::Serialize;

use crate::changeset::StopReason;

/// Write decided for a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertAction {
    /// No page existed for the bookmark id.
    Create,
    /// A page existed and the bookmark was strictly newer.
    Update,
}

/// One planned (dry-run) or performed write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlannedWrite {
    /// Bookmark the write targets.
    pub bookmark_id: i64,
    /// What kind of write.
    pub action: UpsertAction,
}

/// Summary of one incremental sync run.
#[derive(Debug, Clone, Serialize)]
pub struct SyncSummary {
    /// Whether writes were suppressed.
    pub dry_run: bool,
    /// Pages fetched by the recency scan.
    pub pages_scanned: usize,
    /// Pages fetched across both change searches.
    pub search_pages: usize,
    /// Why the recency scan stopped.
    pub stop_reason: StopReason,
    /// Candidates after union and cap.
    pub candidates: usize,
    /// Pages created.
    pub created: usize,
    /// Pages updated.
    pub updated: usize,
    /// Candidates already up to date.
    pub skipped_fresh: usize,
    /// Candidates whose page is locked.
    pub skipped_locked: usize,
    /// The writes this run decided on. In dry-run mode these were not
    /// performed.
    pub writes: Vec<PlannedWrite>,
}

/// Summary of one reconciliation run.
#[derive(Debug, Clone, Serialize)]
pub struct ReconcileSummary {
    /// Whether writes were suppressed.
    pub dry_run: bool,
    /// Distinct bookmark ids enumerated from the source.
    pub source_ids: usize,
    /// Live mirrored pages examined.
    pub pages_examined: usize,
    /// Pages whose bookmark is present and unflagged.
    pub present: usize,
    /// Pages whose bookmark moved to another collection.
    pub moved: usize,
    /// Pages newly flagged as deletion detected.
    pub delete_detected: usize,
    /// Flagged pages still inside the grace period.
    pub grace_pending: usize,
    /// Pages archived this run.
    pub archived: usize,
    /// Pages whose delete flags were cleared after reappearance.
    pub cleared: usize,
    /// Pages left untouched because they are locked, or because the
    /// delete mode is off.
    pub skipped_locked: usize,
}
