//! Top-level run orchestration.

use chrono::{DateTime, Utc};
use tracing::instrument;

use pagemark_mirror::MirrorStore;
use pagemark_source::SourceReader;

use crate::changeset::ChangeSetBuilder;
use crate::error::SyncResult;
use crate::reconcile::ReconcileEngine;
use crate::settings::SyncSettings;
use crate::summary::{ReconcileSummary, SyncSummary};
use crate::upsert::UpsertEngine;
use crate::window::SyncWindow;

/// Caller options for an incremental run.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Suppress writes, reporting what would have happened.
    pub dry_run: bool,
    /// Hard candidate cap. A manual-testing aid, not for normal
    /// operation; which candidates survive truncation is unspecified.
    pub max_items: Option<usize>,
}

/// One incremental sync pass: collect candidates, then upsert them.
#[instrument(skip(reader, store, settings))]
pub async fn run_incremental(
    reader: &dyn SourceReader,
    store: &dyn MirrorStore,
    settings: &SyncSettings,
    options: SyncOptions,
    now: DateTime<Utc>,
) -> SyncResult<SyncSummary> {
    settings.validate()?;

    let window = SyncWindow::compute(now, settings.lookback_hours, settings.overlap_minutes);
    let changeset = ChangeSetBuilder::new(reader, store, settings)
        .collect(&window, options.max_items)
        .await?;

    let candidates = changeset.items.len();
    let report = UpsertEngine::new(reader, store, settings)
        .with_dry_run(options.dry_run)
        .run(changeset.items, now)
        .await?;

    Ok(SyncSummary {
        dry_run: options.dry_run,
        pages_scanned: changeset.stats.pages_scanned,
        search_pages: changeset.stats.search_pages,
        stop_reason: changeset.stats.stop_reason,
        candidates,
        created: report.created,
        updated: report.updated,
        skipped_fresh: report.skipped_fresh,
        skipped_locked: report.skipped_locked,
        writes: report.writes,
    })
}

/// One full reconciliation pass.
#[instrument(skip(reader, store, settings))]
pub async fn run_reconciliation(
    reader: &dyn SourceReader,
    store: &dyn MirrorStore,
    settings: &SyncSettings,
    dry_run: bool,
    now: DateTime<Utc>,
) -> SyncResult<ReconcileSummary> {
    settings.validate()?;

    ReconcileEngine::new(reader, store, settings)
        .with_dry_run(dry_run)
        .run(now)
        .await
}
