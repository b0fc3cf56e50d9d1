//! Create/update/skip decisions for the incremental path.

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

use pagemark_core::Bookmark;
use pagemark_mirror::MirrorStore;
use pagemark_source::{SourceReader, TitleCache};

use crate::error::SyncResult;
use crate::settings::SyncSettings;
use crate::summary::{PlannedWrite, UpsertAction};

/// Counts and writes from one upsert pass.
#[derive(Debug, Default)]
pub struct UpsertReport {
    pub created: usize,
    pub updated: usize,
    pub skipped_fresh: usize,
    pub skipped_locked: usize,
    pub writes: Vec<PlannedWrite>,
}

/// Decides create / update / skip for each candidate.
///
/// Decisions are idempotent against mirror state: re-running on the same
/// data yields the same result. Two overlapping runs may still race each
/// other into duplicate creates for a brand-new id; scheduling keeps runs
/// apart rather than this engine excluding them.
pub struct UpsertEngine<'a> {
    reader: &'a dyn SourceReader,
    store: &'a dyn MirrorStore,
    settings: &'a SyncSettings,
    dry_run: bool,
}

impl<'a> UpsertEngine<'a> {
    /// Create an engine.
    #[must_use]
    pub fn new(
        reader: &'a dyn SourceReader,
        store: &'a dyn MirrorStore,
        settings: &'a SyncSettings,
    ) -> Self {
        Self {
            reader,
            store,
            settings,
            dry_run: false,
        }
    }

    /// Enable or disable dry-run mode.
    ///
    /// Dry-run visits every candidate exactly like a real run, so the
    /// preview and the eventual real run agree on classification; only
    /// the writes themselves are suppressed.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Process the candidate set.
    #[instrument(skip(self, candidates), fields(candidates = candidates.len(), dry_run = self.dry_run))]
    pub async fn run(
        &self,
        candidates: Vec<Bookmark>,
        now: DateTime<Utc>,
    ) -> SyncResult<UpsertReport> {
        let mut report = UpsertReport::default();
        let mut cache = TitleCache::new();
        let default_title = cache.resolve(self.reader, self.settings.collection).await;

        let ids: Vec<i64> = candidates.iter().map(|b| b.id).collect();
        let found = self.store.find_by_bookmark_ids(&ids).await?;

        let mut writes_done = 0usize;
        for bookmark in candidates {
            let title = match bookmark.collection_id() {
                Some(id) => cache
                    .resolve(self.reader, id)
                    .await
                    .or_else(|| default_title.clone()),
                None => default_title.clone(),
            };

            match found.get(&bookmark.id) {
                None => {
                    if !self.dry_run {
                        self.pace(&mut writes_done).await;
                        self.store
                            .create_page(&bookmark, title.as_deref(), now)
                            .await?;
                    }
                    debug!(bookmark_id = bookmark.id, "Creating page");
                    report.created += 1;
                    report.writes.push(PlannedWrite {
                        bookmark_id: bookmark.id,
                        action: UpsertAction::Create,
                    });
                }
                Some(page) if page.locked => {
                    debug!(bookmark_id = bookmark.id, "Page locked, skipping");
                    report.skipped_locked += 1;
                }
                Some(page) if page.is_stale_against(bookmark.effective_modified()) => {
                    if !self.dry_run {
                        self.pace(&mut writes_done).await;
                        self.store
                            .update_page(&page.page_id, &bookmark, title.as_deref(), now)
                            .await?;
                    }
                    debug!(bookmark_id = bookmark.id, "Updating page");
                    report.updated += 1;
                    report.writes.push(PlannedWrite {
                        bookmark_id: bookmark.id,
                        action: UpsertAction::Update,
                    });
                }
                Some(_) => {
                    report.skipped_fresh += 1;
                }
            }
        }

        info!(
            created = report.created,
            updated = report.updated,
            skipped_fresh = report.skipped_fresh,
            skipped_locked = report.skipped_locked,
            dry_run = self.dry_run,
            "Upsert pass complete"
        );
        Ok(report)
    }

    /// Fixed delay between mutating calls. Not applied before the first
    /// write, and never in dry-run.
    async fn pace(&self, writes_done: &mut usize) {
        if *writes_done > 0 {
            tokio::time::sleep(self.settings.write_delay()).await;
        }
        *writes_done += 1;
    }
}
