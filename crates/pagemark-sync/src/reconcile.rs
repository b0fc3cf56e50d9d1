//! Nightly full-population reconciliation.
//!
//! Computes the set difference between every source bookmark id and every
//! live mirrored page, then classifies each mirror-only page as moved or
//! deleted. Deletions walk a grace-period state machine before anything
//! is archived, so a transient disappearance never destroys a page.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};

use pagemark_core::{BookmarkDetail, DeleteState, MirrorPage};
use pagemark_mirror::MirrorStore;
use pagemark_source::{Sort, SourceReader, TitleCache};

use crate::error::SyncResult;
use crate::settings::{DeleteMode, SyncSettings};
use crate::summary::ReconcileSummary;

/// Full-population reconciliation engine.
pub struct ReconcileEngine<'a> {
    reader: &'a dyn SourceReader,
    store: &'a dyn MirrorStore,
    settings: &'a SyncSettings,
    dry_run: bool,
}

impl<'a> ReconcileEngine<'a> {
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

    /// Enable or disable dry-run mode. Classifications are computed
    /// identically; only writes are suppressed.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Run one reconciliation pass.
    #[instrument(skip(self), fields(dry_run = self.dry_run))]
    pub async fn run(&self, now: DateTime<Utc>) -> SyncResult<ReconcileSummary> {
        let source_ids = self.enumerate_source_ids().await?;
        let pages = self.store.list_all().await?;

        let mut summary = ReconcileSummary {
            dry_run: self.dry_run,
            source_ids: source_ids.len(),
            pages_examined: pages.len(),
            present: 0,
            moved: 0,
            delete_detected: 0,
            grace_pending: 0,
            archived: 0,
            cleared: 0,
            skipped_locked: 0,
        };

        let mut cache = TitleCache::new();
        let mut writes_done = 0usize;

        for page in pages {
            if source_ids.contains(&page.bookmark_id) {
                self.reconcile_present(&page, &mut summary, &mut writes_done)
                    .await?;
            } else {
                self.reconcile_absent(&page, now, &mut cache, &mut summary, &mut writes_done)
                    .await?;
            }
        }

        info!(
            source_ids = summary.source_ids,
            pages = summary.pages_examined,
            moved = summary.moved,
            delete_detected = summary.delete_detected,
            archived = summary.archived,
            cleared = summary.cleared,
            skipped_locked = summary.skipped_locked,
            dry_run = self.dry_run,
            "Reconciliation complete"
        );
        Ok(summary)
    }

    /// Every bookmark id currently in the source collection.
    async fn enumerate_source_ids(&self) -> SyncResult<HashSet<i64>> {
        let settings = self.settings;
        let mut ids = HashSet::new();

        for page in 0..settings.reconcile_max_pages {
            let items = self
                .reader
                .list_recent(
                    settings.collection,
                    settings.page_size,
                    page,
                    Sort::CreatedDesc,
                )
                .await?;
            let count = items.len();
            ids.extend(items.into_iter().map(|b| b.id));

            if count < settings.page_size {
                break;
            }
        }

        debug!(ids = ids.len(), "Enumerated source bookmark ids");
        Ok(ids)
    }

    /// The bookmark is still in the collection: clear a stale delete flag
    /// if one is set.
    async fn reconcile_present(
        &self,
        page: &MirrorPage,
        summary: &mut ReconcileSummary,
        writes_done: &mut usize,
    ) -> SyncResult<()> {
        if !page.delete_state.is_flagged() {
            summary.present += 1;
            return Ok(());
        }

        if page.locked {
            summary.skipped_locked += 1;
            return Ok(());
        }

        debug!(bookmark_id = page.bookmark_id, "Bookmark reappeared, clearing flags");
        if !self.dry_run {
            self.pace(writes_done).await;
            self.store.clear_delete_flags(&page.page_id).await?;
        }
        summary.cleared += 1;
        Ok(())
    }

    /// The bookmark is missing from the collection's enumeration: tell a
    /// move apart from a removal, then advance the delete state machine.
    async fn reconcile_absent(
        &self,
        page: &MirrorPage,
        now: DateTime<Utc>,
        cache: &mut TitleCache,
        summary: &mut ReconcileSummary,
        writes_done: &mut usize,
    ) -> SyncResult<()> {
        let detail = self.detail_with_retry(page.bookmark_id).await;

        if !detail.is_gone() {
            // Moved to a different collection.
            if page.locked {
                summary.skipped_locked += 1;
                return Ok(());
            }

            let title = match detail.collection_id {
                Some(id) => cache.resolve(self.reader, id).await,
                None => None,
            };
            debug!(
                bookmark_id = page.bookmark_id,
                collection = ?detail.collection_id,
                "Bookmark moved collections"
            );
            if !self.dry_run {
                self.pace(writes_done).await;
                self.store
                    .update_collection(&page.page_id, title.as_deref(), now)
                    .await?;
                if page.delete_state.is_flagged() {
                    self.store.clear_delete_flags(&page.page_id).await?;
                }
            }
            summary.moved += 1;
            return Ok(());
        }

        match page.delete_state {
            DeleteState::Present => {
                if page.locked {
                    summary.skipped_locked += 1;
                    return Ok(());
                }
                debug!(bookmark_id = page.bookmark_id, "Deletion detected");
                if !self.dry_run {
                    self.pace(writes_done).await;
                    self.store
                        .mark_delete_detected(&page.page_id, now, true, now)
                        .await?;
                }
                summary.delete_detected += 1;
            }
            DeleteState::DeletionDetected { .. }
                if !page
                    .delete_state
                    .grace_elapsed(now, self.settings.delete_grace()) =>
            {
                summary.grace_pending += 1;
            }
            DeleteState::DeletionDetected { .. } => {
                if page.locked || self.settings.delete_mode == DeleteMode::Off {
                    summary.skipped_locked += 1;
                    return Ok(());
                }
                debug!(bookmark_id = page.bookmark_id, "Grace elapsed, archiving");
                if !self.dry_run {
                    self.pace(writes_done).await;
                    self.store.archive_page(&page.page_id).await?;
                }
                summary.archived += 1;
            }
            // Archived pages are not in the live set; nothing to do.
            DeleteState::Archived => {}
        }
        Ok(())
    }

    /// Targeted detail check with one retry.
    ///
    /// A second failure is treated as "does not exist" so a flaky check
    /// cannot block the delete pipeline; the grace period bounds the cost
    /// of a false positive.
    async fn detail_with_retry(&self, id: i64) -> BookmarkDetail {
        for attempt in 0..2u8 {
            match self.reader.bookmark_detail(id).await {
                Ok(detail) => return detail,
                Err(e) => {
                    warn!(bookmark_id = id, attempt, error = %e, "Detail check failed");
                }
            }
        }
        BookmarkDetail::missing()
    }

    /// Fixed delay between mutating calls. Never applied in dry-run.
    async fn pace(&self, writes_done: &mut usize) {
        if *writes_done > 0 {
            tokio::time::sleep(self.settings.write_delay()).await;
        }
        *writes_done += 1;
    }
}
