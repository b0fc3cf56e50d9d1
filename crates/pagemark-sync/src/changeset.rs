//! Candidate collection for the incremental path.
//!
//! Two independent scans feed one deduplicating accumulator keyed by
//! bookmark id: a newest-first recency scan with an early-stop heuristic,
//! and a pair of date-filtered searches catching edits and creations the
//! recency scan's stop rule may have skipped past.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, instrument};

use pagemark_core::Bookmark;
use pagemark_mirror::MirrorStore;
use pagemark_source::{SearchQuery, Sort, SourceReader};

use crate::error::SyncResult;
use crate::settings::SyncSettings;
use crate::window::SyncWindow;

/// Why the recency scan stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// A page came back empty.
    Exhausted,
    /// A page came back shorter than requested.
    ShortPage,
    /// Scanned past the window edge with enough consecutive
    /// already-mirrored items that further pages are redundant.
    PastWindow,
    /// The caller's hard item cap was reached on the first page.
    CapReached,
    /// The page budget ran out. A normal completion, not an error.
    PageBudget,
}

impl StopReason {
    /// Convert to string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            StopReason::Exhausted => "exhausted",
            StopReason::ShortPage => "short_page",
            StopReason::PastWindow => "past_window",
            StopReason::CapReached => "cap_reached",
            StopReason::PageBudget => "page_budget",
        }
    }
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Page counts and stop reason for one collection pass.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ScanStats {
    /// Pages fetched by the recency scan.
    pub pages_scanned: usize,
    /// Pages fetched across both searches.
    pub search_pages: usize,
    /// Why the recency scan stopped.
    pub stop_reason: StopReason,
}

/// Unioned candidate set for one run.
#[derive(Debug)]
pub struct ChangeSet {
    /// Candidates, deduplicated by bookmark id. Iteration order is
    /// unspecified; cap truncation keeps an arbitrary subset.
    pub items: Vec<Bookmark>,
    /// Scan statistics.
    pub stats: ScanStats,
}

/// Builds the candidate set from bounded, paginated reads.
pub struct ChangeSetBuilder<'a> {
    reader: &'a dyn SourceReader,
    store: &'a dyn MirrorStore,
    settings: &'a SyncSettings,
}

impl<'a> ChangeSetBuilder<'a> {
    /// Create a builder.
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
        }
    }

    /// Collect candidates inside the window, optionally capped.
    #[instrument(skip(self, window))]
    pub async fn collect(&self, window: &SyncWindow, cap: Option<usize>) -> SyncResult<ChangeSet> {
        let mut candidates: HashMap<i64, Bookmark> = HashMap::new();

        let (pages_scanned, stop_reason) =
            self.recency_scan(window, cap, &mut candidates).await?;
        let search_pages = self.change_scan(window, &mut candidates).await?;

        let mut items: Vec<Bookmark> = candidates.into_values().collect();
        if let Some(cap) = cap {
            items.truncate(cap);
        }

        debug!(
            candidates = items.len(),
            pages_scanned,
            search_pages,
            stop_reason = %stop_reason,
            "Collected change set"
        );

        Ok(ChangeSet {
            items,
            stats: ScanStats {
                pages_scanned,
                search_pages,
                stop_reason,
            },
        })
    }

    /// Pass A: newest-first listing with an early-stop heuristic.
    ///
    /// The existence lookup feeds only the stop rule; acceptance into the
    /// candidate set is decided purely by the window.
    async fn recency_scan(
        &self,
        window: &SyncWindow,
        cap: Option<usize>,
        candidates: &mut HashMap<i64, Bookmark>,
    ) -> SyncResult<(usize, StopReason)> {
        let settings = self.settings;
        let mut consecutive_existing = 0usize;
        let mut pages_scanned = 0usize;

        for page in 0..settings.max_pages {
            let items = self
                .reader
                .list_recent(
                    settings.collection,
                    settings.page_size,
                    page,
                    Sort::CreatedDesc,
                )
                .await?;
            pages_scanned += 1;

            if items.is_empty() {
                return Ok((pages_scanned, StopReason::Exhausted));
            }
            let short_page = items.len() < settings.page_size;

            let ids: Vec<i64> = items.iter().map(|b| b.id).collect();
            let existing = self.store.find_by_bookmark_ids(&ids).await?;

            for item in items {
                if existing.contains_key(&item.id) {
                    consecutive_existing += 1;
                } else {
                    consecutive_existing = 0;
                }

                if window.contains(item.created) {
                    candidates.insert(item.id, item);
                } else if consecutive_existing >= settings.stop_threshold {
                    // Far enough past the window edge with no gaps seen.
                    return Ok((pages_scanned, StopReason::PastWindow));
                }
            }

            if page == 0 && cap.is_some_and(|c| candidates.len() >= c) {
                return Ok((pages_scanned, StopReason::CapReached));
            }
            if short_page {
                return Ok((pages_scanned, StopReason::ShortPage));
            }
        }

        Ok((pages_scanned, StopReason::PageBudget))
    }

    /// Pass B: date-filtered searches for recent edits and creations.
    ///
    /// Entries overwrite pass-A entries for the same id; bookmarks are
    /// immutable within a run, so the content is identical.
    async fn change_scan(
        &self,
        window: &SyncWindow,
        candidates: &mut HashMap<i64, Bookmark>,
    ) -> SyncResult<usize> {
        let settings = self.settings;
        let queries = [
            SearchQuery::updated_after(window.since_date),
            SearchQuery::created_after(window.since_date),
        ];
        let mut search_pages = 0usize;

        for query in &queries {
            for page in 0..settings.max_pages {
                let items = self
                    .reader
                    .search(
                        settings.collection,
                        query,
                        settings.page_size,
                        page,
                        Sort::CreatedDesc,
                    )
                    .await?;
                search_pages += 1;

                let count = items.len();
                for item in items {
                    candidates.insert(item.id, item);
                }

                if count < settings.page_size {
                    break;
                }
            }
        }

        Ok(search_pages)
    }
}
