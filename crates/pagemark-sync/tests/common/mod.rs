//! In-memory fakes for exercising the sync engines.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use pagemark_core::{Bookmark, BookmarkDetail, CollectionRef, DeleteState, MirrorPage};
use pagemark_mirror::{MirrorResult, MirrorStore};
use pagemark_source::{SearchField, SearchQuery, Sort, SourceError, SourceReader, SourceResult};
use pagemark_sync::SyncSettings;

/// Collection used by most scenarios.
pub const COLLECTION: i64 = 7;

pub fn test_settings() -> SyncSettings {
    SyncSettings {
        collection: COLLECTION,
        write_delay_ms: 0,
        ..Default::default()
    }
}

pub fn bookmark(
    id: i64,
    collection: i64,
    created: DateTime<Utc>,
    last_update: Option<DateTime<Utc>>,
) -> Bookmark {
    Bookmark {
        id,
        title: format!("Bookmark {id}"),
        url: format!("https://example.com/{id}"),
        excerpt: String::new(),
        note: String::new(),
        tags: vec![],
        created,
        last_update,
        domain: Some("example.com".into()),
        collection: Some(CollectionRef {
            id: collection,
            title: None,
        }),
    }
}

pub fn page(
    page_id: &str,
    bookmark_id: i64,
    locked: bool,
    delete_state: DeleteState,
    last_edited: Option<DateTime<Utc>>,
) -> MirrorPage {
    MirrorPage {
        page_id: page_id.into(),
        bookmark_id,
        locked,
        delete_state,
        last_edited,
        last_synced_at: None,
    }
}

/// In-memory bookmark service.
#[derive(Default)]
pub struct FakeSource {
    pub bookmarks: Vec<Bookmark>,
    pub titles: HashMap<i64, String>,
    /// Ids the detail endpoint reports as removed (trashed). Removed
    /// bookmarks never appear in listings or search.
    pub removed: HashSet<i64>,
    /// Remaining detail-call failures per id.
    detail_failures: Mutex<HashMap<i64, usize>>,
}

impl FakeSource {
    pub fn with_bookmarks(bookmarks: Vec<Bookmark>) -> Self {
        Self {
            bookmarks,
            ..Default::default()
        }
    }

    pub fn title(mut self, collection: i64, title: &str) -> Self {
        self.titles.insert(collection, title.into());
        self
    }

    pub fn removed(mut self, id: i64) -> Self {
        self.removed.insert(id);
        self
    }

    pub fn failing_detail(self, id: i64, failures: usize) -> Self {
        self.detail_failures.lock().unwrap().insert(id, failures);
        self
    }

    fn visible_in(&self, collection: i64) -> Vec<Bookmark> {
        self.bookmarks
            .iter()
            .filter(|b| b.collection_id() == Some(collection) && !self.removed.contains(&b.id))
            .cloned()
            .collect()
    }

    fn sorted(mut items: Vec<Bookmark>, sort: Sort) -> Vec<Bookmark> {
        match sort {
            Sort::CreatedDesc => items.sort_by(|a, b| b.created.cmp(&a.created)),
            Sort::CreatedAsc => items.sort_by(|a, b| a.created.cmp(&b.created)),
        }
        items
    }

    fn paged(items: Vec<Bookmark>, page_size: usize, page: usize) -> Vec<Bookmark> {
        items
            .into_iter()
            .skip(page * page_size)
            .take(page_size)
            .collect()
    }
}

#[async_trait]
impl SourceReader for FakeSource {
    async fn list_recent(
        &self,
        collection: i64,
        page_size: usize,
        page: usize,
        sort: Sort,
    ) -> SourceResult<Vec<Bookmark>> {
        let items = Self::sorted(self.visible_in(collection), sort);
        Ok(Self::paged(items, page_size, page))
    }

    async fn search(
        &self,
        collection: i64,
        query: &SearchQuery,
        page_size: usize,
        page: usize,
        sort: Sort,
    ) -> SourceResult<Vec<Bookmark>> {
        let items: Vec<Bookmark> = self
            .visible_in(collection)
            .into_iter()
            .filter(|b| match query.field {
                SearchField::Created => b.created.date_naive() > query.after,
                SearchField::LastUpdate => b
                    .last_update
                    .map(|t| t.date_naive() > query.after)
                    .unwrap_or(false),
            })
            .collect();
        Ok(Self::paged(Self::sorted(items, sort), page_size, page))
    }

    async fn collection_title(&self, collection: i64) -> SourceResult<Option<String>> {
        Ok(self.titles.get(&collection).cloned())
    }

    async fn bookmark_detail(&self, id: i64) -> SourceResult<BookmarkDetail> {
        {
            let mut failures = self.detail_failures.lock().unwrap();
            if let Some(remaining) = failures.get_mut(&id) {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Err(SourceError::api(500, "flaky detail endpoint"));
                }
            }
        }

        Ok(match self.bookmarks.iter().find(|b| b.id == id) {
            Some(b) => BookmarkDetail {
                exists: true,
                removed: self.removed.contains(&id),
                collection_id: b.collection_id(),
                last_update: b.last_update,
            },
            None => BookmarkDetail::missing(),
        })
    }
}

/// Mutation performed against the fake document database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Create { bookmark_id: i64 },
    Update { page_id: String },
    UpdateCollection { page_id: String, title: Option<String> },
    MarkDeleteDetected { page_id: String, archive_pending: bool },
    ClearFlags { page_id: String },
    Archive { page_id: String },
}

/// In-memory document database recording every mutation.
#[derive(Default)]
pub struct FakeMirror {
    pages: Mutex<Vec<MirrorPage>>,
    next_id: AtomicUsize,
    ops: Mutex<Vec<Op>>,
}

impl FakeMirror {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pages(pages: Vec<MirrorPage>) -> Self {
        Self {
            pages: Mutex::new(pages),
            ..Default::default()
        }
    }

    pub fn pages(&self) -> Vec<MirrorPage> {
        self.pages.lock().unwrap().clone()
    }

    pub fn page_for(&self, bookmark_id: i64) -> Option<MirrorPage> {
        self.pages()
            .into_iter()
            .find(|p| p.bookmark_id == bookmark_id)
    }

    pub fn ops(&self) -> Vec<Op> {
        self.ops.lock().unwrap().clone()
    }

    fn record(&self, op: Op) {
        self.ops.lock().unwrap().push(op);
    }

    fn mutate<F: FnOnce(&mut MirrorPage)>(&self, page_id: &str, f: F) -> MirrorResult<()> {
        let mut pages = self.pages.lock().unwrap();
        if let Some(page) = pages.iter_mut().find(|p| p.page_id == page_id) {
            f(page);
        }
        Ok(())
    }
}

#[async_trait]
impl MirrorStore for FakeMirror {
    async fn find_by_bookmark_ids(&self, ids: &[i64]) -> MirrorResult<HashMap<i64, MirrorPage>> {
        let pages = self.pages.lock().unwrap();
        Ok(pages
            .iter()
            .filter(|p| p.delete_state != DeleteState::Archived && ids.contains(&p.bookmark_id))
            .map(|p| (p.bookmark_id, p.clone()))
            .collect())
    }

    async fn create_page(
        &self,
        bookmark: &Bookmark,
        _collection_title: Option<&str>,
        now: DateTime<Utc>,
    ) -> MirrorResult<String> {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let page_id = format!("p{n}");
        self.pages.lock().unwrap().push(MirrorPage {
            page_id: page_id.clone(),
            bookmark_id: bookmark.id,
            locked: false,
            delete_state: DeleteState::Present,
            last_edited: Some(bookmark.effective_modified()),
            last_synced_at: Some(now),
        });
        self.record(Op::Create {
            bookmark_id: bookmark.id,
        });
        Ok(page_id)
    }

    async fn update_page(
        &self,
        page_id: &str,
        bookmark: &Bookmark,
        _collection_title: Option<&str>,
        now: DateTime<Utc>,
    ) -> MirrorResult<()> {
        self.record(Op::Update {
            page_id: page_id.into(),
        });
        self.mutate(page_id, |p| {
            p.last_edited = Some(bookmark.effective_modified());
            p.last_synced_at = Some(now);
        })
    }

    async fn update_collection(
        &self,
        page_id: &str,
        collection_title: Option<&str>,
        now: DateTime<Utc>,
    ) -> MirrorResult<()> {
        self.record(Op::UpdateCollection {
            page_id: page_id.into(),
            title: collection_title.map(str::to_string),
        });
        self.mutate(page_id, |p| p.last_synced_at = Some(now))
    }

    async fn mark_delete_detected(
        &self,
        page_id: &str,
        detected_at: DateTime<Utc>,
        set_archive_pending: bool,
        now: DateTime<Utc>,
    ) -> MirrorResult<()> {
        self.record(Op::MarkDeleteDetected {
            page_id: page_id.into(),
            archive_pending: set_archive_pending,
        });
        self.mutate(page_id, |p| {
            p.delete_state = DeleteState::DeletionDetected { at: detected_at };
            p.last_synced_at = Some(now);
        })
    }

    async fn clear_delete_flags(&self, page_id: &str) -> MirrorResult<()> {
        self.record(Op::ClearFlags {
            page_id: page_id.into(),
        });
        self.mutate(page_id, |p| p.delete_state = DeleteState::Present)
    }

    async fn archive_page(&self, page_id: &str) -> MirrorResult<()> {
        self.record(Op::Archive {
            page_id: page_id.into(),
        });
        self.mutate(page_id, |p| p.delete_state = DeleteState::Archived)
    }

    async fn list_all(&self) -> MirrorResult<Vec<MirrorPage>> {
        let pages = self.pages.lock().unwrap();
        Ok(pages
            .iter()
            .filter(|p| p.delete_state != DeleteState::Archived)
            .cloned()
            .collect())
    }
}
