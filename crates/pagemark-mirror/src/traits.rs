//! Write seam over the document database.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use pagemark_core::{Bookmark, MirrorPage};

use crate::error::MirrorResult;

/// Batched lookup, create, update, and archive operations on the mirror
/// database, keyed by the bookmark service's stable identifier.
///
/// Implemented by [`crate::MirrorClient`]; the sync engines depend on this
/// trait so they can be exercised against in-memory fakes. `now` is passed
/// explicitly so engines stay deterministic under test.
#[async_trait]
pub trait MirrorStore: Send + Sync {
    /// Look up live pages for the given bookmark ids. Requests are
    /// chunked internally; absent ids are simply missing from the map.
    async fn find_by_bookmark_ids(&self, ids: &[i64]) -> MirrorResult<HashMap<i64, MirrorPage>>;

    /// Create a page for a bookmark. The new page starts unlocked with
    /// its stored last-modified set from the bookmark.
    async fn create_page(
        &self,
        bookmark: &Bookmark,
        collection_title: Option<&str>,
        now: DateTime<Utc>,
    ) -> MirrorResult<String>;

    /// Rewrite the mapped content fields of an existing page. Fields
    /// outside the mapped set are left untouched.
    async fn update_page(
        &self,
        page_id: &str,
        bookmark: &Bookmark,
        collection_title: Option<&str>,
        now: DateTime<Utc>,
    ) -> MirrorResult<()>;

    /// Update only the collection field, for bookmarks that moved.
    async fn update_collection(
        &self,
        page_id: &str,
        collection_title: Option<&str>,
        now: DateTime<Utc>,
    ) -> MirrorResult<()>;

    /// Flag absence from the source, recording when it was first seen.
    async fn mark_delete_detected(
        &self,
        page_id: &str,
        detected_at: DateTime<Utc>,
        set_archive_pending: bool,
        now: DateTime<Utc>,
    ) -> MirrorResult<()>;

    /// Clear the delete flag and detection timestamp together.
    async fn clear_delete_flags(&self, page_id: &str) -> MirrorResult<()>;

    /// Archive a page. Terminal; archived pages leave the live set.
    async fn archive_page(&self, page_id: &str) -> MirrorResult<()>;

    /// Every live (non-archived) mirrored page, fully paginated.
    async fn list_all(&self) -> MirrorResult<Vec<MirrorPage>>;
}
