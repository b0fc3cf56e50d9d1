//! Read seam over the bookmark service.

use async_trait::async_trait;

use pagemark_core::{Bookmark, BookmarkDetail};

use crate::error::SourceResult;
use crate::query::{SearchQuery, Sort};

/// Paginated, filtered read access to the bookmark service.
///
/// Implemented by [`crate::SourceClient`]; the sync engines depend on this
/// trait so they can be exercised against in-memory fakes.
#[async_trait]
pub trait SourceReader: Send + Sync {
    /// One page of a collection's bookmarks, ordered by creation time.
    async fn list_recent(
        &self,
        collection: i64,
        page_size: usize,
        page: usize,
        sort: Sort,
    ) -> SourceResult<Vec<Bookmark>>;

    /// One page of bookmarks matching a date filter.
    async fn search(
        &self,
        collection: i64,
        query: &SearchQuery,
        page_size: usize,
        page: usize,
        sort: Sort,
    ) -> SourceResult<Vec<Bookmark>>;

    /// Display title of a collection, `None` when the collection is gone
    /// or untitled. Rarely changes; callers cache per run.
    async fn collection_title(&self, collection: i64) -> SourceResult<Option<String>>;

    /// Targeted existence/removal check for a single bookmark.
    async fn bookmark_detail(&self, id: i64) -> SourceResult<BookmarkDetail>;
}
