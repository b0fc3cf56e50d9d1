//! Domain types shared across the pagemark crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::DeleteState;

/// Maximum number of tags persisted per mirrored page.
pub const MAX_TAGS: usize = 50;

/// Reference to the collection a bookmark lives in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionRef {
    /// Collection identifier assigned by the bookmark service.
    pub id: i64,
    /// Display title, when the listing included one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// A bookmark as read from the bookmark service.
///
/// Read-only from pagemark's perspective; the bookmark service owns these
/// records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bookmark {
    /// Stable identifier assigned by the bookmark service.
    pub id: i64,
    /// Display title.
    pub title: String,
    /// Target URL.
    pub url: String,
    /// Free-text excerpt.
    #[serde(default)]
    pub excerpt: String,
    /// Free-text note.
    #[serde(default)]
    pub note: String,
    /// Unordered tag set. Duplicates are collapsed on write.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Creation timestamp.
    pub created: DateTime<Utc>,
    /// Last-modified timestamp, absent for never-edited bookmarks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update: Option<DateTime<Utc>>,
    /// Host portion of `url`, derived when the service omits it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Owning collection, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<CollectionRef>,
}

impl Bookmark {
    /// The timestamp used for freshness comparisons: last modification,
    /// falling back to creation for never-edited bookmarks.
    #[must_use]
    pub fn effective_modified(&self) -> DateTime<Utc> {
        self.last_update.unwrap_or(self.created)
    }

    /// Identifier of the owning collection, if any.
    #[must_use]
    pub fn collection_id(&self) -> Option<i64> {
        self.collection.as_ref().map(|c| c.id)
    }
}

/// Result of a targeted single-bookmark lookup.
///
/// Used during reconciliation to tell a bookmark that moved collections
/// apart from one that was removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookmarkDetail {
    /// Whether the bookmark service knows the identifier at all.
    pub exists: bool,
    /// Whether the service reports the bookmark as removed (trashed).
    pub removed: bool,
    /// Current owning collection, when the bookmark still exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<i64>,
    /// Last-modified timestamp, when the bookmark still exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update: Option<DateTime<Utc>>,
}

impl BookmarkDetail {
    /// Detail for an identifier the service does not know.
    #[must_use]
    pub fn missing() -> Self {
        Self {
            exists: false,
            removed: false,
            collection_id: None,
            last_update: None,
        }
    }

    /// True when the bookmark should be treated as gone from the source.
    #[must_use]
    pub fn is_gone(&self) -> bool {
        !self.exists || self.removed
    }
}

/// A mirrored page as stored in the document database.
///
/// The page is the only persisted state the pipeline relies on; every run
/// re-derives its decisions from these fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorPage {
    /// Opaque page identifier assigned by the document database.
    pub page_id: String,
    /// Join key back to the bookmark service. Unique across non-archived
    /// pages.
    pub bookmark_id: i64,
    /// Human-set flag exempting the page from all automated mutation.
    pub locked: bool,
    /// Delete-tracking state.
    pub delete_state: DeleteState,
    /// Stored last-modified timestamp, compared against
    /// [`Bookmark::effective_modified`] on update decisions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_edited: Option<DateTime<Utc>>,
    /// When the page was last written by a sync run. Observability only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_synced_at: Option<DateTime<Utc>>,
}

impl MirrorPage {
    /// Whether an incoming modification timestamp is strictly newer than
    /// the stored one. Pages with no stored timestamp always accept.
    #[must_use]
    pub fn is_stale_against(&self, incoming: DateTime<Utc>) -> bool {
        match self.last_edited {
            Some(stored) => incoming > stored,
            None => true,
        }
    }
}
