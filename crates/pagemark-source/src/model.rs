//! Wire models for the bookmark service's JSON responses.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use pagemark_core::{Bookmark, CollectionRef};

/// Paginated listing response.
#[derive(Debug, Deserialize)]
pub struct ListResponse {
    pub items: Vec<RawBookmark>,
}

/// Single-item response wrapper.
#[derive(Debug, Deserialize)]
pub struct ItemResponse<T> {
    pub item: T,
}

/// Collection payload from the collections endpoint.
#[derive(Debug, Deserialize)]
pub struct RawCollection {
    pub id: i64,
    pub title: Option<String>,
}

/// Collection reference embedded in a bookmark payload.
#[derive(Debug, Deserialize)]
pub struct RawCollectionRef {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
}

/// Bookmark payload as returned by listing, search, and detail endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBookmark {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created: DateTime<Utc>,
    #[serde(default)]
    pub last_update: Option<DateTime<Utc>>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub removed: bool,
    #[serde(default)]
    pub collection: Option<RawCollectionRef>,
}

impl RawBookmark {
    /// Convert into the domain type, deriving the domain from the link's
    /// host when the service omitted it.
    pub fn into_bookmark(self) -> Bookmark {
        let domain = self.domain.or_else(|| host_of(&self.link));
        Bookmark {
            id: self.id,
            title: self.title,
            url: self.link,
            excerpt: self.excerpt,
            note: self.note,
            tags: self.tags,
            created: self.created,
            last_update: self.last_update,
            domain,
            collection: self.collection.map(|c| CollectionRef {
                id: c.id,
                title: c.title,
            }),
        }
    }
}

/// Host portion of a URL, if it parses.
fn host_of(link: &str) -> Option<String> {
    reqwest::Url::parse(link)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
}
