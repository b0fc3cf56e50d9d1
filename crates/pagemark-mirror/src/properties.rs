//! Page property construction and parsing.
//!
//! The mapped content fields written by sync are exactly the set below;
//! anything else on a page (workflow status, manual notes) belongs to the
//! user and is never included in a content update.

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use pagemark_core::{Bookmark, DeleteState, MirrorPage, MAX_TAGS};

pub const PROP_ID: &str = "Bookmark ID";
pub const PROP_TITLE: &str = "Name";
pub const PROP_URL: &str = "URL";
pub const PROP_EXCERPT: &str = "Excerpt";
pub const PROP_NOTE: &str = "Note";
pub const PROP_TAGS: &str = "Tags";
pub const PROP_DOMAIN: &str = "Domain";
pub const PROP_COLLECTION: &str = "Collection";
pub const PROP_CREATED: &str = "Created";
pub const PROP_EDITED: &str = "Last edited";
pub const PROP_SYNCED: &str = "Last synced";
pub const PROP_LOCKED: &str = "Locked";
pub const PROP_DELETED: &str = "Deleted";
pub const PROP_DELETE_DETECTED: &str = "Delete detected";
pub const PROP_STATUS: &str = "Status";

/// Status value applied when a deletion is first detected.
pub const STATUS_ARCHIVE_PENDING: &str = "Archive pending";

/// Collapse duplicate tags (order-preserving) and cap the count.
#[must_use]
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tags.iter()
        .filter(|t| seen.insert(t.as_str()))
        .take(MAX_TAGS)
        .cloned()
        .collect()
}

fn title_value(text: &str) -> Value {
    json!({ "title": [{ "text": { "content": text } }] })
}

fn rich_text_value(text: &str) -> Value {
    json!({ "rich_text": [{ "text": { "content": text } }] })
}

fn date_value(at: DateTime<Utc>) -> Value {
    json!({ "date": { "start": at.to_rfc3339() } })
}

fn select_value(name: &str) -> Value {
    json!({ "select": { "name": name } })
}

/// Mapped content properties for a create or update.
///
/// Sets the stored last-modified field to the bookmark's effective
/// modification time; the caller has already verified the freshness
/// ordering, so this write keeps the field monotonic.
#[must_use]
pub fn content_properties(
    bookmark: &Bookmark,
    collection_title: Option<&str>,
    now: DateTime<Utc>,
) -> Value {
    let tags: Vec<Value> = normalize_tags(&bookmark.tags)
        .into_iter()
        .map(|t| json!({ "name": t }))
        .collect();

    let mut properties = json!({
        PROP_ID: { "number": bookmark.id },
        PROP_TITLE: title_value(&bookmark.title),
        PROP_URL: { "url": bookmark.url },
        PROP_EXCERPT: rich_text_value(&bookmark.excerpt),
        PROP_NOTE: rich_text_value(&bookmark.note),
        PROP_TAGS: { "multi_select": tags },
        PROP_CREATED: date_value(bookmark.created),
        PROP_EDITED: date_value(bookmark.effective_modified()),
        PROP_SYNCED: date_value(now),
    });

    if let Some(domain) = &bookmark.domain {
        properties[PROP_DOMAIN] = select_value(domain);
    }
    if let Some(title) = collection_title {
        properties[PROP_COLLECTION] = select_value(title);
    }

    properties
}

/// Collection-only update, for bookmarks that moved between collections.
#[must_use]
pub fn collection_properties(collection_title: Option<&str>, now: DateTime<Utc>) -> Value {
    let mut properties = json!({ PROP_SYNCED: date_value(now) });
    properties[PROP_COLLECTION] = match collection_title {
        Some(title) => select_value(title),
        None => json!({ "select": Value::Null }),
    };
    properties
}

/// Delete-detection flags, set together with the detection timestamp.
#[must_use]
pub fn delete_detected_properties(
    detected_at: DateTime<Utc>,
    set_archive_pending: bool,
    now: DateTime<Utc>,
) -> Value {
    let mut properties = json!({
        PROP_DELETED: { "checkbox": true },
        PROP_DELETE_DETECTED: date_value(detected_at),
        PROP_SYNCED: date_value(now),
    });
    if set_archive_pending {
        properties[PROP_STATUS] = select_value(STATUS_ARCHIVE_PENDING);
    }
    properties
}

/// Clear the delete flags, together.
#[must_use]
pub fn cleared_delete_properties() -> Value {
    json!({
        PROP_DELETED: { "checkbox": false },
        PROP_DELETE_DETECTED: { "date": Value::Null },
    })
}

fn prop<'a>(page: &'a Value, name: &str) -> Option<&'a Value> {
    page.get("properties").and_then(|p| p.get(name))
}

fn prop_number(page: &Value, name: &str) -> Option<i64> {
    prop(page, name).and_then(|v| v.get("number")).and_then(Value::as_i64)
}

fn prop_checkbox(page: &Value, name: &str) -> bool {
    prop(page, name)
        .and_then(|v| v.get("checkbox"))
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

fn prop_date(page: &Value, name: &str) -> Option<DateTime<Utc>> {
    prop(page, name)
        .and_then(|v| v.get("date"))
        .and_then(|d| d.get("start"))
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse a page payload into a [`MirrorPage`].
///
/// Returns `None` for pages with no bookmark id property; those were
/// created by hand and do not participate in the mirror.
#[must_use]
pub fn parse_page(page: &Value) -> Option<MirrorPage> {
    let page_id = page.get("id").and_then(Value::as_str)?.to_string();
    let bookmark_id = prop_number(page, PROP_ID)?;

    let archived = page
        .get("archived")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let delete_state = if archived {
        DeleteState::Archived
    } else {
        match (
            prop_checkbox(page, PROP_DELETED),
            prop_date(page, PROP_DELETE_DETECTED),
        ) {
            (true, Some(at)) => DeleteState::DeletionDetected { at },
            _ => DeleteState::Present,
        }
    };

    Some(MirrorPage {
        page_id,
        bookmark_id,
        locked: prop_checkbox(page, PROP_LOCKED),
        delete_state,
        last_edited: prop_date(page, PROP_EDITED),
        last_synced_at: prop_date(page, PROP_SYNCED),
    })
}
