//! Typed search queries for the bookmark service.
//!
//! The service's search endpoint accepts `field:>value` expressions with
//! date granularity only, which is why callers filter on the date-only
//! edge of the sync window and re-check instants locally.

use chrono::NaiveDate;

/// Sort order for listing and search endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sort {
    /// Newest first by creation time.
    CreatedDesc,
    /// Oldest first by creation time.
    CreatedAsc,
}

impl Sort {
    /// Query-parameter rendering.
    #[must_use]
    pub fn as_param(&self) -> &'static str {
        match self {
            Sort::CreatedDesc => "-created",
            Sort::CreatedAsc => "created",
        }
    }
}

/// Field a search query filters on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    /// Last-modified timestamp.
    LastUpdate,
    /// Creation timestamp.
    Created,
}

impl SearchField {
    #[must_use]
    fn as_str(&self) -> &'static str {
        match self {
            SearchField::LastUpdate => "lastUpdate",
            SearchField::Created => "created",
        }
    }
}

/// A "field strictly after date" search filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchQuery {
    /// Field to filter on.
    pub field: SearchField,
    /// Exclusive lower bound, date granularity.
    pub after: NaiveDate,
}

impl SearchQuery {
    /// Filter on bookmarks modified after the given date.
    #[must_use]
    pub fn updated_after(after: NaiveDate) -> Self {
        Self {
            field: SearchField::LastUpdate,
            after,
        }
    }

    /// Filter on bookmarks created after the given date.
    #[must_use]
    pub fn created_after(after: NaiveDate) -> Self {
        Self {
            field: SearchField::Created,
            after,
        }
    }

    /// Render the service's search expression.
    #[must_use]
    pub fn render(&self) -> String {
        format!("{}:>{}", self.field.as_str(), self.after.format("%Y-%m-%d"))
    }
}
