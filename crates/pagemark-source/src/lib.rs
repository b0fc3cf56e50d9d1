//! Bookmark-service client.
//!
//! Read-only access to the bookmark service: paginated listing by recency,
//! date-filtered search, targeted single-bookmark detail lookups, and
//! collection title resolution with a per-run cache.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod query;
pub mod traits;

pub use cache::TitleCache;
pub use client::SourceClient;
pub use config::SourceConfig;
pub use error::{SourceError, SourceResult};
pub use query::{SearchField, SearchQuery, Sort};
pub use traits::SourceReader;
