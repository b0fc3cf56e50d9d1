//! Per-run collection title cache.

use std::collections::HashMap;

use tracing::debug;

use crate::traits::SourceReader;

/// Collection title cache scoped to a single run.
///
/// Constructed cold at the start of every invocation; nothing persists
/// across runs. Lookup failures degrade to `None` so a flaky collections
/// endpoint never fails a sync.
#[derive(Debug, Default)]
pub struct TitleCache {
    titles: HashMap<i64, Option<String>>,
}

impl TitleCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a collection's title, consulting the reader on first use.
    pub async fn resolve(
        &mut self,
        reader: &dyn SourceReader,
        collection: i64,
    ) -> Option<String> {
        if let Some(cached) = self.titles.get(&collection) {
            return cached.clone();
        }

        let title = match reader.collection_title(collection).await {
            Ok(title) => title,
            Err(e) => {
                debug!(collection, error = %e, "Collection title lookup failed");
                None
            }
        };

        self.titles.insert(collection, title.clone());
        title
    }

    /// Number of collections resolved so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    /// Whether nothing has been resolved yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}
