//! HTTP client for the bookmark service.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use pagemark_core::{Bookmark, BookmarkDetail};

use crate::config::SourceConfig;
use crate::error::{SourceError, SourceResult};
use crate::model::{ItemResponse, ListResponse, RawBookmark, RawCollection};
use crate::query::{SearchQuery, Sort};
use crate::traits::SourceReader;

/// Bookmark-service HTTP client.
///
/// Handles bearer authentication, 429 backoff honoring `Retry-After`, and
/// retry of transient gateway errors. Listing and search failures after
/// retries are exhausted surface as [`SourceError::Api`] and abort the
/// calling run.
pub struct SourceClient {
    http: reqwest::Client,
    config: SourceConfig,
    max_retries: u32,
}

impl std::fmt::Debug for SourceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceClient")
            .field("config", &self.config.redacted())
            .finish()
    }
}

impl SourceClient {
    /// Create a new client.
    pub fn new(config: SourceConfig) -> SourceResult<Self> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                SourceError::configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            http,
            config,
            max_retries: 3,
        })
    }

    /// Performs a GET request, retrying rate limits and transient errors.
    async fn get_response(&self, url: &str) -> SourceResult<reqwest::Response> {
        let mut retries = 0;
        let mut delay = Duration::from_secs(1);

        loop {
            let response = self
                .http
                .get(url)
                .bearer_auth(&self.config.token)
                .send()
                .await?;
            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS && retries < self.max_retries {
                let wait = response
                    .headers()
                    .get("Retry-After")
                    .and_then(|v| v.to_str().ok())
                    .and_then(parse_retry_after)
                    .unwrap_or(delay);
                retries += 1;
                warn!(
                    wait_secs = wait.as_secs_f64(),
                    retry = retries,
                    "Bookmark service rate limited, backing off"
                );
                tokio::time::sleep(wait).await;
                delay *= 2;
                continue;
            }

            if matches!(
                status,
                reqwest::StatusCode::BAD_GATEWAY
                    | reqwest::StatusCode::SERVICE_UNAVAILABLE
                    | reqwest::StatusCode::GATEWAY_TIMEOUT
            ) && retries < self.max_retries
            {
                retries += 1;
                warn!(
                    status = status.as_u16(),
                    retry = retries,
                    max_retries = self.max_retries,
                    "Transient bookmark service error, retrying"
                );
                tokio::time::sleep(delay).await;
                delay *= 2;
                continue;
            }

            return Ok(response);
        }
    }

    /// GET a JSON body, surfacing non-success as an API error.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> SourceResult<T> {
        let response = self.get_response(url).await?;
        let status = response.status();

        if status.is_success() {
            return response.json().await.map_err(SourceError::from);
        }

        let body = response.text().await.unwrap_or_default();
        Err(SourceError::api(status.as_u16(), body))
    }

    /// GET a JSON body, mapping 404 to `None`.
    async fn get_json_opt<T: DeserializeOwned>(&self, url: &str) -> SourceResult<Option<T>> {
        let response = self.get_response(url).await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if status.is_success() {
            return response.json().await.map(Some).map_err(SourceError::from);
        }

        let body = response.text().await.unwrap_or_default();
        Err(SourceError::api(status.as_u16(), body))
    }

    fn bookmarks_url(&self, collection: i64, page_size: usize, page: usize, sort: Sort) -> String {
        format!(
            "{}/collections/{}/bookmarks?perpage={}&page={}&sort={}",
            self.config.base_url,
            collection,
            page_size,
            page,
            sort.as_param()
        )
    }
}

#[async_trait]
impl SourceReader for SourceClient {
    #[instrument(skip(self))]
    async fn list_recent(
        &self,
        collection: i64,
        page_size: usize,
        page: usize,
        sort: Sort,
    ) -> SourceResult<Vec<Bookmark>> {
        let url = self.bookmarks_url(collection, page_size, page, sort);
        debug!(url = %url, "Fetching bookmark page");
        let response: ListResponse = self.get_json(&url).await?;
        Ok(response
            .items
            .into_iter()
            .map(RawBookmark::into_bookmark)
            .collect())
    }

    #[instrument(skip(self, query))]
    async fn search(
        &self,
        collection: i64,
        query: &SearchQuery,
        page_size: usize,
        page: usize,
        sort: Sort,
    ) -> SourceResult<Vec<Bookmark>> {
        let url = format!(
            "{}&search={}",
            self.bookmarks_url(collection, page_size, page, sort),
            urlencoding::encode(&query.render())
        );
        debug!(url = %url, "Searching bookmarks");
        let response: ListResponse = self.get_json(&url).await?;
        Ok(response
            .items
            .into_iter()
            .map(RawBookmark::into_bookmark)
            .collect())
    }

    #[instrument(skip(self))]
    async fn collection_title(&self, collection: i64) -> SourceResult<Option<String>> {
        let url = format!("{}/collections/{}", self.config.base_url, collection);
        let response: Option<ItemResponse<RawCollection>> = self.get_json_opt(&url).await?;
        Ok(response.and_then(|r| r.item.title))
    }

    #[instrument(skip(self))]
    async fn bookmark_detail(&self, id: i64) -> SourceResult<BookmarkDetail> {
        let url = format!("{}/bookmarks/{}", self.config.base_url, id);
        let response: Option<ItemResponse<RawBookmark>> = self.get_json_opt(&url).await?;

        Ok(match response {
            None => BookmarkDetail::missing(),
            Some(wrapper) => {
                let raw = wrapper.item;
                let removed = raw.removed;
                let bookmark = raw.into_bookmark();
                BookmarkDetail {
                    exists: true,
                    removed,
                    collection_id: bookmark.collection_id(),
                    last_update: bookmark.last_update,
                }
            }
        })
    }
}

/// Parse a `Retry-After` header value in delay-seconds form.
fn parse_retry_after(value: &str) -> Option<Duration> {
    value.parse::<u64>().ok().map(Duration::from_secs)
}
