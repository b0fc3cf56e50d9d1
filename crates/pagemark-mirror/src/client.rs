//! HTTP client for the document database.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, instrument, warn};

use pagemark_core::{Bookmark, MirrorPage};

use crate::config::MirrorConfig;
use crate::error::{MirrorError, MirrorResult};
use crate::properties;
use crate::traits::MirrorStore;

/// One page of a database query.
#[derive(Debug, Deserialize)]
struct QueryResponse {
    results: Vec<Value>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    next_cursor: Option<String>,
}

/// Document-database HTTP client.
///
/// Same retry posture as the bookmark-service client: 429 honoring
/// `Retry-After`, transient gateway errors retried with backoff, anything
/// else surfaced as a typed API error.
pub struct MirrorClient {
    http: reqwest::Client,
    config: MirrorConfig,
    max_retries: u32,
}

impl std::fmt::Debug for MirrorClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MirrorClient")
            .field("config", &self.config.redacted())
            .finish()
    }
}

impl MirrorClient {
    /// Create a new client.
    pub fn new(config: MirrorConfig) -> MirrorResult<Self> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                MirrorError::configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            http,
            config,
            max_retries: 3,
        })
    }

    /// Send a JSON request, retrying rate limits and transient errors.
    async fn send_json(
        &self,
        method: reqwest::Method,
        url: &str,
        body: &Value,
    ) -> MirrorResult<Value> {
        let mut retries = 0;
        let mut delay = Duration::from_secs(1);

        loop {
            let response = self
                .http
                .request(method.clone(), url)
                .bearer_auth(&self.config.token)
                .json(body)
                .send()
                .await?;
            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS && retries < self.max_retries {
                let wait = response
                    .headers()
                    .get("Retry-After")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .map(Duration::from_secs)
                    .unwrap_or(delay);
                retries += 1;
                warn!(
                    wait_secs = wait.as_secs_f64(),
                    retry = retries,
                    "Document database rate limited, backing off"
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
                    "Transient document database error, retrying"
                );
                tokio::time::sleep(delay).await;
                delay *= 2;
                continue;
            }

            if status.is_success() {
                return response.json().await.map_err(MirrorError::from);
            }

            let body = response.text().await.unwrap_or_default();
            return Err(MirrorError::api(status.as_u16(), body));
        }
    }

    fn query_url(&self) -> String {
        format!(
            "{}/databases/{}/query",
            self.config.base_url, self.config.database_id
        )
    }

    fn page_url(&self, page_id: &str) -> String {
        format!("{}/pages/{}", self.config.base_url, page_id)
    }

    /// Query one chunk of bookmark ids.
    async fn query_chunk(&self, ids: &[i64]) -> MirrorResult<Vec<Value>> {
        let clauses: Vec<Value> = ids
            .iter()
            .map(|id| {
                json!({
                    "property": properties::PROP_ID,
                    "number": { "equals": id }
                })
            })
            .collect();

        let body = json!({ "filter": { "or": clauses }, "page_size": 100 });
        let response: QueryResponse =
            serde_json::from_value(self.send_json(reqwest::Method::POST, &self.query_url(), &body).await?)
                .map_err(|e| MirrorError::malformed(format!("query response: {e}")))?;
        Ok(response.results)
    }

    async fn patch_properties(&self, page_id: &str, props: Value) -> MirrorResult<()> {
        let body = json!({ "properties": props });
        self.send_json(reqwest::Method::PATCH, &self.page_url(page_id), &body)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl MirrorStore for MirrorClient {
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn find_by_bookmark_ids(&self, ids: &[i64]) -> MirrorResult<HashMap<i64, MirrorPage>> {
        let mut found = HashMap::new();

        for chunk in ids.chunks(self.config.lookup_chunk) {
            for result in self.query_chunk(chunk).await? {
                if let Some(page) = properties::parse_page(&result) {
                    found.insert(page.bookmark_id, page);
                }
            }
        }

        debug!(requested = ids.len(), found = found.len(), "Existence lookup");
        Ok(found)
    }

    #[instrument(skip(self, bookmark, collection_title), fields(bookmark_id = bookmark.id))]
    async fn create_page(
        &self,
        bookmark: &Bookmark,
        collection_title: Option<&str>,
        now: DateTime<Utc>,
    ) -> MirrorResult<String> {
        let body = json!({
            "parent": { "database_id": self.config.database_id },
            "properties": properties::content_properties(bookmark, collection_title, now),
        });

        let url = format!("{}/pages", self.config.base_url);
        let response = self.send_json(reqwest::Method::POST, &url, &body).await?;
        response
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| MirrorError::malformed("create response missing page id"))
    }

    #[instrument(skip(self, bookmark, collection_title), fields(bookmark_id = bookmark.id))]
    async fn update_page(
        &self,
        page_id: &str,
        bookmark: &Bookmark,
        collection_title: Option<&str>,
        now: DateTime<Utc>,
    ) -> MirrorResult<()> {
        self.patch_properties(
            page_id,
            properties::content_properties(bookmark, collection_title, now),
        )
        .await
    }

    #[instrument(skip(self, collection_title))]
    async fn update_collection(
        &self,
        page_id: &str,
        collection_title: Option<&str>,
        now: DateTime<Utc>,
    ) -> MirrorResult<()> {
        self.patch_properties(page_id, properties::collection_properties(collection_title, now))
            .await
    }

    #[instrument(skip(self))]
    async fn mark_delete_detected(
        &self,
        page_id: &str,
        detected_at: DateTime<Utc>,
        set_archive_pending: bool,
        now: DateTime<Utc>,
    ) -> MirrorResult<()> {
        self.patch_properties(
            page_id,
            properties::delete_detected_properties(detected_at, set_archive_pending, now),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn clear_delete_flags(&self, page_id: &str) -> MirrorResult<()> {
        self.patch_properties(page_id, properties::cleared_delete_properties())
            .await
    }

    #[instrument(skip(self))]
    async fn archive_page(&self, page_id: &str) -> MirrorResult<()> {
        let body = json!({ "archived": true });
        self.send_json(reqwest::Method::PATCH, &self.page_url(page_id), &body)
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> MirrorResult<Vec<MirrorPage>> {
        let mut pages = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut body = json!({ "page_size": 100 });
            if let Some(ref c) = cursor {
                body["start_cursor"] = json!(c);
            }

            let response: QueryResponse = serde_json::from_value(
                self.send_json(reqwest::Method::POST, &self.query_url(), &body)
                    .await?,
            )
            .map_err(|e| MirrorError::malformed(format!("query response: {e}")))?;

            pages.extend(response.results.iter().filter_map(properties::parse_page));

            if response.has_more {
                cursor = response.next_cursor;
                if cursor.is_none() {
                    return Err(MirrorError::malformed(
                        "has_more set without a next_cursor",
                    ));
                }
            } else {
                debug!(pages = pages.len(), "Enumerated mirrored pages");
                return Ok(pages);
            }
        }
    }
}
