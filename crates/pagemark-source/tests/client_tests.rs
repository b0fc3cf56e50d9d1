//! Integration tests for the bookmark-service client using wiremock.

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pagemark_source::{SearchQuery, Sort, SourceClient, SourceConfig, SourceError, SourceReader};

async fn setup() -> (MockServer, SourceClient) {
    let server = MockServer::start().await;
    let client = SourceClient::new(SourceConfig::new(server.uri(), "test-token")).unwrap();
    (server, client)
}

fn bookmark_json(id: i64) -> serde_json::Value {
    json!({
        "id": id,
        "title": format!("Bookmark {id}"),
        "link": format!("https://example.com/{id}"),
        "excerpt": "",
        "note": "",
        "tags": ["a"],
        "created": "2026-08-01T12:00:00Z",
        "lastUpdate": "2026-08-02T12:00:00Z",
        "collection": {"id": 7, "title": "Inbox"}
    })
}

#[tokio::test]
async fn list_recent_parses_items_and_sends_auth() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/collections/7/bookmarks"))
        .and(query_param("perpage", "50"))
        .and(query_param("page", "0"))
        .and(query_param("sort", "-created"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [bookmark_json(1), bookmark_json(2)]
        })))
        .mount(&server)
        .await;

    let items = client
        .list_recent(7, 50, 0, Sort::CreatedDesc)
        .await
        .unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].id, 1);
    assert_eq!(items[0].collection_id(), Some(7));
}

#[tokio::test]
async fn search_sends_encoded_query() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/collections/7/bookmarks"))
        .and(query_param("search", "lastUpdate:>2026-08-05"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .mount(&server)
        .await;

    let query = SearchQuery::updated_after(chrono::NaiveDate::from_ymd_opt(2026, 8, 5).unwrap());
    let items = client
        .search(7, &query, 50, 0, Sort::CreatedDesc)
        .await
        .unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn detail_missing_maps_404() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/bookmarks/99"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let detail = client.bookmark_detail(99).await.unwrap();
    assert!(!detail.exists);
    assert!(detail.is_gone());
}

#[tokio::test]
async fn detail_reports_removed_flag_and_collection() {
    let (server, client) = setup().await;

    let mut body = bookmark_json(5);
    body["removed"] = json!(true);
    Mock::given(method("GET"))
        .and(path("/bookmarks/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"item": body})))
        .mount(&server)
        .await;

    let detail = client.bookmark_detail(5).await.unwrap();
    assert!(detail.exists);
    assert!(detail.removed);
    assert!(detail.is_gone());
    assert_eq!(detail.collection_id, Some(7));
}

#[tokio::test]
async fn collection_title_maps_404_to_none() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/collections/123"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    assert!(client.collection_title(123).await.unwrap().is_none());
}

#[tokio::test]
async fn collection_title_parses_item() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/collections/7"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"item": {"id": 7, "title": "Inbox"}})),
        )
        .mount(&server)
        .await;

    assert_eq!(
        client.collection_title(7).await.unwrap().as_deref(),
        Some("Inbox")
    );
}

#[tokio::test]
async fn transient_errors_are_retried() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/collections/7/bookmarks"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/collections/7/bookmarks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .mount(&server)
        .await;

    let items = client
        .list_recent(7, 50, 0, Sort::CreatedDesc)
        .await
        .unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn rate_limit_honors_retry_after() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/collections/7/bookmarks"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/collections/7/bookmarks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .mount(&server)
        .await;

    let items = client
        .list_recent(7, 50, 0, Sort::CreatedDesc)
        .await
        .unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn listing_failure_surfaces_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/collections/7/bookmarks"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad token"))
        .mount(&server)
        .await;

    let err = client
        .list_recent(7, 50, 0, Sort::CreatedDesc)
        .await
        .unwrap_err();
    match err {
        SourceError::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "bad token");
        }
        other => panic!("unexpected error: {other}"),
    }
}
