//! Integration tests for the document-database client using wiremock.

use chrono::{TimeZone, Utc};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pagemark_core::{Bookmark, DeleteState};
use pagemark_mirror::{MirrorClient, MirrorConfig, MirrorStore};

async fn setup() -> (MockServer, MirrorClient) {
    let server = MockServer::start().await;
    let client =
        MirrorClient::new(MirrorConfig::new(server.uri(), "secret", "db-1")).unwrap();
    (server, client)
}

fn page_json(page_id: &str, bookmark_id: i64) -> serde_json::Value {
    json!({
        "id": page_id,
        "archived": false,
        "properties": {
            "Bookmark ID": { "number": bookmark_id },
            "Locked": { "checkbox": false },
            "Last edited": { "date": { "start": "2026-08-01T00:00:00+00:00" } },
        }
    })
}

fn sample_bookmark() -> Bookmark {
    Bookmark {
        id: 42,
        title: "Example".into(),
        url: "https://example.com".into(),
        excerpt: String::new(),
        note: String::new(),
        tags: vec!["a".into()],
        created: Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap(),
        last_update: None,
        domain: Some("example.com".into()),
        collection: None,
    }
}

#[tokio::test]
async fn find_chunks_requests_at_filter_limit() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/databases/db-1/query"))
        .and(header("Authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [page_json("p1", 1)],
            "has_more": false
        })))
        .expect(2)
        .mount(&server)
        .await;

    let ids: Vec<i64> = (1..=26).collect();
    let found = client.find_by_bookmark_ids(&ids).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[&1].page_id, "p1");
}

#[tokio::test]
async fn create_returns_page_id() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/pages"))
        .and(body_partial_json(json!({
            "parent": { "database_id": "db-1" },
            "properties": { "Bookmark ID": { "number": 42 } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "new-page"})))
        .mount(&server)
        .await;

    let now = Utc.with_ymd_and_hms(2026, 8, 2, 0, 0, 0).unwrap();
    let page_id = client
        .create_page(&sample_bookmark(), Some("Inbox"), now)
        .await
        .unwrap();
    assert_eq!(page_id, "new-page");
}

#[tokio::test]
async fn archive_patches_archived_flag() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/pages/p9"))
        .and(body_partial_json(json!({"archived": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "p9"})))
        .expect(1)
        .mount(&server)
        .await;

    client.archive_page("p9").await.unwrap();
}

#[tokio::test]
async fn clear_delete_flags_resets_both_fields() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/pages/p3"))
        .and(body_partial_json(json!({
            "properties": {
                "Deleted": { "checkbox": false },
                "Delete detected": { "date": null }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "p3"})))
        .expect(1)
        .mount(&server)
        .await;

    client.clear_delete_flags("p3").await.unwrap();
}

#[tokio::test]
async fn list_all_follows_cursors() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/databases/db-1/query"))
        .and(body_partial_json(json!({"start_cursor": "c2"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [page_json("p2", 2)],
            "has_more": false
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/databases/db-1/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [page_json("p1", 1)],
            "has_more": true,
            "next_cursor": "c2"
        })))
        .mount(&server)
        .await;

    let pages = client.list_all().await.unwrap();
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].bookmark_id, 1);
    assert_eq!(pages[1].bookmark_id, 2);
    assert_eq!(pages[0].delete_state, DeleteState::Present);
}

#[tokio::test]
async fn update_failure_surfaces_api_error() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/pages/p1"))
        .respond_with(ResponseTemplate::new(400).set_body_string("validation failed"))
        .mount(&server)
        .await;

    let now = Utc.with_ymd_and_hms(2026, 8, 2, 0, 0, 0).unwrap();
    let err = client
        .update_page("p1", &sample_bookmark(), None, now)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("400"));
}
