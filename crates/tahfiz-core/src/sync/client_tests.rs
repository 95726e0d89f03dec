use chrono::Utc;

use crate::item::{VerseCard, VerseId};
use crate::sync::client::SyncClient;
use crate::sync::types::{ProgressSnapshot, SyncError};

fn sample_snapshot() -> ProgressSnapshot {
    let mut snapshot = ProgressSnapshot::empty(5, 20);
    let mut card = VerseCard::new(VerseId::new(1, 1), Utc::now(), 2.5);
    card.total_reviews = 3;
    snapshot.items.push(card);
    snapshot
}

#[tokio::test]
async fn test_pull_parses_snapshot() {
    let mut server = mockito::Server::new_async().await;
    let body = serde_json::json!({
        "items": [],
        "streak": { "current": 2, "longest": 5, "last_active_day": "2025-03-10" },
        "goal": {
            "target_new": 5, "target_review": 20,
            "completed_new": 1, "completed_review": 3,
            "day": "2025-03-10"
        },
        "achievements": [
            { "id": "first_verse", "unlocked_at": "2025-03-01T10:00:00Z" }
        ],
        "server_timestamp": "2025-03-10T12:00:00Z"
    });
    let mock = server
        .mock("GET", "/v1/progress")
        .match_header("authorization", "Bearer token-123")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await;

    let client = SyncClient::new(&server.url(), "token-123").unwrap();
    let response = client.pull().await.unwrap();

    mock.assert_async().await;
    assert_eq!(response.snapshot.streak.current, 2);
    assert_eq!(response.snapshot.achievements.len(), 1);
}

#[tokio::test]
async fn test_pull_unauthorized() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/v1/progress")
        .with_status(401)
        .create_async()
        .await;

    let client = SyncClient::new(&server.url(), "bad-token").unwrap();
    assert!(matches!(client.pull().await, Err(SyncError::Unauthorized)));
}

#[tokio::test]
async fn test_pull_server_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/v1/progress")
        .with_status(503)
        .create_async()
        .await;

    let client = SyncClient::new(&server.url(), "token").unwrap();
    assert!(matches!(client.pull().await, Err(SyncError::Http(503))));
}

#[tokio::test]
async fn test_push_sends_full_snapshot() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/progress")
        .match_header("authorization", "Bearer token-123")
        .match_body(mockito::Matcher::PartialJsonString(
            r#"{"items":[{"id":{"surah":1,"ayah":1},"total_reviews":3}]}"#.to_string(),
        ))
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let client = SyncClient::new(&server.url(), "token-123").unwrap();
    client.push(&sample_snapshot()).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_device_id_header_sent() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/progress")
        .match_header("x-tahfiz-device", "tahfiz-abc")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let client = SyncClient::new(&server.url(), "token")
        .unwrap()
        .with_device_id("tahfiz-abc");
    client.push(&sample_snapshot()).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_push_failure_reported() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1/progress")
        .with_status(500)
        .create_async()
        .await;

    let client = SyncClient::new(&server.url(), "token").unwrap();
    assert!(matches!(
        client.push(&sample_snapshot()).await,
        Err(SyncError::Http(500))
    ));
}

#[test]
fn test_invalid_server_url_rejected() {
    assert!(matches!(
        SyncClient::new("not a url", "token"),
        Err(SyncError::InvalidUrl(_))
    ));
}
