//! Integration tests for directory listings

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};
use zonesync_core::ports::IStorageTransport;

use crate::common;

#[tokio::test]
async fn test_list_returns_entries_in_store_order() {
    let (server, client, paths) = common::setup_storage_mock().await;

    common::mount_listing(
        &server,
        "/zone/",
        serde_json::json!([
            common::object("/zone/", "b.txt", false),
            common::object("/zone/", "a.txt", false),
            common::object("/zone/", "sub", true),
        ]),
    )
    .await;

    let entries = client
        .list(&paths.listing_url("/"))
        .await
        .expect("List failed");

    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["b.txt", "a.txt", "sub"]);
    assert!(entries[2].is_directory);
    assert_eq!(entries[0].full_path, "/zone/");
    assert_eq!(entries[0].length, Some(16));
}

#[tokio::test]
async fn test_list_sends_json_content_type() {
    let (server, client, paths) = common::setup_storage_mock().await;

    Mock::given(method("GET"))
        .and(path("/zone/docs/"))
        .and(header("AccessKey", common::ACCESS_KEY))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let entries = client.list(&paths.listing_url("/docs/")).await.unwrap();
    assert!(entries.is_empty());
}

#[tokio::test]
async fn test_list_unauthorized_carries_status() {
    let (server, client, paths) = common::setup_storage_mock().await;

    Mock::given(method("GET"))
        .and(path("/zone/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "HttpCode": 401,
            "Message": "Unauthorized"
        })))
        .mount(&server)
        .await;

    let err = client.list(&paths.listing_url("")).await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert!(err.message.contains("Unauthorized"));
}

#[tokio::test]
async fn test_list_malformed_body_is_error() {
    let (server, client, paths) = common::setup_storage_mock().await;

    Mock::given(method("GET"))
        .and(path("/zone/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client.list(&paths.listing_url("/")).await.unwrap_err();
    assert!(err.status().is_none());
    assert!(err.message.contains("invalid listing response"));
}
