//! Shared test helpers for storage client integration tests
//!
//! Provides wiremock-based mock server setup. Each helper mounts the
//! necessary mock endpoints on a server whose zone is named `zone` and
//! whose access key is `test-key`.

use bytes::Bytes;
use futures_util::TryStreamExt;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use zonesync_core::domain::paths::RemotePaths;
use zonesync_core::ports::storage_transport::ByteStream;
use zonesync_storage::StorageClient;

pub const ZONE: &str = "zone";
pub const ACCESS_KEY: &str = "test-key";

/// Starts a mock server and returns it with a client and a path mapper
/// pointing at it.
pub async fn setup_storage_mock() -> (MockServer, StorageClient, RemotePaths) {
    let server = MockServer::start().await;
    let client = StorageClient::new(ACCESS_KEY).expect("client");
    let paths = RemotePaths::new(&server.uri(), ZONE).expect("paths");
    (server, client, paths)
}

/// Mounts a listing for `dir_path` (e.g. `/zone/` or `/zone/sub/`).
pub async fn mount_listing(server: &MockServer, dir_path: &str, items: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(dir_path))
        .and(header("AccessKey", ACCESS_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(items))
        .mount(server)
        .await;
}

/// Listing object in the service's wire format.
pub fn object(dir_path: &str, name: &str, is_directory: bool) -> serde_json::Value {
    serde_json::json!({
        "Guid": format!("guid-{name}"),
        "StorageZoneName": ZONE,
        "Path": dir_path,
        "ObjectName": name,
        "Length": if is_directory { 0 } else { 16 },
        "LastChanged": "2024-05-01T08:00:00.000",
        "IsDirectory": is_directory,
    })
}

/// Single-chunk body stream.
pub fn body(data: &'static [u8]) -> ByteStream {
    Box::pin(futures_util::stream::iter(vec![Ok(Bytes::from_static(data))]))
}

/// Drains a body stream into a vector.
pub async fn collect(stream: ByteStream) -> Vec<u8> {
    let chunks: Vec<Bytes> = stream.try_collect().await.expect("stream");
    chunks.concat()
}
