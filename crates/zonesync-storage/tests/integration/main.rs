//! Integration tests for zonesync-storage
//!
//! Uses wiremock to simulate the storage endpoint and verifies the
//! requests issued by `StorageClient` and the mapping of its responses.

mod common;

mod test_listing;
