//! ZoneSync Storage - HTTP client for storage zones
//!
//! Implements the [`IStorageTransport`](zonesync_core::ports::IStorageTransport)
//! port against an object store that addresses files as
//! `{base}/{zone}/{path}` and authenticates with an `AccessKey` header.
//!
//! ## Modules
//!
//! - [`client`] - `reqwest`-based transport (list, get, put, delete)
//! - [`listing`] - wire format of directory listings

pub mod client;
pub mod listing;

pub use client::StorageClient;

use thiserror::Error;

/// Errors raised while building a [`StorageClient`]
#[derive(Debug, Error)]
pub enum StorageError {
    /// The access key contains characters not allowed in an HTTP header
    #[error("Invalid access key: {0}")]
    InvalidAccessKey(String),

    /// The underlying HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}
