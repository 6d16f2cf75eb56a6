//! Storage transport port (driven/secondary port)
//!
//! Abstracts the four HTTP calls the engine makes against the object store.
//! Implementations attach credentials, issue the request and map failures to
//! [`TransportError`]; they never retry. Retry policy belongs to the caller.
//!
//! ## Design Notes
//!
//! - Bodies are streamed in both directions as [`ByteStream`] so large files
//!   are never buffered whole in memory.
//! - `list` returns decoded [`RemoteEntry`] values; the wire format is an
//!   adapter concern.

use std::pin::Pin;

use bytes::Bytes;
use futures_util::Stream;
use thiserror::Error;

use crate::domain::entry::RemoteEntry;

/// A stream of body chunks.
pub type ByteStream = Pin<Box<dyn Stream<Item = std::io::Result<Bytes>> + Send>>;

/// A failed network call.
///
/// `status` carries the HTTP status code when the server answered, and is
/// `None` when no response was received (connection refused, timeout, body
/// stream broken).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", render(.status, .message))]
pub struct TransportError {
    /// HTTP status, if a response was received
    pub status: Option<u16>,
    /// Human-readable detail
    pub message: String,
}

fn render(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("HTTP {code}: {message}"),
        None => format!("no response: {message}"),
    }
}

impl TransportError {
    /// The server answered with a non-success status.
    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    /// No response was received.
    pub fn no_response(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    /// HTTP status, if any
    pub fn status(&self) -> Option<u16> {
        self.status
    }
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        Self::no_response(err.to_string())
    }
}

/// Port trait for object store access.
///
/// All URLs are absolute and already include the zone segment; build them
/// with [`RemotePaths`](crate::domain::paths::RemotePaths).
#[async_trait::async_trait]
pub trait IStorageTransport: Send + Sync {
    /// Lists one directory (`GET {base}/{zone}/{dir}/`).
    ///
    /// Entries are returned in the order the store reports them.
    async fn list(&self, url: &str) -> Result<Vec<RemoteEntry>, TransportError>;

    /// Opens a streaming download of one object.
    async fn get(&self, url: &str) -> Result<ByteStream, TransportError>;

    /// Streams `body` to the object at `url`, replacing it if present.
    ///
    /// `content_length` is sent when known.
    async fn put(
        &self,
        url: &str,
        body: ByteStream,
        content_length: Option<u64>,
    ) -> Result<(), TransportError>;

    /// Deletes the object at `url`.
    async fn delete(&self, url: &str) -> Result<(), TransportError>;
}
