//! Storage zone HTTP client
//!
//! Provides a `reqwest`-based implementation of [`IStorageTransport`].
//! Every request carries the `AccessKey` header; bodies are streamed in both
//! directions.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use zonesync_core::domain::paths::RemotePaths;
//! use zonesync_core::ports::IStorageTransport;
//! use zonesync_storage::StorageClient;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let paths = RemotePaths::new("https://storage.bunnycdn.com/", "my-zone")?;
//! let client = StorageClient::new("access-key")?;
//! let entries = client.list(&paths.listing_url("/")).await?;
//! println!("{} entries", entries.len());
//! # Ok(())
//! # }
//! ```

use futures_util::TryStreamExt;
use reqwest::header::{HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Body, Client, Method, RequestBuilder, Response};
use tracing::{debug, instrument, warn};

use zonesync_core::domain::entry::RemoteEntry;
use zonesync_core::ports::storage_transport::{ByteStream, IStorageTransport, TransportError};

use crate::listing::decode_listing;
use crate::StorageError;

/// Name of the authentication header
const ACCESS_KEY_HEADER: &str = "AccessKey";

/// Longest error body kept in a [`TransportError`] message
const MAX_ERROR_BODY: usize = 512;

/// HTTP client for one storage zone's credentials
#[derive(Clone)]
pub struct StorageClient {
    /// The underlying HTTP client
    client: Client,
    /// `AccessKey` header value, marked sensitive
    access_key: HeaderValue,
}

impl std::fmt::Debug for StorageClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageClient")
            .field("access_key", &"<redacted>")
            .finish()
    }
}

impl StorageClient {
    /// Creates a client authenticating with `access_key`.
    ///
    /// # Errors
    /// Returns [`StorageError::InvalidAccessKey`] if the key is not a valid
    /// header value.
    pub fn new(access_key: &str) -> Result<Self, StorageError> {
        Self::with_client(Client::builder().build()?, access_key)
    }

    /// Creates a client on top of a preconfigured `reqwest::Client`.
    pub fn with_client(client: Client, access_key: &str) -> Result<Self, StorageError> {
        let mut access_key = HeaderValue::from_str(access_key)
            .map_err(|_| StorageError::InvalidAccessKey("contains invalid characters".into()))?;
        access_key.set_sensitive(true);
        Ok(Self { client, access_key })
    }

    /// Creates an authenticated request builder for an absolute URL.
    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(ACCESS_KEY_HEADER, self.access_key.clone())
    }

    /// Sends a request and turns transport failures and non-2xx statuses
    /// into [`TransportError`].
    async fn send(&self, request: RequestBuilder) -> Result<Response, TransportError> {
        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let mut body = response.text().await.unwrap_or_default();
        truncate_at_char_boundary(&mut body, MAX_ERROR_BODY);
        let message = if body.is_empty() {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        } else {
            body
        };
        warn!(status = status.as_u16(), %message, "Storage request rejected");
        Err(TransportError::with_status(status.as_u16(), message))
    }
}

/// Cuts `text` to at most `max` bytes without splitting a character.
fn truncate_at_char_boundary(text: &mut String, max: usize) {
    if text.len() <= max {
        return;
    }
    let cut = text
        .char_indices()
        .map(|(idx, _)| idx)
        .take_while(|&idx| idx <= max)
        .last()
        .unwrap_or(0);
    text.truncate(cut);
}

/// Maps a `reqwest` error, keeping the status when one was received.
fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    match err.status() {
        Some(status) => TransportError::with_status(status.as_u16(), err.to_string()),
        None => TransportError::no_response(err.to_string()),
    }
}

#[async_trait::async_trait]
impl IStorageTransport for StorageClient {
    #[instrument(skip(self))]
    async fn list(&self, url: &str) -> Result<Vec<RemoteEntry>, TransportError> {
        debug!("Listing directory");
        let response = self
            .send(
                self.request(Method::GET, url)
                    .header(CONTENT_TYPE, "application/json"),
            )
            .await?;

        let body = response.bytes().await.map_err(map_reqwest_error)?;
        let entries = decode_listing(&body).map_err(|e| {
            TransportError::no_response(format!("invalid listing response: {e}"))
        })?;

        debug!(entries = entries.len(), "Directory listed");
        Ok(entries)
    }

    #[instrument(skip(self))]
    async fn get(&self, url: &str) -> Result<ByteStream, TransportError> {
        debug!("Opening download stream");
        let response = self.send(self.request(Method::GET, url)).await?;
        let stream = response.bytes_stream().map_err(std::io::Error::other);
        Ok(Box::pin(stream))
    }

    #[instrument(skip(self, body))]
    async fn put(
        &self,
        url: &str,
        body: ByteStream,
        content_length: Option<u64>,
    ) -> Result<(), TransportError> {
        debug!("Uploading object");
        let mut request = self
            .request(Method::PUT, url)
            .header(CONTENT_TYPE, "application/octet-stream");
        if let Some(len) = content_length {
            request = request.header(CONTENT_LENGTH, len);
        }

        self.send(request.body(Body::wrap_stream(body))).await?;
        debug!("Upload acknowledged");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, url: &str) -> Result<(), TransportError> {
        debug!("Deleting object");
        self.send(
            self.request(Method::DELETE, url)
                .header(CONTENT_TYPE, "application/json"),
        )
        .await?;
        Ok(())
    }
}
