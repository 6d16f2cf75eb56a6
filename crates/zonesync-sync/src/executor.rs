//! Single-file transfers
//!
//! [`TransferExecutor`] performs one upload, download or delete, retrying
//! failed transport calls per its [`RetryPolicy`]. It takes no gate slot
//! itself; bulk callers acquire one around each call.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use futures_util::TryStreamExt;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info, instrument};
use zonesync_core::domain::paths::RemotePaths;
use zonesync_core::ports::local_filesystem::ILocalFileSystem;
use zonesync_core::ports::storage_transport::{IStorageTransport, TransportError};

use crate::retry::RetryPolicy;
use crate::SyncError;

/// Uploads, downloads and deletes individual objects.
pub struct TransferExecutor {
    transport: Arc<dyn IStorageTransport>,
    filesystem: Arc<dyn ILocalFileSystem>,
    paths: RemotePaths,
    retry: RetryPolicy,
}

impl TransferExecutor {
    /// Creates an executor.
    pub fn new(
        transport: Arc<dyn IStorageTransport>,
        filesystem: Arc<dyn ILocalFileSystem>,
        paths: RemotePaths,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            transport,
            filesystem,
            paths,
            retry,
        }
    }

    /// URL builder for this executor's zone
    pub fn paths(&self) -> &RemotePaths {
        &self.paths
    }

    /// Retry policy applied to every transport call
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Uploads `local_file` as `remote_directory/<file name>`.
    ///
    /// The file is reopened for every attempt. Returns the object URL.
    ///
    /// # Errors
    /// - [`SyncError::NotFound`] if `local_file` is not an existing regular
    ///   file; no request is made.
    /// - [`SyncError::Transfer`] once the retries are exhausted.
    #[instrument(skip(self), fields(file = %local_file.display()))]
    pub async fn upload(
        &self,
        local_file: &Path,
        remote_directory: &str,
    ) -> Result<String, SyncError> {
        let state = self.filesystem.get_state(local_file).await?;
        if !state.is_regular_file() {
            error!("Local file not found");
            return Err(SyncError::NotFound(local_file.to_path_buf()));
        }

        let file_name = local_file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| SyncError::NotFound(local_file.to_path_buf()))?;
        let url = self.paths.url_for(remote_directory, Some(&file_name));

        let transport = &self.transport;
        let filesystem = &self.filesystem;
        let target = url.as_str();
        self.retry
            .run("upload", || async move {
                let (body, size) = filesystem.open_read(local_file).await?;
                transport.put(target, body, Some(size)).await
            })
            .await
            .map_err(|source| transfer_failed("Upload", &url, source))?;

        info!(%url, size = state.size, "File uploaded");
        Ok(url)
    }

    /// Downloads `remote_directory/file_name` into
    /// `local_directory/file_name`, creating `local_directory` if needed.
    ///
    /// Every attempt truncates the destination and rewrites it from the
    /// start. A failed download may leave a partial file behind. Returns the
    /// destination path.
    ///
    /// # Errors
    /// - [`SyncError::InvalidArgument`] if `file_name` is empty or is not a
    ///   single plain path component (`..`, `a/b` and absolute names would
    ///   land outside `local_directory`).
    /// - [`SyncError::Transfer`] once the retries are exhausted.
    #[instrument(skip(self), fields(dir = %local_directory.display()))]
    pub async fn download(
        &self,
        remote_directory: &str,
        file_name: &str,
        local_directory: &Path,
    ) -> Result<PathBuf, SyncError> {
        if file_name.is_empty() {
            return Err(SyncError::InvalidArgument(
                "file name is required for download".into(),
            ));
        }
        let file_name = local_component(file_name)?;

        let url = self.paths.url_for(remote_directory, Some(file_name));
        let destination = local_directory.join(file_name);

        let transport = &self.transport;
        let filesystem = &self.filesystem;
        let source_url = url.as_str();
        let target = destination.as_path();
        let written = self
            .retry
            .run("download", || async move {
                let mut body = transport.get(source_url).await?;
                filesystem.create_dir_all(local_directory).await?;
                let mut sink = filesystem.create_file(target).await?;

                let mut written = 0u64;
                while let Some(chunk) = body.try_next().await? {
                    sink.write_all(&chunk).await?;
                    written += chunk.len() as u64;
                }
                sink.shutdown().await?;
                Ok::<_, TransportError>(written)
            })
            .await
            .map_err(|source| transfer_failed("Download", &url, source))?;

        info!(%url, bytes = written, "File downloaded");
        Ok(destination)
    }

    /// Deletes `remote_directory/file_name`. Returns the object URL.
    ///
    /// # Errors
    /// - [`SyncError::InvalidArgument`] if `file_name` is empty.
    /// - [`SyncError::Transfer`] once the retries are exhausted.
    #[instrument(skip(self))]
    pub async fn delete(&self, remote_directory: &str, file_name: &str) -> Result<String, SyncError> {
        if file_name.is_empty() {
            return Err(SyncError::InvalidArgument(
                "file name is required for delete".into(),
            ));
        }

        let url = self.paths.url_for(remote_directory, Some(file_name));
        let transport = &self.transport;
        let target = url.as_str();
        self.retry
            .run("delete", || async move { transport.delete(target).await })
            .await
            .map_err(|source| transfer_failed("Delete", &url, source))?;

        debug!(%url, "Object deleted");
        Ok(url)
    }
}

/// Checks that `name` is exactly one normal path component, so joining it
/// onto a local directory cannot leave that directory.
pub(crate) fn local_component(name: &str) -> Result<&str, SyncError> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !name.contains('/') => Ok(name),
        _ => {
            error!(name, "Refusing path outside the local directory");
            Err(SyncError::InvalidArgument(format!(
                "'{name}' is not a plain file or directory name"
            )))
        }
    }
}

fn transfer_failed(operation: &str, url: &str, source: TransportError) -> SyncError {
    error!(%url, status = ?source.status(), error = %source, "{operation} failed");
    SyncError::Transfer {
        url: url.to_string(),
        source,
    }
}
