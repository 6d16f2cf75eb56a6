//! Local filesystem adapter (secondary/driven adapter)
//!
//! Implements [`ILocalFileSystem`] on top of `tokio::fs`.
//!
//! ## Design Decisions
//!
//! - **Streaming**: files are read through `tokio_util::io::ReaderStream`
//!   and written through the returned `tokio::fs::File`, so transfer memory
//!   stays bounded regardless of file size.
//! - **Symlinks are followed**: a directory entry is classified by the
//!   metadata of its target. Dangling links and special files are skipped.

use std::io::ErrorKind;
use std::path::Path;

use chrono::DateTime;
use tokio_util::io::ReaderStream;
use tracing::{debug, instrument};
use zonesync_core::ports::local_filesystem::{
    ByteSink, FileSystemState, ILocalFileSystem, LocalEntry,
};
use zonesync_core::ports::storage_transport::ByteStream;

/// Adapter that bridges the [`ILocalFileSystem`] port to the real filesystem.
#[derive(Debug, Clone, Default)]
pub struct LocalFileSystemAdapter;

impl LocalFileSystemAdapter {
    /// Create a new `LocalFileSystemAdapter`.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl ILocalFileSystem for LocalFileSystemAdapter {
    #[instrument(skip(self), fields(path = %path.display()))]
    async fn get_state(&self, path: &Path) -> std::io::Result<FileSystemState> {
        let metadata = match tokio::fs::metadata(path).await {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("path not found");
                return Ok(FileSystemState::not_found());
            }
            Err(e) => return Err(e),
        };

        let modified = metadata.modified().ok().and_then(|st| {
            st.duration_since(std::time::UNIX_EPOCH)
                .ok()
                .and_then(|dur| DateTime::from_timestamp(dur.as_secs() as i64, dur.subsec_nanos()))
        });

        Ok(FileSystemState {
            exists: true,
            is_file: metadata.is_file(),
            size: metadata.len(),
            modified,
        })
    }

    #[instrument(skip(self), fields(path = %path.display()))]
    async fn read_dir(&self, path: &Path) -> std::io::Result<Vec<LocalEntry>> {
        let mut reader = tokio::fs::read_dir(path).await?;
        let mut entries = Vec::new();

        while let Some(entry) = reader.next_entry().await? {
            let child = entry.path();
            let metadata = match tokio::fs::metadata(&child).await {
                Ok(m) => m,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    debug!(path = %child.display(), "skipping dangling entry");
                    continue;
                }
                Err(e) => return Err(e),
            };

            if metadata.is_dir() {
                entries.push(LocalEntry { path: child, is_dir: true });
            } else if metadata.is_file() {
                entries.push(LocalEntry { path: child, is_dir: false });
            }
        }

        debug!(entries = entries.len(), "directory read");
        Ok(entries)
    }

    #[instrument(skip(self), fields(path = %path.display()))]
    async fn create_dir_all(&self, path: &Path) -> std::io::Result<()> {
        tokio::fs::create_dir_all(path).await
    }

    #[instrument(skip(self), fields(path = %path.display()))]
    async fn open_read(&self, path: &Path) -> std::io::Result<(ByteStream, u64)> {
        let file = tokio::fs::File::open(path).await?;
        let size = file.metadata().await?.len();
        debug!(size, "file opened for reading");
        Ok((Box::pin(ReaderStream::new(file)), size))
    }

    #[instrument(skip(self), fields(path = %path.display()))]
    async fn create_file(&self, path: &Path) -> std::io::Result<ByteSink> {
        let file = tokio::fs::File::create(path).await?;
        Ok(Box::pin(file))
    }
}
