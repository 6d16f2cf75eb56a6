//! Local filesystem port (driven/secondary port)
//!
//! This module defines the interface the engine uses to walk local trees
//! and stream file contents.
//!
//! ## Design Notes
//!
//! - Uses `std::io::Result` so callers can tell a missing path
//!   (`ErrorKind::NotFound`) from other failures.
//! - Reads and writes are streaming; nothing here loads a whole file.

use std::path::{Path, PathBuf};
use std::pin::Pin;

use chrono::{DateTime, Utc};
use tokio::io::AsyncWrite;

use super::storage_transport::ByteStream;

/// A writable destination file.
pub type ByteSink = Pin<Box<dyn AsyncWrite + Send>>;

/// Snapshot of a path's state on the local filesystem
#[derive(Debug, Clone)]
pub struct FileSystemState {
    /// Whether the file/directory exists on disk
    pub exists: bool,
    /// Whether this is a regular file (false for directories and other types)
    pub is_file: bool,
    /// Size in bytes (0 for directories or non-existent files)
    pub size: u64,
    /// Last modification time (None if not available or file doesn't exist)
    pub modified: Option<DateTime<Utc>>,
}

impl FileSystemState {
    /// Returns a state representing a non-existent path
    pub fn not_found() -> Self {
        Self {
            exists: false,
            is_file: false,
            size: 0,
            modified: None,
        }
    }

    /// Returns true if the file exists and is a regular file
    pub fn is_regular_file(&self) -> bool {
        self.exists && self.is_file
    }

    /// Returns true if the path exists and is a directory
    pub fn is_directory(&self) -> bool {
        self.exists && !self.is_file
    }
}

/// One child of a local directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalEntry {
    /// Absolute (or caller-rooted) path of the child
    pub path: PathBuf,
    /// Whether the child is a directory
    pub is_dir: bool,
}

/// Port trait for local filesystem operations
#[async_trait::async_trait]
pub trait ILocalFileSystem: Send + Sync {
    /// Returns the state of `path`; a missing path is not an error.
    async fn get_state(&self, path: &Path) -> std::io::Result<FileSystemState>;

    /// Lists the immediate children of a directory.
    ///
    /// Entries that are neither files nor directories are omitted.
    async fn read_dir(&self, path: &Path) -> std::io::Result<Vec<LocalEntry>>;

    /// Creates a directory and all missing ancestors.
    async fn create_dir_all(&self, path: &Path) -> std::io::Result<()>;

    /// Opens a file for streaming reads, returning the stream and file size.
    async fn open_read(&self, path: &Path) -> std::io::Result<(ByteStream, u64)>;

    /// Creates (or truncates) a file for writing.
    async fn create_file(&self, path: &Path) -> std::io::Result<ByteSink>;
}
