//! Remote listing entries and transfer tasks

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One result of a remote directory listing: a file or a directory marker.
///
/// `full_path` is the absolute path of the directory that contains the
/// entry, exactly as the storage service reports it, zone segment included
/// (e.g. `/my-zone/sub/`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEntry {
    /// Object name (file or directory name)
    pub name: String,
    /// Absolute directory path holding the entry, starting with `/{zone}/`
    pub full_path: String,
    /// Whether the entry is a directory marker
    pub is_directory: bool,
    /// Size in bytes, when reported
    pub length: Option<u64>,
    /// Last change timestamp, when reported
    pub last_changed: Option<DateTime<Utc>>,
    /// Service-assigned object identifier, when reported
    pub guid: Option<String>,
}

impl RemoteEntry {
    /// Creates a file entry with no optional metadata.
    pub fn file(name: impl Into<String>, full_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            full_path: full_path.into(),
            is_directory: false,
            length: None,
            last_changed: None,
            guid: None,
        }
    }

    /// Creates a directory entry with no optional metadata.
    pub fn directory(name: impl Into<String>, full_path: impl Into<String>) -> Self {
        Self {
            is_directory: true,
            ..Self::file(name, full_path)
        }
    }

    /// Returns the entry's extension without the dot, if any.
    pub fn extension(&self) -> Option<&str> {
        file_extension(&self.name)
    }
}

/// Extension of a file name without the leading dot.
///
/// Dotfiles such as `.env` have no extension; `archive.tar.gz` yields `gz`.
pub fn file_extension(name: &str) -> Option<&str> {
    let base = name.rsplit('/').next().unwrap_or(name);
    match base.rfind('.') {
        Some(0) | None => None,
        Some(idx) if idx + 1 < base.len() => Some(&base[idx + 1..]),
        Some(_) => None,
    }
}

/// Direction of a single file transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferKind {
    /// Local file to remote object
    Upload,
    /// Remote object to local file
    Download,
}

/// A single file transfer, built by the synchronizer and consumed once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferTask {
    /// Upload or download
    pub kind: TransferKind,
    /// Source file (upload) or destination directory (download)
    pub local_path: PathBuf,
    /// Zone-relative remote directory
    pub remote_directory: String,
    /// Object name inside `remote_directory`
    pub file_name: String,
}

impl TransferTask {
    /// Task uploading `local_path` into `remote_directory`.
    pub fn upload(local_path: PathBuf, remote_directory: impl Into<String>) -> Self {
        let file_name = local_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            kind: TransferKind::Upload,
            local_path,
            remote_directory: remote_directory.into(),
            file_name,
        }
    }

    /// Task downloading `remote_directory/file_name` into `local_directory`.
    pub fn download(
        remote_directory: impl Into<String>,
        file_name: impl Into<String>,
        local_directory: PathBuf,
    ) -> Self {
        Self {
            kind: TransferKind::Download,
            local_path: local_directory,
            remote_directory: remote_directory.into(),
            file_name: file_name.into(),
        }
    }
}
