//! Bulk folder synchronization
//!
//! [`TreeSynchronizer`] mirrors a local directory into a remote one
//! (`upload_folder`) or the reverse (`download_folder`). It owns the
//! [`ConcurrencyGate`] shared by its lister and by every per-file transfer,
//! so the number of in-flight requests never exceeds the configured
//! concurrency.
//!
//! ## Flow
//!
//! ```text
//! upload_folder:   walk local tree ─► filter ─► TransferTask[] ─► gated uploads
//! download_folder: RemoteLister    ─► filter ─► TransferTask[] ─► gated downloads
//! ```
//!
//! All tasks of a bulk call run to completion even if one of them fails;
//! the call then reports the first failure.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, info, instrument};
use zonesync_core::config::TransferConfig;
use zonesync_core::domain::entry::{RemoteEntry, TransferTask};
use zonesync_core::domain::paths::{join_remote, relative_to_root, RemotePaths};
use zonesync_core::ports::local_filesystem::ILocalFileSystem;
use zonesync_core::ports::storage_transport::IStorageTransport;

use crate::executor::{local_component, TransferExecutor};
use crate::fanout::join_all_settled;
use crate::filter::{ExtensionFilter, FileFilter};
use crate::gate::ConcurrencyGate;
use crate::lister::RemoteLister;
use crate::retry::RetryPolicy;
use crate::SyncError;

/// Selection options for a bulk transfer.
#[derive(Clone, Default)]
pub struct SyncOptions {
    /// Descend into sub-directories
    pub recursive: bool,
    /// Extensions to skip, with or without the leading dot
    pub excluded_file_types: Vec<String>,
    /// Predicate over root-relative file paths; `None` keeps every file
    pub file_filter: Option<FileFilter>,
}

impl std::fmt::Debug for SyncOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncOptions")
            .field("recursive", &self.recursive)
            .field("excluded_file_types", &self.excluded_file_types)
            .field("file_filter", &self.file_filter.is_some())
            .finish()
    }
}

impl SyncOptions {
    /// Options selecting every file at the top level only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether sub-directories are included.
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Adds an excluded extension.
    pub fn exclude(mut self, extension: impl Into<String>) -> Self {
        self.excluded_file_types.push(extension.into());
        self
    }

    /// Sets the file predicate.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.file_filter = Some(Arc::new(predicate));
        self
    }

    fn selects(&self, extensions: &ExtensionFilter, file_name: &str, relative_path: &str) -> bool {
        if extensions.is_excluded(file_name) {
            return false;
        }
        match &self.file_filter {
            Some(predicate) => predicate(relative_path),
            None => true,
        }
    }
}

/// Outcome of a successful bulk transfer.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    /// Local paths of every transferred file, in discovery order
    pub transferred: Vec<PathBuf>,
    /// Files left out by the filters
    pub skipped: usize,
    /// When the operation started
    pub started_at: DateTime<Utc>,
    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
}

type WalkFuture<'a> = Pin<Box<dyn Future<Output = Result<(), SyncError>> + Send + 'a>>;

/// Bulk upload and download with bounded concurrency.
pub struct TreeSynchronizer {
    executor: TransferExecutor,
    lister: RemoteLister,
    filesystem: Arc<dyn ILocalFileSystem>,
    gate: Arc<ConcurrencyGate>,
}

impl TreeSynchronizer {
    /// Creates a synchronizer whose gate has `config.concurrency` slots.
    pub fn new(
        transport: Arc<dyn IStorageTransport>,
        filesystem: Arc<dyn ILocalFileSystem>,
        paths: RemotePaths,
        config: &TransferConfig,
    ) -> Self {
        let gate = Arc::new(ConcurrencyGate::new(config.concurrency));
        let executor = TransferExecutor::new(
            Arc::clone(&transport),
            Arc::clone(&filesystem),
            paths.clone(),
            RetryPolicy::from_config(config),
        );
        let lister = RemoteLister::new(transport, paths, Arc::clone(&gate));

        Self {
            executor,
            lister,
            filesystem,
            gate,
        }
    }

    /// Single-file operations, ungated
    pub fn executor(&self) -> &TransferExecutor {
        &self.executor
    }

    /// Remote listing sharing this synchronizer's gate
    pub fn lister(&self) -> &RemoteLister {
        &self.lister
    }

    /// The shared concurrency gate
    pub fn gate(&self) -> &ConcurrencyGate {
        &self.gate
    }

    /// Uploads the files of `local_directory` into `remote_directory`.
    ///
    /// With `options.recursive`, sub-directories map to remote
    /// sub-directories of the same relative name. Filters see the path
    /// relative to `local_directory`, e.g. `sub/b.txt`.
    ///
    /// # Errors
    /// - [`SyncError::NotFound`] if `local_directory` is not a directory.
    /// - The first per-file error, after every upload has finished.
    #[instrument(skip(self, options), fields(local = %local_directory.display()))]
    pub async fn upload_folder(
        &self,
        local_directory: &Path,
        remote_directory: &str,
        options: &SyncOptions,
    ) -> Result<SyncReport, SyncError> {
        let started_at = Utc::now();
        let clock = Instant::now();

        let state = self.filesystem.get_state(local_directory).await?;
        if !state.is_directory() {
            error!("Local directory not found");
            return Err(SyncError::NotFound(local_directory.to_path_buf()));
        }

        let mut files = Vec::new();
        self.walk_local(local_directory, options.recursive, &mut files)
            .await?;

        let extensions = ExtensionFilter::new(&options.excluded_file_types);
        let mut tasks = Vec::with_capacity(files.len());
        let mut skipped = 0;
        for file in files {
            let relative = relative_local_path(local_directory, &file);
            let file_name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            if !options.selects(&extensions, &file_name, &relative) {
                debug!(file = %relative, "Skipping filtered file");
                skipped += 1;
                continue;
            }

            let parent = relative.rsplit_once('/').map(|(dir, _)| dir);
            let destination = match parent {
                Some(dir) => join_remote(remote_directory, Some(dir)),
                None => join_remote(remote_directory, None),
            };
            tasks.push(TransferTask::upload(file, destination));
        }

        info!(
            files = tasks.len(),
            skipped,
            slots_in_use = self.gate.in_use(),
            "Uploading folder"
        );
        let transferred = join_all_settled(tasks.into_iter().map(|task| async move {
            let _permit = self.gate.acquire().await?;
            self.executor
                .upload(&task.local_path, &task.remote_directory)
                .await?;
            Ok::<_, SyncError>(task.local_path)
        }))
        .await?;

        let report = finish(transferred, skipped, started_at, clock);
        info!(
            files = report.transferred.len(),
            duration_ms = report.duration_ms,
            "Folder uploaded"
        );
        Ok(report)
    }

    /// Downloads the files of `remote_directory` into `local_directory`.
    ///
    /// With `options.recursive`, remote sub-directories map to local
    /// sub-directories of the same relative name; otherwise only the
    /// directory's own files are fetched. Filters see the zone-relative
    /// remote path, e.g. `photos/2024/a.jpg`.
    ///
    /// # Errors
    /// - [`SyncError::List`] if enumerating the remote tree fails.
    /// - [`SyncError::InvalidArgument`] if a listed directory name would map
    ///   outside `local_directory`; nothing is downloaded.
    /// - The first per-file error, after every download has finished.
    #[instrument(skip(self, options), fields(local = %local_directory.display()))]
    pub async fn download_folder(
        &self,
        remote_directory: &str,
        local_directory: &Path,
        options: &SyncOptions,
    ) -> Result<SyncReport, SyncError> {
        let started_at = Utc::now();
        let clock = Instant::now();

        let entries = self.lister.list(remote_directory, options.recursive).await?;

        let paths = self.executor.paths();
        let extensions = ExtensionFilter::new(&options.excluded_file_types);
        let mut tasks = Vec::new();
        let mut skipped = 0;
        for entry in entries.iter().filter(|e| !e.is_directory) {
            let relative = paths.relative_file_path(&entry.full_path, &entry.name);
            if !options.selects(&extensions, &entry.name, &relative) {
                debug!(file = %relative, "Skipping filtered file");
                skipped += 1;
                continue;
            }

            let entry_directory = join_remote(&paths.strip_zone_prefix(&entry.full_path), None);
            let destination = if options.recursive {
                local_destination(local_directory, &entry_directory, remote_directory)?
            } else {
                local_directory.to_path_buf()
            };
            tasks.push(download_task(entry, entry_directory, destination));
        }

        info!(
            files = tasks.len(),
            skipped,
            slots_in_use = self.gate.in_use(),
            "Downloading folder"
        );
        let transferred = join_all_settled(tasks.into_iter().map(|task| async move {
            let _permit = self.gate.acquire().await?;
            self.executor
                .download(&task.remote_directory, &task.file_name, &task.local_path)
                .await
        }))
        .await?;

        let report = finish(transferred, skipped, started_at, clock);
        info!(
            files = report.transferred.len(),
            duration_ms = report.duration_ms,
            "Folder downloaded"
        );
        Ok(report)
    }

    /// Collects the files under `directory`, sorted by path at each level.
    fn walk_local<'a>(
        &'a self,
        directory: &'a Path,
        recursive: bool,
        files: &'a mut Vec<PathBuf>,
    ) -> WalkFuture<'a> {
        Box::pin(async move {
            let mut entries = self.filesystem.read_dir(directory).await?;
            entries.sort_by(|a, b| a.path.cmp(&b.path));

            for entry in entries {
                if !entry.is_dir {
                    files.push(entry.path);
                } else if recursive {
                    self.walk_local(&entry.path, recursive, files).await?;
                }
            }
            Ok(())
        })
    }
}

fn download_task(entry: &RemoteEntry, remote_directory: String, destination: PathBuf) -> TransferTask {
    TransferTask::download(remote_directory, entry.name.clone(), destination)
}

/// Local directory mirroring `entry_directory` below `remote_root`.
///
/// Every part must be a plain name; `..` or empty parts are rejected.
fn local_destination(
    local_root: &Path,
    entry_directory: &str,
    remote_root: &str,
) -> Result<PathBuf, SyncError> {
    let relative = relative_to_root(entry_directory, remote_root);
    if relative.is_empty() {
        return Ok(local_root.to_path_buf());
    }

    let mut path = local_root.to_path_buf();
    for part in relative.split('/') {
        path.push(local_component(part)?);
    }
    Ok(path)
}

/// `file` relative to `root`, joined with `/`.
fn relative_local_path(root: &Path, file: &Path) -> String {
    let relative = file.strip_prefix(root).unwrap_or(file);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn finish(
    transferred: Vec<PathBuf>,
    skipped: usize,
    started_at: DateTime<Utc>,
    clock: Instant,
) -> SyncReport {
    SyncReport {
        transferred,
        skipped,
        started_at,
        duration_ms: clock.elapsed().as_millis() as u64,
    }
}
