//! Remote directory enumeration
//!
//! A non-recursive listing is a single request and returns the store's
//! entries as-is, directories included. A recursive listing replaces every
//! directory entry by the files beneath it, so the result holds files only.
//!
//! Sub-directories are listed concurrently. Each sub-directory request holds
//! a gate slot for the duration of that one request and releases it before
//! descending further, so nesting deeper than the gate capacity cannot
//! starve itself. The root request is not gated.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::{debug, error, instrument};
use zonesync_core::domain::entry::RemoteEntry;
use zonesync_core::domain::paths::{join_remote, RemotePaths};
use zonesync_core::ports::storage_transport::IStorageTransport;

use crate::fanout::join_all_settled;
use crate::gate::ConcurrencyGate;
use crate::SyncError;

type ListFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<RemoteEntry>, SyncError>> + Send + 'a>>;

/// Lists remote directories, optionally recursively.
pub struct RemoteLister {
    transport: Arc<dyn IStorageTransport>,
    paths: RemotePaths,
    gate: Arc<ConcurrencyGate>,
}

impl RemoteLister {
    /// Creates a lister drawing sub-directory slots from `gate`.
    pub fn new(
        transport: Arc<dyn IStorageTransport>,
        paths: RemotePaths,
        gate: Arc<ConcurrencyGate>,
    ) -> Self {
        Self {
            transport,
            paths,
            gate,
        }
    }

    /// Lists `remote_directory` (zone-relative; `""` or `"/"` is the root).
    ///
    /// With `recursive`, the result contains every file below the directory
    /// and no directory entries. Files of one directory keep the store's
    /// order, with each sub-directory's files spliced in where the
    /// sub-directory appeared.
    ///
    /// # Errors
    /// Returns [`SyncError::List`] for the first listing request that fails;
    /// partial results are discarded. Listings are not retried.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        remote_directory: &str,
        recursive: bool,
    ) -> Result<Vec<RemoteEntry>, SyncError> {
        let entries = self.list_one(remote_directory).await?;
        if !recursive {
            return Ok(entries);
        }

        let files = self.expand(entries).await?;
        debug!(files = files.len(), "Recursive listing complete");
        Ok(files)
    }

    async fn list_one(&self, directory: &str) -> Result<Vec<RemoteEntry>, SyncError> {
        let url = self.paths.listing_url(directory);
        self.transport.list(&url).await.map_err(|source| {
            error!(%url, error = %source, "Directory listing failed");
            SyncError::List {
                directory: join_remote(directory, None),
                source,
            }
        })
    }

    fn expand(&self, entries: Vec<RemoteEntry>) -> ListFuture<'_> {
        Box::pin(async move {
            let branches = entries.into_iter().map(|entry| async move {
                if !entry.is_directory {
                    return Ok(vec![entry]);
                }

                let directory = self.paths.relative_file_path(&entry.full_path, &entry.name);
                let permit = self.gate.acquire().await?;
                let children = self.list_one(&directory).await;
                // Free the slot before descending so nested listings can use it.
                permit.release();
                self.expand(children?).await
            });

            let nested = join_all_settled(branches).await?;
            Ok(nested.into_iter().flatten().collect())
        })
    }
}
