//! ZoneSync Sync - Bounded-concurrency tree synchronization engine
//!
//! Provides:
//! - Bulk upload of a local tree into a storage zone
//! - Bulk download of a remote tree into a local directory
//! - Recursive remote listing with gated fan-out
//! - Single-file transfers with retry and backoff
//!
//! ## Modules
//!
//! - [`gate`] - counting admission primitive bounding concurrent operations
//! - [`lister`] - recursive remote directory enumeration
//! - [`executor`] - single upload / download / delete with retries
//! - [`synchronizer`] - bulk folder upload and download
//! - [`filesystem`] - local filesystem adapter (tokio, streaming)
//! - [`filter`] - extension and predicate filters

mod fanout;

pub mod executor;
pub mod filesystem;
pub mod filter;
pub mod gate;
pub mod lister;
pub mod retry;
pub mod synchronizer;

pub use executor::TransferExecutor;
pub use filesystem::LocalFileSystemAdapter;
pub use filter::{ExtensionFilter, FileFilter};
pub use gate::{ConcurrencyGate, GatePermit};
pub use lister::RemoteLister;
pub use retry::RetryPolicy;
pub use synchronizer::{SyncOptions, SyncReport, TreeSynchronizer};

use std::path::PathBuf;

use thiserror::Error;
use zonesync_core::ports::storage_transport::TransportError;

/// Errors that can occur during synchronization operations
#[derive(Debug, Error)]
pub enum SyncError {
    /// A local source file or directory does not exist
    #[error("Path not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A required argument was missing or empty
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A network call failed after all retries
    #[error("Transfer failed for {url}: {source}")]
    Transfer {
        /// URL of the failed request
        url: String,
        /// Last transport failure
        #[source]
        source: TransportError,
    },

    /// A directory listing failed
    #[error("Listing failed for '{directory}': {source}")]
    List {
        /// Zone-relative directory whose listing failed
        directory: String,
        /// Transport failure
        #[source]
        source: TransportError,
    },

    /// The concurrency gate was closed while waiting for a slot
    #[error("Concurrency gate closed")]
    GateClosed,

    /// An I/O error occurred on the local filesystem
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SyncError {
    /// HTTP status of the underlying transport failure, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            SyncError::Transfer { source, .. } | SyncError::List { source, .. } => source.status(),
            _ => None,
        }
    }
}
