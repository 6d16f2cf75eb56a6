//! Port definitions (driven/secondary ports)
//!
//! - [`storage_transport`] - HTTP access to the object store
//! - [`local_filesystem`] - local directory walking and file streaming
//!
//! Adapters live in `zonesync-storage` (HTTP) and `zonesync-sync`
//! (tokio filesystem).

pub mod local_filesystem;
pub mod storage_transport;

pub use local_filesystem::{FileSystemState, ILocalFileSystem, LocalEntry};
pub use storage_transport::{ByteStream, IStorageTransport, TransportError};
