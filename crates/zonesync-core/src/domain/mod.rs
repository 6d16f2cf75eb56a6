//! Domain layer
//!
//! Pure types with no I/O:
//! - [`entry`] - remote listing entries and transfer tasks
//! - [`paths`] - remote path and URL mapping
//! - [`errors`] - validation errors

pub mod entry;
pub mod errors;
pub mod paths;

pub use entry::{RemoteEntry, TransferKind, TransferTask};
pub use errors::DomainError;
pub use paths::{join_remote, strip_zone_prefix, RemotePaths};
