//! ZoneSync Core - Domain types, path mapping and ports
//!
//! This crate contains the pieces shared by every other ZoneSync crate:
//! - **Domain types** - `RemoteEntry`, `TransferTask`, `TransferKind`
//! - **Path mapping** - translation between local paths, zone-relative
//!   object paths and storage URLs
//! - **Port definitions** - `IStorageTransport` and `ILocalFileSystem`,
//!   implemented by the HTTP adapter and the local filesystem adapter
//! - **Configuration** - typed YAML configuration with validation
//!
//! # Architecture
//!
//! Ports define trait interfaces that adapter crates implement. The sync
//! engine only talks to the outside world through them, which keeps the
//! transfer logic testable with in-memory fakes.

pub mod config;
pub mod domain;
pub mod ports;
