//! Directory listing wire format
//!
//! `GET {base}/{zone}/{dir}/` answers with a JSON array of storage objects
//! in PascalCase. Only the fields the engine uses are decoded; unknown
//! fields are ignored.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use zonesync_core::domain::entry::RemoteEntry;

/// One object of a listing response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct StorageObject {
    /// Object identifier
    guid: Option<String>,
    /// Directory path holding the object, e.g. `/zone/sub/`
    path: String,
    /// File or directory name
    object_name: String,
    /// Size in bytes (0 for directories)
    length: Option<u64>,
    /// Last change timestamp, ISO 8601 without timezone (UTC)
    last_changed: Option<String>,
    /// Whether the object is a directory
    #[serde(default)]
    is_directory: bool,
}

/// Parses a listing timestamp.
///
/// The service omits the timezone designator; values are UTC. RFC 3339
/// values with an explicit offset are accepted too.
fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

impl From<StorageObject> for RemoteEntry {
    fn from(object: StorageObject) -> Self {
        let last_changed = object.last_changed.as_deref().and_then(parse_timestamp);
        RemoteEntry {
            name: object.object_name,
            full_path: object.path,
            is_directory: object.is_directory,
            length: if object.is_directory {
                None
            } else {
                object.length
            },
            last_changed,
            guid: object.guid,
        }
    }
}

/// Decodes a listing body into entries, preserving order.
pub(crate) fn decode_listing(body: &[u8]) -> Result<Vec<RemoteEntry>, serde_json::Error> {
    let objects: Vec<StorageObject> = serde_json::from_slice(body)?;
    Ok(objects.into_iter().map(RemoteEntry::from).collect())
}
