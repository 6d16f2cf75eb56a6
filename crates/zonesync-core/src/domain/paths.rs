//! Remote path and URL mapping
//!
//! The storage service addresses objects as `{base}/{zone}/{directory}/{file}`
//! while listing responses report each entry's directory as an absolute path
//! that starts with the zone segment (`/{zone}/sub/`). The functions here
//! translate between those shapes.
//!
//! Every function is total: any input string, including the empty string,
//! produces a value without panicking.

use url::Url;

use super::errors::DomainError;

/// Removes at most one leading and one trailing `/`.
fn trim_one_slash(s: &str) -> &str {
    let s = s.strip_prefix('/').unwrap_or(s);
    s.strip_suffix('/').unwrap_or(s)
}

/// Joins a remote directory and an optional file name into a zone-relative
/// object path.
///
/// `""` and `"/"` both denote the zone root. One leading and one trailing
/// separator are stripped from each part independently, and the parts are
/// joined with `/` only when both are non-empty.
///
/// ```
/// use zonesync_core::domain::paths::join_remote;
///
/// assert_eq!(join_remote("", Some("a.txt")), "a.txt");
/// assert_eq!(join_remote("/x/", Some("/y/")), "x/y");
/// assert_eq!(join_remote("/photos/", None), "photos");
/// ```
pub fn join_remote(directory: &str, file_name: Option<&str>) -> String {
    let directory = if directory == "/" { "" } else { directory };
    let directory = trim_one_slash(directory);
    let file_name = trim_one_slash(file_name.unwrap_or(""));

    match (directory.is_empty(), file_name.is_empty()) {
        (false, false) => format!("{directory}/{file_name}"),
        (false, true) => directory.to_string(),
        _ => file_name.to_string(),
    }
}

/// Strips the `/{zone}/` prefix from a path reported by a listing.
///
/// The zone root itself maps to `"/"`. Paths outside the zone are returned
/// unchanged.
pub fn strip_zone_prefix(full_path: &str, zone_name: &str) -> String {
    let root = format!("/{zone_name}/");
    if full_path == root || full_path == &root[..root.len() - 1] {
        return "/".to_string();
    }

    match full_path.strip_prefix(&root) {
        Some(rest) => rest.to_string(),
        None => full_path.to_string(),
    }
}

/// Returns the part of a zone-relative `directory` below `root`.
///
/// Both arguments are normalized with [`join_remote`] first, so leading and
/// trailing separators are irrelevant. A directory equal to the root yields
/// `""`. A directory outside the root is returned normalized but otherwise
/// unchanged.
pub fn relative_to_root(directory: &str, root: &str) -> String {
    let directory = join_remote(directory, None);
    let root = join_remote(root, None);

    if root.is_empty() {
        return directory;
    }
    if directory == root {
        return String::new();
    }

    match directory
        .strip_prefix(root.as_str())
        .and_then(|rest| rest.strip_prefix('/'))
    {
        Some(rest) => rest.to_string(),
        None => directory,
    }
}

/// Storage endpoint plus zone, able to build URLs for any object path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemotePaths {
    /// Endpoint URL, always ending in `/`
    base_url: String,
    /// Name of the storage zone
    zone_name: String,
}

impl RemotePaths {
    /// Creates a mapper for the given endpoint and zone.
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidBaseUrl`] if `base_url` is not an
    /// absolute http(s) URL, and [`DomainError::InvalidZoneName`] if the zone
    /// name is empty or contains `/`.
    pub fn new(base_url: &str, zone_name: &str) -> Result<Self, DomainError> {
        let parsed =
            Url::parse(base_url).map_err(|_| DomainError::InvalidBaseUrl(base_url.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(DomainError::InvalidBaseUrl(base_url.to_string()));
        }

        if zone_name.is_empty() || zone_name.contains('/') {
            return Err(DomainError::InvalidZoneName(zone_name.to_string()));
        }

        let mut base_url = base_url.to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Ok(Self {
            base_url,
            zone_name: zone_name.to_string(),
        })
    }

    /// Endpoint URL (with trailing `/`)
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Storage zone name
    #[must_use]
    pub fn zone_name(&self) -> &str {
        &self.zone_name
    }

    /// Absolute URL of an object: `base + zone + '/' + join_remote(..)`.
    #[must_use]
    pub fn url_for(&self, directory: &str, file_name: Option<&str>) -> String {
        format!(
            "{}{}/{}",
            self.base_url,
            self.zone_name,
            join_remote(directory, file_name)
        )
    }

    /// URL used to list a directory; always ends with `/`.
    #[must_use]
    pub fn listing_url(&self, directory: &str) -> String {
        let mut url = self.url_for(directory, None);
        if !url.ends_with('/') {
            url.push('/');
        }
        url
    }

    /// [`strip_zone_prefix`] bound to this zone.
    #[must_use]
    pub fn strip_zone_prefix(&self, full_path: &str) -> String {
        strip_zone_prefix(full_path, &self.zone_name)
    }

    /// Zone-relative path of a listed file, e.g. `sub/c.txt`.
    #[must_use]
    pub fn relative_file_path(&self, full_path: &str, name: &str) -> String {
        join_remote(&self.strip_zone_prefix(full_path), Some(name))
    }
}
