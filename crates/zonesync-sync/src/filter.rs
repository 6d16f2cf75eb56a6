//! File selection for bulk transfers
//!
//! Two filters apply, to files only and in this order:
//!
//! 1. [`ExtensionFilter`] drops files whose extension is excluded.
//! 2. The caller's [`FileFilter`] predicate sees the file's path relative
//!    to the transfer root (using `/` separators) and keeps it on `true`.

use std::sync::Arc;

use zonesync_core::domain::entry::file_extension;

/// Caller-supplied predicate over a root-relative file path.
pub type FileFilter = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Excludes files by extension.
///
/// Extensions are compared ASCII case-insensitively and may be given with
/// or without the leading dot. A file without an extension is never
/// excluded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionFilter {
    excluded: Vec<String>,
}

impl ExtensionFilter {
    /// Creates a filter excluding the given extensions (`".md"` or `"md"`).
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let excluded = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        Self { excluded }
    }

    /// Whether the filter excludes nothing.
    pub fn is_empty(&self) -> bool {
        self.excluded.is_empty()
    }

    /// Returns `true` if `file_name` has an excluded extension.
    pub fn is_excluded(&self, file_name: &str) -> bool {
        match file_extension(file_name) {
            Some(ext) => self.excluded.iter().any(|e| e.eq_ignore_ascii_case(ext)),
            None => false,
        }
    }
}
