//! Storage layer for the documentation tree
//!
//! All paths handed to a [`DocsStorage`] are relative to the docs root.
//! The layout is `<project>/<literal version>/...extracted files...`.

pub mod fs;

pub use fs::FsStorage;

use std::io;
use std::path::Path;

#[cfg(test)]
use mockall::automock;

/// A single child of a storage directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub is_dir: bool,
}

impl Entry {
    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
        }
    }

    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
        }
    }

    /// Dot-prefixed entries are never listed as projects or versions.
    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }
}

/// Capabilities the project repository and archive ingestor need from
/// the backing store.
#[cfg_attr(test, automock)]
pub trait DocsStorage: Send + Sync {
    /// List the children of a directory (no particular order).
    fn list_entries(&self, relative: &Path) -> io::Result<Vec<Entry>>;

    /// Whether a directory exists at `relative`.
    fn is_dir(&self, relative: &Path) -> bool;

    /// Create a directory and all missing parents.
    fn create_dir_all(&self, relative: &Path) -> io::Result<()>;

    /// Unpack a zip archive into an existing directory, keeping the
    /// archive's relative entry paths.
    fn extract_archive_into(&self, archive: &[u8], relative: &Path)
    -> zip::result::ZipResult<()>;

    /// Remove a directory and everything below it.
    fn remove_dir_all(&self, relative: &Path) -> io::Result<()>;
}
