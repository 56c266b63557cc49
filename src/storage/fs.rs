//! Local filesystem storage

use std::fs;
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};

use tracing::debug;
use zip::ZipArchive;

use crate::storage::{DocsStorage, Entry};

/// Docs tree stored in a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of a storage-relative path.
    pub fn resolve(&self, relative: &Path) -> PathBuf {
        self.root.join(relative)
    }
}

impl DocsStorage for FsStorage {
    fn list_entries(&self, relative: &Path) -> io::Result<Vec<Entry>> {
        let dir = self.resolve(relative);
        let mut entries = Vec::new();

        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            // Follow symlinks so linked version directories are listed too
            let is_dir = entry.path().is_dir();
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                debug!("Skipping non UTF-8 entry in {:?}", dir);
                continue;
            };
            entries.push(Entry { name, is_dir });
        }

        Ok(entries)
    }

    fn is_dir(&self, relative: &Path) -> bool {
        self.resolve(relative).is_dir()
    }

    fn create_dir_all(&self, relative: &Path) -> io::Result<()> {
        fs::create_dir_all(self.resolve(relative))
    }

    fn extract_archive_into(
        &self,
        archive: &[u8],
        relative: &Path,
    ) -> zip::result::ZipResult<()> {
        let target = self.resolve(relative);
        debug!("Extracting archive into {:?}", target);

        let mut archive = ZipArchive::new(Cursor::new(archive))?;
        archive.extract(&target)
    }

    fn remove_dir_all(&self, relative: &Path) -> io::Result<()> {
        fs::remove_dir_all(self.resolve(relative))
    }
}
