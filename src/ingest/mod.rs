//! Upload pipeline turning a zip archive into a new version directory
//!
//! Every check runs before anything is written, in this order:
//!
//! 1. project name charset
//! 2. version grammar
//! 3. no existing version with the same directory name or parsed value
//! 4. declared content type is `application/zip`
//! 5. a filename was declared
//! 6. the archive opens, every entry decompresses with a matching CRC and
//!    stays inside the target
//! 7. the archive holds an `index.html`
//!
//! Only then is `<project>/<version>` created and the archive extracted.
//! A failed extraction removes the version directory again, and the
//! project directory too when this upload created it.

use std::io::{self, Cursor};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, warn};
use zip::ZipArchive;
use zip::result::ZipError;

use crate::error::{Error, Result};
use crate::project::ProjectRepository;
use crate::storage::DocsStorage;
use crate::version::parse_version;

pub const ARCHIVE_CONTENT_TYPE: &str = "application/zip";
pub const INDEX_DOCUMENT: &str = "index.html";

static PROJECT_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("project name pattern is valid"));

/// An uploaded documentation archive and what the client declared about it.
#[derive(Debug, Clone, Copy)]
pub struct Upload<'a> {
    pub project: &'a str,
    pub version: &'a str,
    pub archive: &'a [u8],
    pub content_type: Option<&'a str>,
    pub filename: Option<&'a str>,
}

/// Validates uploads and extracts them into the docs tree.
pub struct ArchiveIngestor<S: DocsStorage> {
    repository: ProjectRepository<S>,
}

impl<S: DocsStorage> ArchiveIngestor<S> {
    pub fn new(repository: ProjectRepository<S>) -> Self {
        Self { repository }
    }

    /// Store an upload as a new version, returning the version directory
    /// relative to the docs root.
    ///
    /// Existing versions are never overwritten. The existence check and
    /// the directory creation are not atomic; concurrent uploads of the
    /// same version race.
    pub fn ingest(&self, upload: &Upload<'_>) -> Result<PathBuf> {
        let Upload {
            project, version, ..
        } = *upload;

        if !is_valid_project_name(project) {
            return Err(Error::InvalidProjectName(project.to_string()));
        }
        let parsed = parse_version(version)?;

        let target = Path::new(project).join(version);
        let storage = self.repository.storage();
        if storage.is_dir(&target) {
            return Err(already_exists(project, version));
        }
        if let Some(existing) = self.repository.find_equivalent(project, &parsed)? {
            debug!(
                "Version '{}' of project '{}' collides with directory '{}'",
                version,
                project,
                existing.literal()
            );
            return Err(already_exists(project, version));
        }

        if upload.content_type != Some(ARCHIVE_CONTENT_TYPE) {
            return Err(invalid_file("content type mismatch"));
        }
        if upload.filename.is_none() {
            return Err(invalid_file("missing filename"));
        }
        inspect_archive(upload.archive)?;

        // Remove the project directory as well if nothing was there before
        let created = if storage.is_dir(Path::new(project)) {
            target.clone()
        } else {
            PathBuf::from(project)
        };
        let cleanup = || {
            let _ = storage.remove_dir_all(&created).inspect_err(|e| {
                warn!("Failed to clean up {:?}: {}", created, e);
            });
        };

        if let Err(e) = storage.create_dir_all(&target) {
            cleanup();
            return Err(e.into());
        }
        if let Err(e) = storage.extract_archive_into(upload.archive, &target) {
            warn!("Extraction into {:?} failed: {}", target, e);
            cleanup();
            return Err(match e {
                ZipError::Io(e) if e.kind() != io::ErrorKind::InvalidData => Error::Io(e),
                _ => invalid_file("bad archive"),
            });
        }

        info!("Stored version '{}' of project '{}'", version, project);
        Ok(target)
    }
}

pub fn is_valid_project_name(name: &str) -> bool {
    PROJECT_NAME_RE.is_match(name)
}

/// Check the archive opens, every entry path stays below the extraction
/// directory, every entry decompresses with a matching checksum, and an
/// index document is present.
fn inspect_archive(bytes: &[u8]) -> Result<()> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).map_err(|_| invalid_file("bad archive"))?;

    let mut has_index = false;
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|_| invalid_file("bad archive"))?;
        let Some(path) = entry.enclosed_name() else {
            return Err(invalid_file("unsafe entry path"));
        };
        if !entry.is_dir() && path.file_name().is_some_and(|name| name == INDEX_DOCUMENT) {
            has_index = true;
        }
        // Reading to the end verifies the CRC
        io::copy(&mut entry, &mut io::sink()).map_err(|_| invalid_file("bad archive"))?;
    }

    if !has_index {
        return Err(invalid_file("missing index.html"));
    }
    Ok(())
}

fn invalid_file(reason: &str) -> Error {
    Error::UploadedFileInvalid(reason.to_string())
}

fn already_exists(project: &str, version: &str) -> Error {
    Error::ProjectVersionAlreadyExists {
        name: project.to_string(),
        version: version.to_string(),
    }
}
