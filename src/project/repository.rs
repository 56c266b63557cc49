//! Read side of the docs tree: project listing and version resolution

use std::collections::BTreeMap;
use std::collections::btree_map::Entry as MapEntry;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use pep508_rs::pep440_rs::Version;
use tracing::{debug, warn};

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::project::Project;
use crate::storage::DocsStorage;
use crate::version::{DocVersion, parse_version};

/// Version alias resolving to the highest version of a project
pub const LATEST: &str = "latest";

/// Outcome of resolving a requested version against a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVersion {
    /// The version to report back: the literal directory name for
    /// `latest`, the requested text otherwise
    pub version: String,
    /// Directory holding the documentation, relative to the docs root
    pub path: PathBuf,
}

/// Derives projects and versions from the docs tree on every call.
pub struct ProjectRepository<S: DocsStorage> {
    storage: Arc<S>,
    settings: Arc<Settings>,
}

impl<S: DocsStorage> Clone for ProjectRepository<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            settings: Arc::clone(&self.settings),
        }
    }
}

impl<S: DocsStorage> ProjectRepository<S> {
    pub fn new(storage: Arc<S>, settings: Arc<Settings>) -> Self {
        Self { storage, settings }
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    /// Look up a single project, failing if its directory doesn't exist.
    pub fn project(&self, name: &str) -> Result<Project> {
        self.project_dir(name)?;
        Ok(self.build_project(name))
    }

    /// All non-hidden project directories, sorted by name.
    pub fn list_projects(&self) -> Result<Vec<Project>> {
        let mut names: Vec<String> = self
            .storage
            .list_entries(Path::new(""))?
            .into_iter()
            .filter(|entry| entry.is_dir && !entry.is_hidden())
            .map(|entry| entry.name)
            .collect();
        names.sort();

        debug!("Found {} projects", names.len());
        Ok(names.iter().map(|name| self.build_project(name)).collect())
    }

    /// All versions of a project in ascending order.
    ///
    /// Directory names that aren't valid versions are skipped. When two
    /// directories parse to the same version, the lexicographically
    /// first name is kept.
    pub fn list_versions(&self, name: &str) -> Result<Vec<DocVersion>> {
        let dir = self.project_dir(name)?;
        self.versions_in(name, &dir)
    }

    /// Literal directory name of the highest version of a project.
    pub fn latest(&self, name: &str) -> Result<String> {
        Ok(self.latest_version(name)?.literal().to_string())
    }

    /// Resolve `requested` (a version or [`LATEST`]) to a version directory.
    ///
    /// Explicit versions match by normalized public form, so "1" does not
    /// match a "1.0.0" directory while "2.0.0-beta" matches "2.0.0b0".
    pub fn resolve_version(&self, name: &str, requested: &str) -> Result<ResolvedVersion> {
        if requested == LATEST {
            let latest = self.latest_version(name)?;
            return Ok(ResolvedVersion {
                path: Path::new(name).join(latest.literal()),
                version: latest.literal().to_string(),
            });
        }

        let dir = self.project_dir(name)?;
        let parsed = parse_version(requested)?;
        // Every parsed directory, so a colliding spelling still resolves
        let candidates = self.parsed_dirs(name, &dir)?;

        let found = candidates
            .iter()
            .find(|v| v.literal() == requested)
            .or_else(|| candidates.iter().find(|v| v.matches_public(&parsed)));
        let Some(found) = found else {
            return Err(Error::ProjectVersionNotFound {
                name: name.to_string(),
                version: requested.to_string(),
            });
        };

        Ok(ResolvedVersion {
            version: requested.to_string(),
            path: dir.join(found.literal()),
        })
    }

    /// Existing version of a project equal to `version` after parsing.
    ///
    /// A project without a directory has no versions.
    pub fn find_equivalent(&self, name: &str, version: &Version) -> Result<Option<DocVersion>> {
        if !is_plain_name(name) || !self.storage.is_dir(Path::new(name)) {
            return Ok(None);
        }
        let versions = self.versions_in(name, Path::new(name))?;
        Ok(versions.into_iter().find(|v| v.parsed() == version))
    }

    fn latest_version(&self, name: &str) -> Result<DocVersion> {
        self.list_versions(name)?
            .pop()
            .ok_or_else(|| Error::ProjectVersionNotFound {
                name: name.to_string(),
                version: LATEST.to_string(),
            })
    }

    fn project_dir(&self, name: &str) -> Result<PathBuf> {
        let dir = PathBuf::from(name);
        if !is_plain_name(name) || !self.storage.is_dir(&dir) {
            return Err(Error::ProjectNotFound(name.to_string()));
        }
        Ok(dir)
    }

    /// Version directories in lexicographic order of their names,
    /// collisions included.
    fn parsed_dirs(&self, name: &str, dir: &Path) -> Result<Vec<DocVersion>> {
        let mut literals: Vec<String> = self
            .storage
            .list_entries(dir)?
            .into_iter()
            .filter(|entry| entry.is_dir && !entry.is_hidden())
            .map(|entry| entry.name)
            .collect();
        literals.sort();

        Ok(literals
            .into_iter()
            .filter_map(|literal| {
                DocVersion::from_literal(&literal)
                    .inspect_err(|e| {
                        warn!("Skipping directory '{}' of project '{}': {}", literal, name, e);
                    })
                    .ok()
            })
            .collect())
    }

    fn versions_in(&self, name: &str, dir: &Path) -> Result<Vec<DocVersion>> {
        let mut versions: BTreeMap<Version, DocVersion> = BTreeMap::new();
        for version in self.parsed_dirs(name, dir)? {
            let literal = version.literal().to_string();
            match versions.entry(version.parsed().clone()) {
                MapEntry::Vacant(slot) => {
                    slot.insert(version);
                }
                MapEntry::Occupied(existing) => {
                    warn!(
                        "Ignoring '{}' of project '{}': same version as '{}'",
                        literal,
                        name,
                        existing.get().literal()
                    );
                }
            }
        }

        Ok(versions.into_values().collect())
    }

    fn build_project(&self, name: &str) -> Project {
        Project {
            name: name.to_string(),
            display_name: self.settings.display_name(name).to_string(),
            category_id: self.settings.category_id(name),
        }
    }
}

/// A single, non-hidden path component.
fn is_plain_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.starts_with('.')
}
