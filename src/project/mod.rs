//! Projects and their documentation versions
//!
//! # Modules
//!
//! - [`repository`]: enumerates projects and versions from storage and
//!   resolves requested versions (including `latest`)

pub mod repository;

pub use repository::{LATEST, ProjectRepository, ResolvedVersion};

use serde::Serialize;

/// A documentation project as returned to clients.
///
/// Only built for names whose directory exists below the docs root.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Project {
    pub name: String,
    pub display_name: String,
    pub category_id: Option<u32>,
}
