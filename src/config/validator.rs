//! Consistency checks for project category configuration

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::config::{ConfigError, ProjectCategory};

/// Validate the category table and the project → category mapping.
///
/// Fails on a duplicated category id, a duplicated category name, or a
/// mapping entry that names a category missing from the table.
pub fn validate_categories(
    categories: &[ProjectCategory],
    mapping: &IndexMap<String, String>,
) -> Result<(), ConfigError> {
    let mut ids = HashSet::new();
    let mut names = HashSet::new();

    for category in categories {
        if !ids.insert(category.id) {
            return Err(ConfigError::DuplicateCategoryId(category.id));
        }
        if !names.insert(category.name.as_str()) {
            return Err(ConfigError::DuplicateCategoryName(category.name.clone()));
        }
    }

    for (project, category) in mapping {
        if !names.contains(category.as_str()) {
            return Err(ConfigError::UnknownCategory {
                project: project.clone(),
                category: category.clone(),
            });
        }
    }

    Ok(())
}
