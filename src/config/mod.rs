//! Service settings
//!
//! Settings are read once at startup from an optional config file and
//! `VDOC_`-prefixed environment variables, validated, and then passed
//! explicitly to every component that needs them.

pub mod validator;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::debug;

pub use validator::validate_categories;

/// Prefix of all environment variables read into [`Settings`]
pub const CONFIG_ENV_PREFIX: &str = "VDOC";

pub const DEFAULT_DOCS_DIR: &str = "/srv/vdoc/docs/";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_BIND_PORT: u16 = 8080;
pub const DEFAULT_MAX_UPLOAD_SIZE_MB: usize = 100;
pub const DEFAULT_API_USERNAME: &str = "admin";
pub const DEFAULT_API_PASSWORD: &str = "admin";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load settings: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Duplicate project category id: {0}")]
    DuplicateCategoryId(u32),

    #[error("Duplicate project category name: '{0}'")]
    DuplicateCategoryName(String),

    #[error("Project '{project}' is mapped to unknown category '{category}'")]
    UnknownCategory { project: String, category: String },

    #[error("Invalid bind address '{0}'")]
    InvalidBindAddress(String),
}

/// A project category shown to clients for grouping projects
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ProjectCategory {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Root directory holding one subdirectory per project
    pub docs_dir: PathBuf,
    pub bind_address: String,
    pub bind_port: u16,
    /// Upper bound for an uploaded archive in megabytes
    pub max_upload_size_mb: usize,
    /// Directory for rolling log files; stderr only when unset
    pub log_dir: Option<PathBuf>,
    /// HTTP Basic credentials required for uploads
    pub api_username: String,
    pub api_password: String,
    #[serde(deserialize_with = "json_or_value")]
    pub project_categories: Vec<ProjectCategory>,
    /// Project name -> category name
    #[serde(deserialize_with = "json_or_value")]
    pub project_category_mapping: IndexMap<String, String>,
    /// Project name -> display name
    #[serde(deserialize_with = "json_or_value")]
    pub project_display_name_mapping: IndexMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            docs_dir: PathBuf::from(DEFAULT_DOCS_DIR),
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            bind_port: DEFAULT_BIND_PORT,
            max_upload_size_mb: DEFAULT_MAX_UPLOAD_SIZE_MB,
            log_dir: None,
            api_username: DEFAULT_API_USERNAME.to_string(),
            api_password: DEFAULT_API_PASSWORD.to_string(),
            project_categories: Vec::new(),
            project_category_mapping: IndexMap::new(),
            project_display_name_mapping: IndexMap::new(),
        }
    }
}

impl Settings {
    /// Load settings from the process environment and an optional file.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(config_file, None)
    }

    /// Like [`Settings::load`], reading variables from `env` instead of
    /// the process environment when given.
    pub fn load_with_env(
        config_file: Option<&Path>,
        env: Option<::config::Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = config_file {
            debug!("Reading settings file {:?}", path);
            builder = builder.add_source(::config::File::from(path).required(true));
        }
        builder = builder.add_source(
            ::config::Environment::with_prefix(CONFIG_ENV_PREFIX)
                .prefix_separator("_")
                .source(env),
        );

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check category consistency. Called by [`Settings::load`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_categories(&self.project_categories, &self.project_category_mapping)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.bind_address, self.bind_port);
        addr.parse()
            .map_err(|_| ConfigError::InvalidBindAddress(addr))
    }

    pub fn max_upload_size(&self) -> usize {
        self.max_upload_size_mb.saturating_mul(1024 * 1024)
    }

    /// Configured display name of a project, falling back to its name.
    pub fn display_name<'a>(&'a self, project: &'a str) -> &'a str {
        self.project_display_name_mapping
            .get(project)
            .map(String::as_str)
            .unwrap_or(project)
    }

    /// Category id of a project, if the project is mapped to one.
    pub fn category_id(&self, project: &str) -> Option<u32> {
        let category_name = self.project_category_mapping.get(project)?;
        self.project_categories
            .iter()
            .find(|category| &category.name == category_name)
            .map(|category| category.id)
    }
}

/// Accept either the structured value or a JSON document in a string,
/// so lists and maps can be set through a single environment variable.
fn json_or_value<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum JsonOrValue<T> {
        Json(String),
        Value(T),
    }

    match JsonOrValue::<T>::deserialize(deserializer)? {
        JsonOrValue::Json(text) => serde_json::from_str(&text).map_err(serde::de::Error::custom),
        JsonOrValue::Value(value) => Ok(value),
    }
}
