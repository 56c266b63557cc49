use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures of the project, version and upload operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Project '{0}' doesn't exist.")]
    ProjectNotFound(String),

    #[error("'{0}' is not a valid project name.")]
    InvalidProjectName(String),

    #[error("'{0}' is not a valid version identifier.")]
    InvalidVersion(String),

    #[error("Project '{name}' doesn't have a documentation for version '{version}'.")]
    ProjectVersionNotFound { name: String, version: String },

    #[error("Version '{version}' of project '{name}' already exists.")]
    ProjectVersionAlreadyExists { name: String, version: String },

    #[error("The uploaded file is invalid: {0}.")]
    UploadedFileInvalid(String),

    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),
}
