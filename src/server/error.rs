use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::http::header::WWW_AUTHENTICATE;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use crate::error::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] Error),

    #[error("Invalid upload request: {0}")]
    BadRequest(String),

    #[error("File '{file}' doesn't exist for version '{version}' of project '{name}'.")]
    FileNotFound {
        name: String,
        version: String,
        file: String,
    },

    #[error("Invalid username and/or password")]
    InvalidCredentials,

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Core(error) => match error {
                Error::ProjectNotFound(_) | Error::ProjectVersionNotFound { .. } => {
                    StatusCode::NOT_FOUND
                }
                Error::InvalidProjectName(_)
                | Error::InvalidVersion(_)
                | Error::UploadedFileInvalid(_) => StatusCode::BAD_REQUEST,
                Error::ProjectVersionAlreadyExists { .. } => StatusCode::FORBIDDEN,
                Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::FileNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        let body = Json(json!({ "message": self.to_string() }));
        if matches!(self, ApiError::InvalidCredentials) {
            return (status, [(WWW_AUTHENTICATE, "Basic")], body).into_response();
        }
        (status, body).into_response()
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::BadRequest(err.body_text())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("Worker task failed: {err}"))
    }
}
