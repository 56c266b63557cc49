//! Request handlers
//!
//! Handlers only translate between HTTP and the blocking core; every
//! filesystem touching call runs on the blocking pool.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Multipart, Path, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::config::ProjectCategory;
use crate::ingest::Upload;
use crate::project::Project;
use crate::server::auth::Authenticated;
use crate::server::error::{ApiError, ApiResult};
use crate::server::state::AppState;

/// Multipart field carrying the documentation archive
pub const UPLOAD_FIELD: &str = "file";

/// Sphinx inventory served for intersphinx cross-project linking
pub const OBJECTS_INVENTORY: &str = "objects.inv";

async fn blocking<T, F>(state: &Arc<AppState>, f: F) -> ApiResult<T>
where
    F: FnOnce(&AppState) -> crate::error::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = Arc::clone(state);
    Ok(tokio::task::spawn_blocking(move || f(&state)).await??)
}

pub async fn list_projects(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Project>>> {
    let projects = blocking(&state, |s| s.repository.list_projects()).await?;
    Ok(Json(projects))
}

pub async fn list_project_versions(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> ApiResult<Json<Vec<String>>> {
    let versions = blocking(&state, move |s| s.repository.list_versions(&name)).await?;
    Ok(Json(
        versions
            .into_iter()
            .map(|version| version.literal().to_string())
            .collect(),
    ))
}

/// Returns `[requested version, latest version]`.
pub async fn get_project_version(
    State(state): State<Arc<AppState>>,
    Path((name, version)): Path<(String, String)>,
) -> ApiResult<Json<(String, String)>> {
    let versions = blocking(&state, move |s| {
        let resolved = s.repository.resolve_version(&name, &version)?;
        let latest = s.repository.latest(&name)?;
        Ok((resolved.version, latest))
    })
    .await?;
    Ok(Json(versions))
}

pub async fn upload_project_version(
    State(state): State<Arc<AppState>>,
    Path((name, version)): Path<(String, String)>,
    _: Authenticated,
    mut multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let mut upload: Option<(Bytes, Option<String>, Option<String>)> = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let content_type = field.content_type().map(str::to_string);
        let filename = field.file_name().map(str::to_string);
        let archive = field.bytes().await?;
        upload = Some((archive, content_type, filename));
    }

    let Some((archive, content_type, filename)) = upload else {
        return Err(ApiError::BadRequest(format!(
            "missing multipart field '{}'",
            UPLOAD_FIELD
        )));
    };

    info!(
        "Received {} bytes for version '{}' of project '{}'",
        archive.len(),
        version,
        name
    );

    let message = format!(
        "Version '{}' of project '{}' uploaded successfully.",
        version, name
    );
    blocking(&state, move |s| {
        s.ingestor
            .ingest(&Upload {
                project: &name,
                version: &version,
                archive: &archive,
                content_type: content_type.as_deref(),
                filename: filename.as_deref(),
            })
            .inspect_err(|e| warn!("Rejected upload of '{}' {}: {}", name, version, e))
    })
    .await?;

    Ok((StatusCode::CREATED, Json(json!({ "message": message }))))
}

pub async fn list_project_categories(
    State(state): State<Arc<AppState>>,
) -> Json<Vec<ProjectCategory>> {
    Json(state.settings.project_categories.clone())
}

pub async fn app_version() -> Json<Value> {
    Json(json!(crate::app_version()))
}

/// Serves `objects.inv` of the resolved version (`latest` allowed).
pub async fn objects_inventory(
    State(state): State<Arc<AppState>>,
    Path((name, version)): Path<(String, String)>,
) -> ApiResult<impl IntoResponse> {
    let resolved = {
        let (name, version) = (name.clone(), version.clone());
        blocking(&state, move |s| s.repository.resolve_version(&name, &version)).await?
    };

    let path = state
        .storage
        .resolve(&resolved.path)
        .join(OBJECTS_INVENTORY);
    let content = tokio::fs::read(&path).await.map_err(|_| ApiError::FileNotFound {
        name,
        version: resolved.version,
        file: OBJECTS_INVENTORY.to_string(),
    })?;

    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        content,
    ))
}
