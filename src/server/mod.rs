//! HTTP layer
//!
//! Routes:
//! - `GET  /api/projects/`                          projects with display name and category
//! - `GET  /api/projects/{name}/versions/`          literal version names, ascending
//! - `GET  /api/projects/{name}/versions/{version}` `[served version, latest version]`
//! - `POST /api/projects/{name}/versions/{version}` multipart upload of a zip archive (Basic auth)
//! - `GET  /api/project_categories/`                configured categories
//! - `GET  /api/version/`                           application version
//! - `GET  /{name}/{version}/objects.inv`           intersphinx inventory
//! - `GET  /static/projects/...`                    the extracted documentation

pub mod auth;
pub mod error;
pub mod routes;
pub mod state;

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::Settings;
use crate::server::state::AppState;

/// Build the router with all routes and middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/api/projects", get(routes::list_projects))
        .route("/api/projects/", get(routes::list_projects))
        .route(
            "/api/projects/{name}/versions",
            get(routes::list_project_versions),
        )
        .route(
            "/api/projects/{name}/versions/",
            get(routes::list_project_versions),
        )
        .route(
            "/api/projects/{name}/versions/{version}",
            get(routes::get_project_version).post(routes::upload_project_version),
        )
        .route(
            "/api/project_categories",
            get(routes::list_project_categories),
        )
        .route(
            "/api/project_categories/",
            get(routes::list_project_categories),
        )
        .route("/api/version", get(routes::app_version))
        .route("/api/version/", get(routes::app_version))
        .route(
            "/{name}/{version}/objects.inv",
            get(routes::objects_inventory),
        )
        .layer(DefaultBodyLimit::max(state.settings.max_upload_size()));

    Router::new()
        .merge(api)
        .nest_service("/static/projects", ServeDir::new(&state.settings.docs_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until Ctrl+C or SIGTERM.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    std::fs::create_dir_all(&settings.docs_dir).with_context(|| {
        format!(
            "Failed to create docs directory {}",
            settings.docs_dir.display()
        )
    })?;
    let addr = settings.socket_addr()?;
    let state = Arc::new(AppState::new(Arc::new(settings)));

    info!(
        "Serving documentation from {:?}",
        state.settings.docs_dir
    );
    info!("Starting service on '{}'", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
        _ = terminate => info!("Received SIGTERM, shutting down..."),
    }
}
