//! HTTP request/response test utilities

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use http_body_util::BodyExt;
use tower::ServiceExt;

use vdoc::config::Settings;
use vdoc::server::build_router;
use vdoc::server::state::AppState;

const BOUNDARY: &str = "vdoc-test-boundary";

/// Credentials accepted by a router built with default settings
pub const DEFAULT_CREDENTIALS: (&str, &str) = ("admin", "admin");

/// Router serving `docs` with otherwise default settings
pub fn create_test_router(docs: &Path) -> Router {
    create_test_router_with(Settings {
        docs_dir: docs.to_path_buf(),
        ..Settings::default()
    })
}

pub fn create_test_router_with(settings: Settings) -> Router {
    build_router(Arc::new(AppState::new(Arc::new(settings))))
}

/// Create a GET request
pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// `Authorization` header value for HTTP Basic credentials
pub fn basic_auth(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", username, password)))
}

/// Create an authenticated multipart upload request with a single `file` field
pub fn upload_request(
    uri: &str,
    filename: Option<&str>,
    content_type: Option<&str>,
    archive: &[u8],
) -> Request<Body> {
    upload_request_with_field(uri, "file", filename, content_type, archive)
}

pub fn upload_request_with_field(
    uri: &str,
    field: &str,
    filename: Option<&str>,
    content_type: Option<&str>,
    archive: &[u8],
) -> Request<Body> {
    let mut disposition = format!("Content-Disposition: form-data; name=\"{}\"", field);
    if let Some(filename) = filename {
        disposition.push_str(&format!("; filename=\"{}\"", filename));
    }

    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n{}\r\n", BOUNDARY, disposition).as_bytes());
    if let Some(content_type) = content_type {
        body.extend_from_slice(format!("Content-Type: {}\r\n", content_type).as_bytes());
    }
    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(archive);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    let (username, password) = DEFAULT_CREDENTIALS;
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, basic_auth(username, password))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Send a request and return the status and the raw body
pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

/// Send a request and parse the body as JSON
pub async fn send_json(router: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let (status, body) = send(router, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}
