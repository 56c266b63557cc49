//! Multi-version documentation hosting.
//!
//! Clients upload zipped documentation per project and version; the
//! service extracts it below a docs root and serves it back, resolving
//! `latest` to the highest PEP 440 version present on disk.

pub mod config;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod project;
pub mod server;
pub mod storage;
pub mod version;

/// Returns the human-readable name of the application.
pub fn app_name() -> &'static str {
    env!("CARGO_PKG_NAME")
}

/// Returns the version of the application.
pub fn app_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
