//! Docs tree and archive test utilities

use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;

use tempfile::TempDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Projects and versions of the dummy docs tree
pub const DUMMY_DOCS_STRUCTURE: &[(&str, &[&str])] = &[
    (
        "dummy-project-01",
        &["0.0.1", "0.0.2", "0.1.0", "1.0.0", "1.1.0", "2.0.0"],
    ),
    (
        "dummy-project-02",
        &["1.0.0", "2.0.0-beta", "3.0.0", "4.0.0", "5.0.0", "6.0.0"],
    ),
    ("dummy-project-03", &["0.1.0", "0.2.0"]),
];

/// Create a docs root with [`DUMMY_DOCS_STRUCTURE`] and a hidden directory.
///
/// Every version holds an `index.html` reading "This is <version> of
/// <project>" and an `objects.inv`.
pub fn create_dummy_docs() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    for (project, versions) in DUMMY_DOCS_STRUCTURE {
        for version in *versions {
            let dir = temp_dir.path().join(project).join(version);
            fs::create_dir_all(&dir).unwrap();
            fs::write(
                dir.join("index.html"),
                format!("This is {} of {}", version, project),
            )
            .unwrap();
            fs::write(
                dir.join("objects.inv"),
                format!("inventory {} {}", project, version),
            )
            .unwrap();
        }
    }
    fs::create_dir(temp_dir.path().join(".dummy_hidden")).unwrap();
    temp_dir
}

/// Build an uncompressed zip archive from (name, content) pairs
pub fn zip_with(files: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    for (name, content) in files {
        writer.start_file(*name, options).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Flip one byte of `payload` inside a stored archive, breaking its CRC
pub fn corrupt_payload(mut archive: Vec<u8>, payload: &[u8]) -> Vec<u8> {
    let at = archive
        .windows(payload.len())
        .position(|window| window == payload)
        .unwrap();
    archive[at] ^= 0xff;
    archive
}

/// Whether a version directory exists below the docs root
pub fn version_dir_exists(docs: &Path, project: &str, version: &str) -> bool {
    docs.join(project).join(version).exists()
}
