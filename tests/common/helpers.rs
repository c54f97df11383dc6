#![allow(dead_code)]

use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a temporary directory for output files.
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Starts a mock server answering `GET <path_str>` with a 200 and `body`.
pub async fn serve_file(path_str: &str, body: &[u8]) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(path_str))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
        .mount(&server)
        .await;
    server
}

/// Mounts an additional 200 response on an existing server.
pub async fn mount_file(server: &MockServer, path_str: &str, body: &[u8]) {
    Mock::given(method("GET"))
        .and(path(path_str))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
        .mount(server)
        .await;
}

/// Test file content of a given size.
pub fn test_content(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i % 256) as u8).collect()
}

/// Asserts that `name` exists under `dir` with exactly `expected` as content.
pub fn assert_file_content(dir: &Path, name: &str, expected: &[u8]) {
    let path = dir.join(name);
    assert!(path.exists(), "File should exist at path: {:?}", path);
    let content = std::fs::read(&path).expect("Failed to read output file");
    assert_eq!(content, expected, "Content mismatch at path: {:?}", path);
}

/// Asserts that `dir` contains no entries at all.
pub fn assert_dir_empty(dir: &Path) {
    let leftover: Vec<_> = std::fs::read_dir(dir)
        .expect("Failed to read output directory")
        .collect();
    assert!(leftover.is_empty(), "Expected empty dir, found {:?}", leftover);
}
