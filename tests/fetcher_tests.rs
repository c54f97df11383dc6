//! End-to-end tests for the fetcher pump loop.
//!
//! Each test runs the full pipeline against a wiremock server: admission
//! under the parallelism bound, filename resolution, failure isolation, and
//! cancellation.

use fetchmux::{CancelFlag, FetcherBuilder, TransferStatus};

use reqwest::header::{HeaderValue, USER_AGENT};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

mod common;
use common::helpers::*;

/// Records when each request arrives, then answers after a fixed delay.
struct RecordingResponder {
    starts: Arc<Mutex<Vec<Instant>>>,
    delay: Duration,
}

impl Respond for RecordingResponder {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        self.starts.lock().unwrap().push(Instant::now());
        ResponseTemplate::new(200)
            .set_body_bytes(b"slot".to_vec())
            .set_delay(self.delay)
    }
}

#[tokio::test]
async fn test_queue_of_three_with_two_slots_completes_all() {
    let server = MockServer::start().await;
    let bodies = [
        ("/a.bin", test_content(1024)),
        ("/b.bin", test_content(2048)),
        ("/c.bin", test_content(16)),
    ];
    for (p, body) in &bodies {
        mount_file(&server, p, body).await;
    }
    let dir = create_temp_dir();
    let fetcher = FetcherBuilder::new()
        .directory(dir.path().to_path_buf())
        .parallel(2)
        .build();

    let urls: Vec<String> = bodies
        .iter()
        .map(|(p, _)| format!("{}{}", server.uri(), p))
        .collect();
    let outcomes = fetcher.fetch(&urls).await.expect("fetch should not be fatal");

    assert_eq!(outcomes.len(), 3);
    assert!(outcomes.iter().all(|o| o.is_success()));
    assert_file_content(dir.path(), "a.bin", &bodies[0].1);
    assert_file_content(dir.path(), "b.bin", &bodies[1].1);
    assert_file_content(dir.path(), "c.bin", &bodies[2].1);
}

#[tokio::test]
async fn test_single_slot_serializes_transfers() {
    let server = MockServer::start().await;
    let starts = Arc::new(Mutex::new(Vec::new()));
    let delay = Duration::from_millis(300);
    Mock::given(method("GET"))
        .respond_with(RecordingResponder {
            starts: starts.clone(),
            delay,
        })
        .mount(&server)
        .await;
    let dir = create_temp_dir();
    let fetcher = FetcherBuilder::new()
        .directory(dir.path().to_path_buf())
        .parallel(1)
        .build();

    let urls = vec![
        format!("{}/first.bin", server.uri()),
        format!("{}/second.bin", server.uri()),
    ];
    let outcomes = fetcher.fetch(&urls).await.unwrap();
    assert_eq!(outcomes.len(), 2);
    assert!(outcomes.iter().all(|o| o.is_success()));

    // With a single slot the second request may only reach the server after
    // the first response, delivered `delay` after its arrival, completes.
    let starts = starts.lock().unwrap();
    assert_eq!(starts.len(), 2);
    let gap = starts[1].duration_since(starts[0]);
    assert!(
        gap >= delay,
        "second transfer started {}ms after the first, expected at least {}ms",
        gap.as_millis(),
        delay.as_millis()
    );
}

#[tokio::test]
async fn test_disposition_filename_names_the_output() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/download"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Disposition", "attachment; filename=\"report.pdf\"")
                .set_body_bytes(b"pdf bytes".to_vec()),
        )
        .mount(&server)
        .await;
    let dir = create_temp_dir();
    let fetcher = FetcherBuilder::new()
        .directory(dir.path().to_path_buf())
        .build();

    let outcomes = fetcher
        .fetch(&[format!("{}/api/download", server.uri())])
        .await
        .unwrap();

    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].is_success());
    assert_file_content(dir.path(), "report.pdf", b"pdf bytes");
}

#[tokio::test]
async fn test_extended_disposition_filename_takes_precedence() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dl"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(
                    "Content-Disposition",
                    "attachment; filename=\"plain.txt\"; filename*=UTF-8''extended.txt",
                )
                .set_body_bytes(b"x".to_vec()),
        )
        .mount(&server)
        .await;
    let dir = create_temp_dir();
    let fetcher = FetcherBuilder::new()
        .directory(dir.path().to_path_buf())
        .build();

    fetcher.fetch(&[format!("{}/dl", server.uri())]).await.unwrap();

    assert_file_content(dir.path(), "extended.txt", b"x");
}

#[tokio::test]
async fn test_url_basename_strips_query_string() {
    let server = serve_file("/path/file.txt", b"hello").await;
    let dir = create_temp_dir();
    let fetcher = FetcherBuilder::new()
        .directory(dir.path().to_path_buf())
        .build();

    fetcher
        .fetch(&[format!("{}/path/file.txt?x=1", server.uri())])
        .await
        .unwrap();

    assert_file_content(dir.path(), "file.txt", b"hello");
}

#[tokio::test]
async fn test_pathless_url_falls_back_to_index_html() {
    let server = serve_file("/", b"<html></html>").await;
    let dir = create_temp_dir();
    let fetcher = FetcherBuilder::new()
        .directory(dir.path().to_path_buf())
        .build();

    fetcher.fetch(&[format!("{}/", server.uri())]).await.unwrap();

    assert_file_content(dir.path(), "index.html", b"<html></html>");
}

#[tokio::test]
async fn test_not_found_is_reported_and_leaves_no_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing.bin"))
        .respond_with(ResponseTemplate::new(404).set_body_bytes(b"not here".to_vec()))
        .mount(&server)
        .await;
    mount_file(&server, "/present.bin", b"data").await;
    let dir = create_temp_dir();
    let fetcher = FetcherBuilder::new()
        .directory(dir.path().to_path_buf())
        .build();

    let urls = vec![
        format!("{}/present.bin", server.uri()),
        format!("{}/missing.bin", server.uri()),
    ];
    let outcomes = fetcher.fetch(&urls).await.unwrap();

    // The failure must not abort the sibling transfer.
    assert_eq!(outcomes.len(), 2);
    let failed = outcomes
        .iter()
        .find(|o| !o.is_success())
        .expect("one outcome should fail");
    assert_eq!(failed.status_code(), 404);
    match failed.state() {
        TransferStatus::Fail(reason) => assert!(reason.contains("404"), "got: {}", reason),
        other => panic!("expected failure, got {:?}", other),
    }
    assert!(!dir.path().join("missing.bin").exists());
    assert_file_content(dir.path(), "present.bin", b"data");
}

#[tokio::test]
async fn test_zero_byte_success_creates_no_file() {
    let server = serve_file("/empty.bin", b"").await;
    let dir = create_temp_dir();
    let fetcher = FetcherBuilder::new()
        .directory(dir.path().to_path_buf())
        .build();

    let outcomes = fetcher
        .fetch(&[format!("{}/empty.bin", server.uri())])
        .await
        .unwrap();

    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].is_success());
    assert_eq!(outcomes[0].bytes(), 0);
    assert_dir_empty(dir.path());
}

#[tokio::test]
async fn test_redirect_resolves_effective_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("Location", format!("{}/new.bin", server.uri())),
        )
        .mount(&server)
        .await;
    mount_file(&server, "/new.bin", b"moved").await;
    let dir = create_temp_dir();
    let fetcher = FetcherBuilder::new()
        .directory(dir.path().to_path_buf())
        .build();

    let outcomes = fetcher.fetch(&[format!("{}/old", server.uri())]).await.unwrap();

    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].is_success());
    assert!(outcomes[0].url().as_str().ends_with("/old"));
    assert!(outcomes[0].effective_url().as_str().ends_with("/new.bin"));
    assert_file_content(dir.path(), "new.bin", b"moved");
}

#[tokio::test]
async fn test_empty_queue_is_a_noop() {
    let fetcher = FetcherBuilder::new().build();
    let outcomes = fetcher.fetch(&[]).await.unwrap();
    assert!(outcomes.is_empty());
}

#[tokio::test]
async fn test_unparseable_url_is_dropped_without_outcome() {
    let server = serve_file("/good.bin", b"ok").await;
    let dir = create_temp_dir();
    let fetcher = FetcherBuilder::new()
        .directory(dir.path().to_path_buf())
        .build();

    let urls = vec![
        "http://".to_string(),
        format!("{}/good.bin", server.uri()),
    ];
    let outcomes = fetcher.fetch(&urls).await.unwrap();

    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].is_success());
    assert_file_content(dir.path(), "good.bin", b"ok");
}

#[tokio::test]
async fn test_cancellation_stops_admission() {
    let server = serve_file("/never.bin", b"data").await;
    let dir = create_temp_dir();
    let cancel = CancelFlag::new();
    cancel.cancel();
    let fetcher = FetcherBuilder::new()
        .directory(dir.path().to_path_buf())
        .cancel(cancel)
        .build();

    let urls = vec![
        format!("{}/never.bin", server.uri()),
        format!("{}/never.bin", server.uri()),
    ];
    let outcomes = fetcher.fetch(&urls).await.unwrap();

    // The loop observes the flag before any drive step.
    assert!(outcomes.is_empty());
    assert_dir_empty(dir.path());
}

#[test]
fn test_builder_defaults() {
    let fetcher = FetcherBuilder::new().build();
    assert_eq!(fetcher.parallel(), 1);
    assert!(fetcher.headers().is_none());
    assert!(!fetcher.cancel_flag().is_cancelled());
}

#[test]
fn test_builder_clamps_parallelism() {
    let fetcher = FetcherBuilder::new().parallel(0).build();
    assert_eq!(fetcher.parallel(), 1);
}

#[test]
fn test_builder_merges_headers() {
    let ua = HeaderValue::from_static("fetchmux-test");
    let fetcher = FetcherBuilder::new()
        .header(USER_AGENT, ua.clone())
        .header(reqwest::header::ACCEPT, HeaderValue::from_static("*/*"))
        .build();
    let headers = fetcher.headers().expect("headers should be set");
    assert_eq!(headers.len(), 2);
    assert_eq!(headers.get(USER_AGENT), Some(&ua));
}
