//! Integration tests for the archive download.
//!
//! These tests verify byte accounting and handle release with mock servers,
//! including a raw socket server that drops the connection mid-body.

mod support;

use std::path::Path;

use dgc_backup::{
    BackupDownloader, BackupRecord, CompatMode, DownloadError, HttpClient, SelectedBackup,
};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use support::{ADMIN_BASIC_AUTH, config_for, config_with_key};
use support::socket_guard::{should_skip_socket_bound_test, start_mock_server_or_skip};

fn downloader() -> BackupDownloader {
    BackupDownloader::new(HttpClient::new().expect("http client"), CompatMode::Strict)
}

async fn mount_archive(mock_server: &MockServer, id: &str, content: Vec<u8>) {
    Mock::given(method("POST"))
        .and(path(format!("/rest/backup/file/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(content))
        .mount(mock_server)
        .await;
}

/// Downloads `content` and checks bytes in == bytes reported == bytes on disk.
async fn assert_round_trip(content: Vec<u8>) {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    let temp_dir = TempDir::new().expect("temp dir");
    mount_archive(&mock_server, "b-1", content.clone()).await;

    let config = config_for(&mock_server.uri(), temp_dir.path(), "daily-<DATE>");
    let selected = SelectedBackup::Found(BackupRecord::new("b-1", "daily-2024-03-05"));
    let outcome = downloader()
        .download(&selected, &config)
        .await
        .expect("download should succeed");

    assert_eq!(outcome.path, temp_dir.path().join("daily-2024-03-05.zip"));
    assert_eq!(outcome.bytes_written, content.len() as u64);
    let on_disk = std::fs::read(&outcome.path).expect("read archive");
    assert_eq!(on_disk.len(), content.len());
    assert!(on_disk == content, "archive content differs from response body");
}

#[tokio::test]
async fn test_download_empty_body() {
    assert_round_trip(Vec::new()).await;
}

#[tokio::test]
async fn test_download_single_byte_body() {
    assert_round_trip(vec![0x5A]).await;
}

#[tokio::test]
async fn test_download_multi_megabyte_body() {
    // Larger than any single chunk or BufWriter buffer.
    let content: Vec<u8> = (0..6 * 1024 * 1024).map(|i: u32| (i % 251) as u8).collect();
    assert_round_trip(content).await;
}

#[tokio::test]
async fn test_download_overwrites_existing_archive() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    let temp_dir = TempDir::new().expect("temp dir");
    let existing = temp_dir.path().join("nightly.zip");
    std::fs::write(&existing, vec![0u8; 4096]).expect("seed archive");
    mount_archive(&mock_server, "n", b"fresh".to_vec()).await;

    let config = config_for(&mock_server.uri(), temp_dir.path(), "nightly");
    let selected = SelectedBackup::Found(BackupRecord::new("n", "nightly"));
    let outcome = downloader().download(&selected, &config).await.expect("download");

    assert_eq!(outcome.bytes_written, 5);
    assert_eq!(std::fs::read(&existing).expect("read"), b"fresh");
}

/// Serves one request: reads it fully, announces `declared` bytes, sends
/// `sent` bytes, then closes the connection.
async fn serve_truncated_once(listener: TcpListener, declared: usize, sent: usize) {
    let (mut socket, _) = listener.accept().await.expect("accept");

    let mut request = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = socket.read(&mut buf).await.expect("read request");
        if n == 0 {
            break;
        }
        request.extend_from_slice(&buf[..n]);
        if request_complete(&request) {
            break;
        }
    }

    let head = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/zip\r\nContent-Length: {declared}\r\n\r\n"
    );
    socket.write_all(head.as_bytes()).await.expect("write head");
    socket.write_all(&vec![0xAB; sent]).await.expect("write body");
    socket.flush().await.expect("flush");
    let _ = socket.shutdown().await;
}

fn request_complete(request: &[u8]) -> bool {
    let Some(head_end) = request.windows(4).position(|w| w == b"\r\n\r\n") else {
        return false;
    };
    let head = String::from_utf8_lossy(&request[..head_end]).to_ascii_lowercase();
    let body_len = head
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|value| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    request.len() >= head_end + 4 + body_len
}

#[tokio::test]
async fn test_download_truncated_body_releases_and_removes_archive() {
    if should_skip_socket_bound_test() {
        return;
    }
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let base = format!("http://{}", listener.local_addr().expect("addr"));
    let server = tokio::spawn(serve_truncated_once(listener, 1024 * 1024, 10_000));

    let temp_dir = TempDir::new().expect("temp dir");
    let config = config_for(&base, temp_dir.path(), "daily-<DATE>");
    let selected = SelectedBackup::Found(BackupRecord::new("cut", "daily-2024-03-05"));

    let result = downloader().download(&selected, &config).await;
    server.await.expect("server task");

    match result {
        Err(DownloadError::Interrupted { bytes_written, .. }) => {
            assert!(bytes_written <= 10_000, "wrote {bytes_written} bytes");
        }
        other => panic!("Expected Interrupted error, got: {other:?}"),
    }

    let archive = temp_dir.path().join("daily-2024-03-05.zip");
    assert!(!archive.exists(), "partial archive should be removed");
    assert_directory_empty(temp_dir.path());

    // The destination is immediately reusable.
    std::fs::write(&archive, b"retry").expect("rewrite destination");
    assert_eq!(std::fs::read(&archive).expect("read"), b"retry");
}

fn assert_directory_empty(dir: &Path) {
    let leftovers: Vec<_> = std::fs::read_dir(dir)
        .expect("read dir")
        .filter_map(Result::ok)
        .map(|entry| entry.file_name())
        .collect();
    assert!(leftovers.is_empty(), "unexpected files: {leftovers:?}");
}

#[tokio::test]
async fn test_download_empty_sentinel_targets_bare_file_endpoint() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    let temp_dir = TempDir::new().expect("temp dir");

    Mock::given(method("POST"))
        .and(path("/rest/backup/file/"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"?".to_vec()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = config_for(&mock_server.uri(), temp_dir.path(), "daily-<DATE>");
    let selected = SelectedBackup::NotFound {
        expected_name: "daily-2024-03-05".to_string(),
    };
    let outcome = downloader().download(&selected, &config).await.expect("download");
    assert_eq!(outcome.path, temp_dir.path().join(".zip"));
    assert_eq!(outcome.bytes_written, 1);
}

#[tokio::test]
async fn test_download_posts_encoded_key_as_form() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    let temp_dir = TempDir::new().expect("temp dir");

    Mock::given(method("POST"))
        .and(path("/rest/backup/file/0c7f"))
        .and(header("authorization", ADMIN_BASIC_AUTH))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("key=s3cr3t%20key%26more"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PK\x03\x04archive".to_vec()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = config_with_key(
        &mock_server.uri(),
        temp_dir.path(),
        "daily-<DATE>",
        "s3cr3t key&more",
    );
    let selected = SelectedBackup::Found(BackupRecord::new("0c7f", "daily-2024-03-05"));
    let outcome = downloader().download(&selected, &config).await.expect("download");

    assert_eq!(outcome.path, temp_dir.path().join("daily-2024-03-05.zip"));
    assert_eq!(outcome.bytes_written, 11);
    assert_eq!(
        std::fs::read(&outcome.path).expect("read"),
        b"PK\x03\x04archive"
    );
}

#[tokio::test]
async fn test_download_strict_rejects_error_status_without_file() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    let temp_dir = TempDir::new().expect("temp dir");

    Mock::given(method("POST"))
        .and(path("/rest/backup/file/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_bytes(b"not found".to_vec()))
        .mount(&mock_server)
        .await;

    let config = config_for(&mock_server.uri(), temp_dir.path(), "old");
    let selected = SelectedBackup::Found(BackupRecord::new("gone", "old"));
    match downloader().download(&selected, &config).await {
        Err(DownloadError::HttpStatus { status, .. }) => assert_eq!(status, 404),
        other => panic!("Expected HttpStatus error, got: {other:?}"),
    }
    assert!(!temp_dir.path().join("old.zip").exists());
}

#[tokio::test]
async fn test_download_legacy_writes_error_body() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    let temp_dir = TempDir::new().expect("temp dir");

    Mock::given(method("POST"))
        .and(path("/rest/backup/file/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_bytes(b"not found".to_vec()))
        .mount(&mock_server)
        .await;

    let legacy = BackupDownloader::new(HttpClient::new().expect("http client"), CompatMode::Legacy);
    let config = config_for(&mock_server.uri(), temp_dir.path(), "old");
    let selected = SelectedBackup::Found(BackupRecord::new("gone", "old"));
    let outcome = legacy.download(&selected, &config).await.expect("download");
    assert_eq!(outcome.bytes_written, 9);
}

#[tokio::test]
async fn test_download_missing_directory_is_file_system_error() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    let temp_dir = TempDir::new().expect("temp dir");
    let missing = temp_dir.path().join("does-not-exist");

    Mock::given(method("POST"))
        .and(path("/rest/backup/file/a"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"data".to_vec()))
        .mount(&mock_server)
        .await;

    let config = config_for(&mock_server.uri(), &missing, "b");
    let selected = SelectedBackup::Found(BackupRecord::new("a", "b"));
    let result = downloader().download(&selected, &config).await;
    assert!(
        matches!(result, Err(DownloadError::FileSystem { .. })),
        "Expected FileSystem error, got: {result:?}"
    );
}
