#![allow(clippy::unwrap_used)]
// Integration tests for `DepotClient` using wiremock.

use pretty_assertions::assert_eq;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use depot_api::{DepotClient, Error};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, DepotClient) {
    let server = MockServer::start().await;
    let client = DepotClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

// ── Files ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_files() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "filename": "report.pdf",
                "size": 2_097_152,
                "size_formatted": "2.0 MB",
                "upload_time": 1_700_000_100.5,
                "download_count": 4
            },
            {
                "filename": "notes.txt",
                "size_formatted": "12 B",
                "upload_time": 1_700_000_000.0,
                "download_count": 0
            }
        ])))
        .mount(&server)
        .await;

    let files = client.list_files().await.unwrap();

    assert_eq!(files.len(), 2);
    assert_eq!(files[0].filename, "report.pdf");
    assert_eq!(files[0].size, Some(2_097_152));
    assert_eq!(files[0].download_count, 4);
    assert_eq!(files[1].size, None);
}

#[tokio::test]
async fn test_list_files_server_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/files"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client.list_files().await.unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert_eq!(err.to_string(), "Server returned 503: Service Unavailable");
}

#[tokio::test]
async fn test_list_files_malformed_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/files"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = client.list_files().await;

    assert!(
        matches!(result, Err(Error::Deserialization { ref body, .. }) if body.contains("oops")),
        "expected Deserialization error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_delete_file() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/delete/a.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "message": "File a.txt deleted successfully"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client.delete_file("a.txt").await.unwrap();

    assert_eq!(resp.message, "File a.txt deleted successfully");
    assert_eq!(resp.status.as_deref(), Some("success"));
}

#[tokio::test]
async fn test_delete_missing_file() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/delete/ghost.bin"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "status": "error",
            "message": "File not found or could not be deleted"
        })))
        .mount(&server)
        .await;

    let err = client.delete_file("ghost.bin").await.unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_delete_encodes_filename() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/delete/two%20words.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client.delete_file("two words.txt").await.unwrap();

    assert_eq!(resp.message, "ok");
}

#[tokio::test]
async fn test_download_file_writes_body() {
    let (server, client) = setup().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/download/data.bin"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![7_u8; 4096]))
        .mount(&server)
        .await;

    let saved = client.download_file("data.bin", dir.path()).await.unwrap();

    assert_eq!(saved, dir.path().join("data.bin"));
    assert_eq!(std::fs::read(&saved).unwrap(), vec![7_u8; 4096]);
    assert!(!dir.path().join("data.bin.part").exists());
}

#[tokio::test]
async fn test_download_failure_leaves_no_file() {
    let (server, client) = setup().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/download/gone.txt"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client.download_file("gone.txt", dir.path()).await.unwrap_err();

    assert!(err.is_not_found());
    assert!(!dir.path().join("gone.txt").exists());
}

/// Serve one response that promises 1000 bytes but sends only the body
/// given, then hang up.
async fn truncated_body_server(body: &'static [u8]) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = vec![0_u8; 4096];
        let _ = socket.read(&mut request).await.unwrap();
        socket
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 1000\r\n\r\n")
            .await
            .unwrap();
        socket.write_all(body).await.unwrap();
        socket.shutdown().await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn test_truncated_download_leaves_no_file() {
    let base = truncated_body_server(b"payload").await;
    let client = DepotClient::from_reqwest(&base, reqwest::Client::new()).unwrap();
    let dir = tempfile::tempdir().unwrap();

    let result = client.download_file("big.bin", dir.path()).await;

    assert!(result.is_err(), "got: {result:?}");
    assert!(!dir.path().join("big.bin").exists());
    assert!(!dir.path().join("big.bin.part").exists());
}

#[tokio::test]
async fn test_truncated_download_keeps_existing_copy() {
    let base = truncated_body_server(b"new").await;
    let client = DepotClient::from_reqwest(&base, reqwest::Client::new()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("big.bin"), b"old contents").unwrap();

    let result = client.download_file("big.bin", dir.path()).await;

    assert!(result.is_err(), "got: {result:?}");
    assert_eq!(std::fs::read(dir.path().join("big.bin")).unwrap(), b"old contents");
}

#[tokio::test]
async fn test_upload_follows_redirect() {
    let (server, client) = setup().await;
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("hello.txt");
    std::fs::write(&source, b"hello depot").unwrap();

    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/file_manager"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/file_manager"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&server)
        .await;

    let name = client.upload_file(&source).await.unwrap();
    assert_eq!(name.as_deref(), Some("hello.txt"));

    let requests = server.received_requests().await.unwrap();
    let upload = requests
        .iter()
        .find(|r| r.url.path() == "/upload")
        .unwrap();
    let body = String::from_utf8_lossy(&upload.body);
    assert!(body.contains("name=\"file\""));
    assert!(body.contains("filename=\"hello.txt\""));
    assert!(body.contains("hello depot"));
}

#[tokio::test]
async fn test_upload_reports_sanitized_name() {
    let (server, client) = setup().await;
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("my report.txt");
    std::fs::write(&source, b"quarterly").unwrap();

    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/file_manager"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/file_manager"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let name = client.upload_file(&source).await.unwrap();
    assert_eq!(name.as_deref(), Some("my_report.txt"));
}

#[tokio::test]
async fn test_upload_redirected_back_is_rejected() {
    let (server, client) = setup().await;
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("hello.txt");
    std::fs::write(&source, b"hello depot").unwrap();

    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/upload"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<form></form>"))
        .mount(&server)
        .await;

    let result = client.upload_file(&source).await;

    assert!(
        matches!(result, Err(Error::UploadRejected { ref landed }) if landed == "/upload"),
        "got: {result:?}"
    );
}

#[tokio::test]
async fn test_upload_missing_local_file() {
    let (_server, client) = setup().await;

    let result = client
        .upload_file(std::path::Path::new("/definitely/not/here.txt"))
        .await;

    assert!(matches!(result, Err(Error::Io(_))), "got: {result:?}");
}

// ── Network statistics ──────────────────────────────────────────────

#[tokio::test]
async fn test_network_stats() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/network_stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_connections": 12,
            "active_connections": 1,
            "total_bytes_uploaded": 2048,
            "total_bytes_downloaded": 1024,
            "upload_rate": 150.5,
            "download_rate": 0,
            "connection_history": [{
                "client_id": "3f2a9c1e-8d4b-4a57-9e0f-1c2d3e4f5a6b",
                "ip_address": "10.0.0.7",
                "connection_time": 1_700_000_000.0,
                "bytes_uploaded": 2048,
                "bytes_downloaded": 1024,
                "active": true
            }]
        })))
        .mount(&server)
        .await;

    let stats = client.network_stats().await.unwrap();

    assert_eq!(stats.total_connections, 12);
    assert_eq!(stats.total_bytes_uploaded, 2048);
    assert_eq!(stats.connection_history.len(), 1);
    assert_eq!(stats.connection_history[0].ip_address, "10.0.0.7");
    assert!(stats.connection_history[0].active);
}

#[tokio::test]
async fn test_connection_refused_is_transient() {
    // Port 9 (discard) on localhost is closed on any sane test box.
    let client = DepotClient::from_reqwest("http://127.0.0.1:9", reqwest::Client::new()).unwrap();

    let err = client.network_stats().await.unwrap_err();

    assert!(err.is_transient(), "got: {err:?}");
}
