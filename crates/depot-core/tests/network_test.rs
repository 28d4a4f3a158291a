#![allow(clippy::unwrap_used)]
// Network monitor polling against a wiremock server.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use depot_api::DepotClient;
use depot_core::{BannerBoard, ConnectionTable, NetworkMonitor, Poller};

async fn setup() -> (MockServer, DepotClient, BannerBoard) {
    let server = MockServer::start().await;
    let client = DepotClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client, BannerBoard::new())
}

fn stats_body() -> serde_json::Value {
    let ids: Vec<String> = (0..3).map(|_| uuid::Uuid::new_v4().to_string()).collect();
    json!({
        "active_connections": 1,
        "total_connections": 3,
        "total_bytes_uploaded": 200,
        "total_bytes_downloaded": 100,
        "upload_rate": 2048.0,
        "download_rate": 512.0,
        "connection_history": [
            {"client_id": ids[0], "ip_address": "10.0.0.1", "connection_time": 10.0,
             "bytes_uploaded": 10, "bytes_downloaded": 0, "active": false},
            {"client_id": ids[1], "ip_address": "10.0.0.2", "connection_time": 30.0,
             "bytes_uploaded": 0, "bytes_downloaded": 100, "active": true},
            {"client_id": ids[2], "ip_address": "10.0.0.3", "connection_time": 20.0,
             "bytes_uploaded": 190, "bytes_downloaded": 0, "active": false}
        ]
    })
}

#[tokio::test]
async fn test_poll_updates_cards_table_and_chart() {
    let (server, client, banners) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/network_stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stats_body()))
        .mount(&server)
        .await;

    let mut monitor = NetworkMonitor::new();
    assert!(monitor.load_network_stats(&client, &banners).await);

    let cards = monitor.cards().unwrap();
    assert_eq!(cards.ratio, "2.00");
    assert_eq!(cards.upload_rate, "Rate: 2 KB/s");
    assert_eq!(cards.total_connections, "Total: 3");

    let ips: Vec<&str> = monitor
        .table()
        .rows()
        .iter()
        .map(|r| r.ip_address.as_str())
        .collect();
    assert_eq!(ips, vec!["10.0.0.2", "10.0.0.3", "10.0.0.1"]);
    assert_eq!(monitor.table().rows()[0].status_label(), "Active");

    assert_eq!(monitor.chart().series().len(), 1);
    assert_eq!(monitor.chart().series().uploaded().next(), Some(200));
}

#[tokio::test]
async fn test_failed_poll_retains_previous_display() {
    let (server, client, banners) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/network_stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stats_body()))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/network_stats"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut monitor = NetworkMonitor::new();
    assert!(monitor.load_network_stats(&client, &banners).await);
    assert!(!monitor.load_network_stats(&client, &banners).await);

    assert_eq!(monitor.cards().unwrap().ratio, "2.00");
    assert_eq!(monitor.chart().series().len(), 1);
    assert_eq!(banners.len(), 1);
}

#[tokio::test]
async fn test_empty_history_renders_placeholder() {
    let (server, client, banners) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/network_stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let mut monitor = NetworkMonitor::new();
    monitor.load_network_stats(&client, &banners).await;

    assert_eq!(monitor.table(), &ConnectionTable::NoHistory);
    assert_eq!(monitor.cards().unwrap().ratio, "N/A");
}

#[tokio::test]
async fn test_poller_drives_repeated_fetches() {
    let (server, client, banners) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/network_stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stats_body()))
        .mount(&server)
        .await;

    let monitor = Arc::new(tokio::sync::Mutex::new(NetworkMonitor::new()));
    let shared = Arc::clone(&monitor);
    let poller = Poller::start(Duration::from_millis(50), move || {
        let monitor = Arc::clone(&shared);
        let client = client.clone();
        let banners = banners.clone();
        async move {
            monitor.lock().await.load_network_stats(&client, &banners).await;
        }
    });

    tokio::time::sleep(Duration::from_millis(180)).await;
    poller.stop();

    let samples = monitor.lock().await.chart().series().len();
    assert!(samples >= 2, "expected repeated polls, got {samples}");
    assert!(!poller.is_running());
}
