//! Controller integration tests against a mock wghttp backend.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wgdash_core::{Controller, ControllerConfig, CoreError};

/// Fast-polling controller pointed at a fresh mock server.
async fn setup(poll_interval: Duration) -> (MockServer, Controller) {
    let server = MockServer::start().await;
    let config = ControllerConfig {
        url: server.uri().parse().unwrap(),
        timeout: Duration::from_secs(5),
        poll_interval,
    };
    let controller = Controller::new(config).unwrap();
    (server, controller)
}

fn sample_clients() -> serde_json::Value {
    json!([
        {
            "id": 1,
            "name": "alice",
            "ip": "10.8.0.2",
            "last_connected": 42,
            "uploaded": 1024,
            "downloaded": 4096
        },
        {
            "id": 2,
            "name": "bob",
            "ip": "10.8.0.3",
            "last_connected": 120,
            "uploaded": 0,
            "downloaded": 0
        }
    ])
}

async fn mount_clients(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/clients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn poll_task_populates_store() {
    let (server, controller) = setup(Duration::from_millis(50)).await;
    mount_clients(&server, sample_clients()).await;

    let mut stream = controller.clients();
    assert!(stream.current().is_empty());

    controller.start().await;
    let snap = tokio::time::timeout(Duration::from_secs(2), stream.changed())
        .await
        .expect("poll should publish within 2s")
        .expect("store should be alive");

    assert_eq!(snap.len(), 2);
    assert_eq!(snap[0].id, 1);
    assert_eq!(snap[0].name, "alice");
    assert_eq!(snap[0].ip, std::net::Ipv4Addr::new(10, 8, 0, 2));
    assert_eq!(snap[0].last_connected_secs, 42);
    assert_eq!(snap[0].uploaded_bytes, 1024);
    assert_eq!(snap[0].downloaded_bytes, 4096);
    assert_eq!(snap[1].name, "bob");

    controller.shutdown().await;
}

#[tokio::test]
async fn shutdown_stops_polling() {
    let (server, controller) = setup(Duration::from_millis(50)).await;
    mount_clients(&server, sample_clients()).await;

    let mut stream = controller.clients();
    controller.start().await;
    tokio::time::timeout(Duration::from_secs(2), stream.changed())
        .await
        .expect("poll should publish within 2s")
        .expect("store should be alive");

    controller.shutdown().await;
    let requests_at_shutdown = server.received_requests().await.unwrap().len();

    // Several intervals worth of quiet.
    tokio::time::sleep(Duration::from_millis(200)).await;
    let requests_after = server.received_requests().await.unwrap().len();
    assert_eq!(requests_after, requests_at_shutdown);
}

#[tokio::test]
async fn poll_errors_keep_last_snapshot() {
    let (server, controller) = setup(Duration::from_millis(50)).await;
    mount_clients(&server, sample_clients()).await;

    let mut stream = controller.clients();
    controller.start().await;
    tokio::time::timeout(Duration::from_secs(2), stream.changed())
        .await
        .expect("poll should publish within 2s")
        .expect("store should be alive");

    // Backend starts failing; the table must not go blank.
    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/clients"))
        .respond_with(ResponseTemplate::new(500).set_body_string("wg: device gone"))
        .mount(&server)
        .await;

    tokio::time::sleep(Duration::from_millis(200)).await;
    let snap = stream.latest();
    assert_eq!(snap.len(), 2);
    assert_eq!(snap[0].name, "alice");

    controller.shutdown().await;
}

#[tokio::test]
async fn poll_survives_malformed_body() {
    let (server, controller) = setup(Duration::from_millis(50)).await;
    mount_clients(&server, sample_clients()).await;

    let mut stream = controller.clients();
    controller.start().await;
    tokio::time::timeout(Duration::from_secs(2), stream.changed())
        .await
        .expect("poll should publish within 2s")
        .expect("store should be alive");

    // A misrouted URL can answer 200 with an HTML page, multi-byte
    // characters straddling the error-preview cut included.
    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/clients"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!("{}é", "a".repeat(199))))
        .mount(&server)
        .await;

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(stream.latest().len(), 2, "snapshot should survive garbage");

    // The backend recovers; the still-running poll task must pick it up.
    server.reset().await;
    mount_clients(
        &server,
        json!([{
            "id": 3,
            "name": "carol",
            "ip": "10.8.0.4",
            "last_connected": 5,
            "uploaded": 10,
            "downloaded": 20
        }]),
    )
    .await;

    let snap = tokio::time::timeout(Duration::from_secs(2), stream.changed())
        .await
        .expect("poll should resume within 2s")
        .expect("store should be alive");
    assert_eq!(snap.len(), 1);
    assert_eq!(snap[0].name, "carol");

    controller.shutdown().await;
}

#[tokio::test]
async fn manual_refresh_replaces_and_prunes() {
    let (server, controller) = setup(Duration::ZERO).await;
    mount_clients(&server, sample_clients()).await;

    controller.refresh_clients().await.unwrap();
    assert_eq!(controller.store().client_count(), 2);

    // Backend drops alice; the next refresh prunes her row.
    server.reset().await;
    mount_clients(
        &server,
        json!([
            {
                "id": 2,
                "name": "bob",
                "ip": "10.8.0.3",
                "last_connected": 121,
                "uploaded": 10,
                "downloaded": 20
            }
        ]),
    )
    .await;

    controller.refresh_clients().await.unwrap();
    let snap = controller.store().clients_snapshot();
    assert_eq!(snap.len(), 1);
    assert_eq!(snap[0].id, 2);
    assert_eq!(snap[0].uploaded_bytes, 10);
}

#[tokio::test]
async fn poll_interval_zero_disables_polling() {
    let (server, controller) = setup(Duration::ZERO).await;
    mount_clients(&server, sample_clients()).await;

    controller.start().await;
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert!(server.received_requests().await.unwrap().is_empty());

    controller.shutdown().await;
}

#[tokio::test]
async fn mutations_round_trip_through_backend() {
    let (server, controller) = setup(Duration::ZERO).await;

    Mock::given(method("POST"))
        .and(path("/clients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(7)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/config/7"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("[Interface]\nPrivateKey = abc\n"),
        )
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/clients/7"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let id = controller.add_client("laptop").await.unwrap();
    assert_eq!(id, 7);

    let config = controller.fetch_config(id).await.unwrap();
    assert!(config.contains("PrivateKey"));

    controller.remove_client(id).await.unwrap();
}

#[tokio::test]
async fn remove_client_maps_missing_peer() {
    let (server, controller) = setup(Duration::ZERO).await;

    Mock::given(method("DELETE"))
        .and(path("/clients/9"))
        .respond_with(ResponseTemplate::new(404).set_body_string("client not found"))
        .mount(&server)
        .await;

    let err = controller.remove_client(9).await.unwrap_err();
    assert!(matches!(err, CoreError::ClientNotFound { id: 9 }));
}
