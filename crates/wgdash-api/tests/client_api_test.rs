#![allow(clippy::unwrap_used)]
// Integration tests for `WgApiClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wgdash_api::{Error, WgApiClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, WgApiClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = WgApiClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

fn sample_clients() -> serde_json::Value {
    json!([
        {
            "id": 1,
            "name": "laptop",
            "ip": "10.0.0.3",
            "last_connected": 45,
            "uploaded": 1536,
            "downloaded": 1073741824u64
        },
        {
            "id": 2,
            "name": "phone",
            "ip": "10.0.0.4",
            "last_connected": 90000,
            "uploaded": 0,
            "downloaded": 1048576
        }
    ])
}

// ── Listing ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_clients() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/clients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_clients()))
        .mount(&server)
        .await;

    let clients = client.list_clients().await.unwrap();

    assert_eq!(clients.len(), 2);
    assert_eq!(clients[0].id, 1);
    assert_eq!(clients[0].name, "laptop");
    assert_eq!(clients[0].ip.to_string(), "10.0.0.3");
    assert_eq!(clients[0].last_connected, 45);
    assert_eq!(clients[0].uploaded, 1536);
    assert_eq!(clients[0].downloaded, 1_073_741_824);
    assert_eq!(clients[1].name, "phone");
}

#[tokio::test]
async fn test_list_clients_empty() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/clients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let clients = client.list_clients().await.unwrap();
    assert!(clients.is_empty());
}

#[tokio::test]
async fn test_list_clients_malformed_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/clients"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = client.list_clients().await;
    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_malformed_body_preview_keeps_char_boundaries() {
    // A proxy answering 200 with an HTML page can put a multi-byte
    // character across the 200-char preview cut; the error must carry
    // a cleanly truncated preview, not split the character.
    let (server, client) = setup().await;

    let payload = format!("{}étail", "a".repeat(199));
    Mock::given(method("GET"))
        .and(path("/clients"))
        .respond_with(ResponseTemplate::new(200).set_body_string(payload))
        .mount(&server)
        .await;

    let err = client.list_clients().await.unwrap_err();
    match err {
        Error::Deserialization { body, .. } => {
            assert_eq!(body.chars().count(), 200);
            assert!(body.ends_with('é'), "boundary char split: {body:?}");
            assert!(!body.contains("tail"));
        }
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_list_clients_server_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/clients"))
        .respond_with(ResponseTemplate::new(400).set_body_string("no such device"))
        .mount(&server)
        .await;

    let result = client.list_clients().await;
    match result {
        Err(Error::Status { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "no such device");
        }
        other => panic!("expected Status error, got: {other:?}"),
    }
}

// ── Creation ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_client_returns_id() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/clients"))
        .and(body_json(json!({ "name": "laptop" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(7)))
        .mount(&server)
        .await;

    let id = client.create_client("laptop").await.unwrap();
    assert_eq!(id, 7);
}

#[tokio::test]
async fn test_create_client_empty_name_passes_through() {
    // The form performs no validation; an empty name reaches the server as-is.
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/clients"))
        .and(body_json(json!({ "name": "" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(0)))
        .mount(&server)
        .await;

    let id = client.create_client("").await.unwrap();
    assert_eq!(id, 0);
}

#[tokio::test]
async fn test_create_client_server_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/clients"))
        .respond_with(ResponseTemplate::new(500).set_body_string("subnet exhausted"))
        .mount(&server)
        .await;

    let result = client.create_client("laptop").await;
    assert!(
        matches!(result, Err(Error::Status { status: 500, .. })),
        "expected Status error, got: {result:?}"
    );
}

// ── Deletion ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_delete_client() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/clients/7"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.delete_client(7).await.unwrap();
}

#[tokio::test]
async fn test_delete_client_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/clients/99"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no client 99"))
        .mount(&server)
        .await;

    let err = client.delete_client(99).await.unwrap_err();
    assert!(err.is_not_found(), "expected not-found, got: {err:?}");
}

// ── Config download ─────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_config_returns_text() {
    let (server, client) = setup().await;

    let conf = "[Interface]\nAddress = 10.0.0.3/32\n\n[Peer]\nAllowedIPs = 0.0.0.0/0\n";
    Mock::given(method("GET"))
        .and(path("/config/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(conf))
        .mount(&server)
        .await;

    let body = client.fetch_config(1).await.unwrap();
    assert_eq!(body, conf);
}

// ── Error classification ────────────────────────────────────────────

#[tokio::test]
async fn test_connect_errors_classify_as_transient() {
    // A refused connection is the kind of failure polling rides out.
    // Port 1 (tcpmux) never has a listener.
    let base_url = Url::parse("http://127.0.0.1:1/").unwrap();
    let client = WgApiClient::with_client(reqwest::Client::new(), base_url);

    let err = client.list_clients().await.unwrap_err();
    assert!(
        matches!(err, Error::Transport(_)),
        "expected Transport error, got: {err:?}"
    );
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_status_errors_are_not_transient() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/clients"))
        .respond_with(ResponseTemplate::new(500).set_body_string("wg: device gone"))
        .mount(&server)
        .await;

    let err = client.list_clients().await.unwrap_err();
    assert!(!err.is_transient());
}

// ── Base URL handling ───────────────────────────────────────────────

#[tokio::test]
async fn test_base_url_with_path_prefix() {
    // A reverse-proxied deployment like http://host/wg must keep its prefix.
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/wg", server.uri())).unwrap();
    let client = WgApiClient::with_client(reqwest::Client::new(), base_url);

    Mock::given(method("GET"))
        .and(path("/wg/clients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    client.list_clients().await.unwrap();
}
