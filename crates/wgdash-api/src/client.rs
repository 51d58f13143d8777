// Hand-crafted async HTTP client for the wghttp REST API.
//
// Endpoints: GET /clients, POST /clients, DELETE /clients/:id,
// GET /config/:id. No authentication -- wghttp exposes none.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::transport::TransportConfig;
use crate::types::{ClientId, ClientRecord};

/// Async client for the wghttp server.
///
/// Cheap to clone per request via `Arc` in callers; internally reqwest's
/// `Client` is already reference-counted.
#[derive(Debug, Clone)]
pub struct WgApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl WgApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a transport config.
    pub fn new(transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        let base_url = normalize_base_url(transport.base_url.clone());
        Ok(Self { http, base_url })
    }

    /// Wrap an existing `reqwest::Client` (used by tests).
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url: normalize_base_url(base_url),
        }
    }

    /// The server this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"clients/3"`) onto the base URL.
    fn url(&self, path: &str) -> Url {
        // base_url always ends with `/`, so joining relative paths works.
        self.base_url
            .join(path)
            .expect("path should be a valid relative URL")
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path);
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        handle_response(resp).await
    }

    async fn get_text(&self, path: &str) -> Result<String, Error> {
        let url = self.url(path);
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        handle_text(resp).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path);
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        handle_response(resp).await
    }

    async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path);
        debug!("DELETE {url}");

        let resp = self.http.delete(url).send().await?;
        handle_empty(resp).await
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Fetch the full client collection.
    pub async fn list_clients(&self) -> Result<Vec<ClientRecord>, Error> {
        self.get("clients").await
    }

    /// Create a client with the given name. Returns the new client's id.
    ///
    /// The server accepts any name, including an empty one.
    pub async fn create_client(&self, name: &str) -> Result<ClientId, Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            name: &'a str,
        }

        self.post("clients", &Body { name }).await
    }

    /// Delete the client with the given id.
    pub async fn delete_client(&self, id: ClientId) -> Result<(), Error> {
        self.delete(&format!("clients/{id}")).await
    }

    /// Fetch the client's WireGuard configuration file as text.
    pub async fn fetch_config(&self, id: ClientId) -> Result<String, Error> {
        self.get_text(&format!("config/{id}")).await
    }
}

/// Ensure the base URL path ends with `/` so relative joins append
/// instead of replacing the last segment.
fn normalize_base_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

// ── Response handling ────────────────────────────────────────────────

async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let status = resp.status();
    if status.is_success() {
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            // Truncate by chars, not bytes: a byte offset can land
            // inside a multi-byte character.
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: preview,
            }
        })
    } else {
        Err(parse_error(status, resp).await)
    }
}

async fn handle_text(resp: reqwest::Response) -> Result<String, Error> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp.text().await?)
    } else {
        Err(parse_error(status, resp).await)
    }
}

async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
    let status = resp.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(parse_error(status, resp).await)
    }
}

async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
    // wghttp error bodies are plain-text messages from the server side.
    let raw = resp.text().await.unwrap_or_default();
    Error::Status {
        status: status.as_u16(),
        message: if raw.is_empty() {
            status.to_string()
        } else {
            raw
        },
    }
}
