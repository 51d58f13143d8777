// Transport configuration for building reqwest::Client instances.
//
// Keeps the builder logic in one place so the API client and tests
// construct HTTP clients the same way.

use std::time::Duration;

use url::Url;

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Base URL of the wghttp server, e.g. `http://localhost:3000`.
    pub base_url: Url,
    /// Per-request timeout. A hung request must never stall the poll
    /// loop indefinitely.
    pub timeout: Duration,
}

impl TransportConfig {
    /// Create a config from a raw base URL string.
    pub fn new(base_url: &str) -> Result<Self, crate::Error> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            timeout: Duration::from_secs(10),
        })
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::Error> {
        Ok(reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("wgdash/", env!("CARGO_PKG_VERSION")))
            .build()?)
    }
}
