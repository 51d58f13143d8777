// ── Runtime connection configuration ──
//
// These types describe *how* to reach a wghttp backend. They carry
// connection tuning only and never touch disk. The TUI constructs a
// `ControllerConfig` and hands it in.

use std::time::Duration;

use url::Url;

/// Configuration for connecting to a single wghttp backend.
///
/// Built by the TUI layer, passed to `Controller` -- core never reads
/// config files.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Backend base URL (e.g., `http://localhost:3000`).
    pub url: Url,
    /// Request timeout.
    pub timeout: Duration,
    /// How often to re-fetch the client list. Zero disables polling.
    pub poll_interval: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:3000"
                .parse()
                .expect("default backend URL should parse"),
            timeout: Duration::from_secs(10),
            poll_interval: Duration::from_secs(1),
        }
    }
}
