// ── Client domain types ──

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

use wgdash_api::{ClientId, ClientRecord};

/// The canonical peer type shown in the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    /// Human-readable peer name, as registered on creation.
    pub name: String,
    /// Tunnel-internal address assigned by the backend.
    pub ip: Ipv4Addr,
    /// Seconds since the last handshake, *as of the fetch*. This is a
    /// point-in-time reading and does not advance between polls.
    pub last_connected_secs: u64,
    pub uploaded_bytes: u64,
    pub downloaded_bytes: u64,
}

impl From<ClientRecord> for Client {
    fn from(r: ClientRecord) -> Self {
        Self {
            id: r.id,
            name: r.name,
            ip: r.ip,
            last_connected_secs: r.last_connected,
            uploaded_bytes: r.uploaded,
            downloaded_bytes: r.downloaded,
        }
    }
}
