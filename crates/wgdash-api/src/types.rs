// Wire types for the wghttp REST API.
//
// Field names match the JSON keys the server emits; no renaming layer.

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

/// Server-assigned client identifier.
pub type ClientId = u64;

/// One client record as served by `GET /clients`.
///
/// `last_connected` is the number of seconds since the peer's latest
/// handshake *at fetch time*, not a wall-clock timestamp -- it is only as
/// fresh as the poll that produced it. `uploaded`/`downloaded` are
/// cumulative byte counters from the server's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRecord {
    pub id: ClientId,
    pub name: String,
    pub ip: Ipv4Addr,
    pub last_connected: u64,
    pub uploaded: u64,
    pub downloaded: u64,
}
