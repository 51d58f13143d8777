// ── Central reactive data store ──
//
// Thread-safe, lock-free storage for the dashboard's client list.
// Mutations are broadcast to subscribers via `watch` channels.

use std::sync::Arc;

use wgdash_api::ClientId;

use super::collection::ClientCollection;
use crate::model::Client;
use crate::stream::ClientStream;

/// Central reactive store for dashboard state.
///
/// Thread-safe and lock-free: all reads are wait-free, writes use
/// fine-grained per-shard locks within `DashMap`. Every poll cycle
/// publishes one combined snapshot to subscribers.
pub struct DataStore {
    pub(crate) clients: ClientCollection,
}

impl DataStore {
    pub fn new() -> Self {
        Self {
            clients: ClientCollection::new(),
        }
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    /// Current client list, ordered by backend id (cheap `Arc` clone).
    pub fn clients_snapshot(&self) -> Arc<Vec<Arc<Client>>> {
        self.clients.snapshot()
    }

    // ── Single-entity lookups ────────────────────────────────────────

    pub fn client_by_id(&self, id: ClientId) -> Option<Arc<Client>> {
        self.clients.get(id)
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    /// Subscribe to client-list changes. The stream yields one full
    /// ordered snapshot per poll cycle.
    pub fn subscribe_clients(&self) -> ClientStream {
        ClientStream::new(self.clients.subscribe())
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}
