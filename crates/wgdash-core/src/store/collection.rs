// ── Reactive client collection ──
//
// Lock-free concurrent storage with O(1) lookups and push-based
// change notification via `watch` channels.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::watch;

use wgdash_api::ClientId;

use crate::model::Client;

/// A lock-free, reactive collection of peers keyed by backend id.
///
/// Uses `DashMap` for O(1) concurrent lookups and `watch` channels for
/// push-based change notification. A poll cycle stages every incoming
/// record with [`upsert_silent`](Self::upsert_silent) and publishes one
/// combined snapshot with [`flush`](Self::flush), so subscribers see a
/// single change per cycle instead of one per row.
pub(crate) struct ClientCollection {
    /// Primary storage: backend id -> peer.
    items: DashMap<ClientId, Arc<Client>>,

    /// Version counter, bumped on every published snapshot.
    version: watch::Sender<u64>,

    /// Full snapshot ordered by id, rebuilt on publish.
    snapshot: watch::Sender<Arc<Vec<Arc<Client>>>>,
}

impl ClientCollection {
    pub(crate) fn new() -> Self {
        let (version, _) = watch::channel(0u64);
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));

        Self {
            items: DashMap::new(),
            version,
            snapshot,
        }
    }

    /// Insert or update a peer *without* publishing. Callers follow up
    /// with [`flush`](Self::flush) once the batch is staged.
    pub(crate) fn upsert_silent(&self, client: Client) {
        self.items.insert(client.id, Arc::new(client));
    }

    /// Remove a peer by id and publish. Returns the removed peer if it
    /// existed.
    pub(crate) fn remove(&self, id: ClientId) -> Option<Arc<Client>> {
        let removed = self.items.remove(&id).map(|(_, v)| v);
        if removed.is_some() {
            self.rebuild_snapshot();
            self.bump_version();
        }
        removed
    }

    /// Publish the current state, waking subscribers even when the set of
    /// peers is unchanged (their counters usually moved).
    pub(crate) fn flush(&self) {
        self.rebuild_snapshot();
        self.bump_version();
    }

    /// Look up a peer by backend id.
    pub(crate) fn get(&self, id: ClientId) -> Option<Arc<Client>> {
        self.items.get(&id).map(|r| Arc::clone(r.value()))
    }

    /// Get the current snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Arc<Vec<Arc<Client>>> {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes via a `watch::Receiver`.
    pub(crate) fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<Client>>>> {
        self.snapshot.subscribe()
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    /// Return all ids currently in the collection.
    pub(crate) fn ids(&self) -> Vec<ClientId> {
        self.items.iter().map(|r| *r.key()).collect()
    }

    /// Current version counter reading.
    #[allow(dead_code)]
    pub(crate) fn version(&self) -> u64 {
        *self.version.borrow()
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// Collect all peers into an id-ordered snapshot and broadcast it.
    fn rebuild_snapshot(&self) {
        let mut values: Vec<Arc<Client>> =
            self.items.iter().map(|r| Arc::clone(r.value())).collect();
        values.sort_by_key(|c| c.id);
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::new(values));
    }

    /// Increment the version counter.
    fn bump_version(&self) {
        self.version.send_modify(|v| *v += 1);
    }
}
