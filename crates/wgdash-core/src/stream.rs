// ── Reactive client stream ──
//
// Subscription type for consuming client-list changes from the DataStore.

use std::sync::Arc;

use tokio::sync::watch;

use crate::model::Client;

/// A subscription to the client list.
///
/// Provides both point-in-time snapshot access and reactive change
/// notification via [`changed`](Self::changed).
pub struct ClientStream {
    current: Arc<Vec<Arc<Client>>>,
    receiver: watch::Receiver<Arc<Vec<Arc<Client>>>>,
}

impl ClientStream {
    pub(crate) fn new(receiver: watch::Receiver<Arc<Vec<Arc<Client>>>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// Get the snapshot captured at creation time.
    pub fn current(&self) -> &Arc<Vec<Arc<Client>>> {
        &self.current
    }

    /// Get the latest snapshot (may have changed since creation).
    pub fn latest(&self) -> Arc<Vec<Arc<Client>>> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next published snapshot.
    /// Returns `None` if the sender (`DataStore`) has been dropped.
    pub async fn changed(&mut self) -> Option<Arc<Vec<Arc<Client>>>> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }
}
