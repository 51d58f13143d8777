// ── Controller facade ──
//
// Central entry point for the dashboard: owns the API client, the
// reactive store, and the background poll task's lifecycle.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use wgdash_api::{ClientId, TransportConfig, WgApiClient};

use crate::config::ControllerConfig;
use crate::error::CoreError;
use crate::model::Client;
use crate::store::DataStore;
use crate::stream::ClientStream;

/// Central facade over the wghttp backend and the reactive store.
///
/// Cloning is cheap (a single `Arc`); every clone shares the same store
/// and task lifecycle.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: ControllerConfig,
    api: WgApiClient,
    store: Arc<DataStore>,

    /// Parent token -- never cancelled, only used to derive children.
    cancel: CancellationToken,
    /// Child token for the current poll session -- cancelled on shutdown,
    /// replaced on restart (avoids permanent cancellation).
    cancel_child: Mutex<CancellationToken>,
    /// Handles for spawned background tasks, joined on shutdown.
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Controller {
    /// Build a controller from connection configuration.
    ///
    /// Fails only if the backend URL can't be turned into a transport;
    /// no network traffic happens here.
    pub fn new(config: ControllerConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig::new(config.url.as_str())?.with_timeout(config.timeout);
        let api = WgApiClient::new(&transport)?;

        let cancel = CancellationToken::new();
        let cancel_child = cancel.child_token();

        Ok(Self {
            inner: Arc::new(ControllerInner {
                config,
                api,
                store: Arc::new(DataStore::new()),
                cancel,
                cancel_child: Mutex::new(cancel_child),
                task_handles: Mutex::new(Vec::new()),
            }),
        })
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &Arc<DataStore> {
        &self.inner.store
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Spawn the background poll task.
    ///
    /// The first fetch happens one full interval after this call; until
    /// then the store stays empty. Call [`shutdown`](Self::shutdown)
    /// before calling this again, otherwise a second poller is spawned.
    pub async fn start(&self) {
        if self.inner.config.poll_interval.is_zero() {
            info!("client polling disabled (poll_interval = 0)");
            return;
        }

        // Fresh child token for this session (supports restart).
        let child = self.inner.cancel.child_token();
        *self.inner.cancel_child.lock().await = child.clone();

        let mut handles = self.inner.task_handles.lock().await;
        handles.push(tokio::spawn(client_poll_task(self.clone(), child)));
        info!(interval = ?self.inner.config.poll_interval, "client poll task started");
    }

    /// Stop background polling and wait for the poll task to exit.
    pub async fn shutdown(&self) {
        // Cancel the child token (not the parent -- allows restart).
        self.inner.cancel_child.lock().await.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        debug!("controller shut down");
    }

    // ── Data access ──────────────────────────────────────────────────

    /// Subscribe to client-list changes.
    pub fn clients(&self) -> ClientStream {
        self.inner.store.subscribe_clients()
    }

    // ── Operations ───────────────────────────────────────────────────

    /// Fetch the client list once and fold it into the store.
    ///
    /// Incoming rows are staged silently, ids the backend no longer
    /// reports are pruned, and the result is published as one snapshot.
    /// The poll task calls this every tick.
    pub async fn refresh_clients(&self) -> Result<(), CoreError> {
        let records = match self.inner.api.list_clients().await {
            Ok(records) => records,
            Err(e) => {
                // Connection blips are routine under 1s polling;
                // anything else deserves a louder line.
                if e.is_transient() {
                    debug!(error = %e, "client fetch failed");
                } else {
                    warn!(error = %e, "client fetch failed");
                }
                return Err(e.into());
            }
        };
        debug!(count = records.len(), "fetched client list");

        let col = &self.inner.store.clients;
        let incoming: HashSet<ClientId> = records.iter().map(|r| r.id).collect();
        for record in records {
            col.upsert_silent(Client::from(record));
        }

        let stale: Vec<ClientId> = col
            .ids()
            .into_iter()
            .filter(|id| !incoming.contains(id))
            .collect();
        for id in &stale {
            col.remove(*id);
        }

        // `remove` already published; otherwise publish the staged batch.
        if stale.is_empty() {
            col.flush();
        }
        Ok(())
    }

    /// Register a new peer. Returns the backend-assigned id.
    ///
    /// The new row reaches the store at the next poll cycle; there is no
    /// optimistic insert.
    pub async fn add_client(&self, name: &str) -> Result<ClientId, CoreError> {
        let id = self.inner.api.create_client(name).await?;
        info!(id, name, "client created");
        Ok(id)
    }

    /// Delete a peer. The row leaves the store at the next poll cycle;
    /// there is no optimistic removal.
    pub async fn remove_client(&self, id: ClientId) -> Result<(), CoreError> {
        match self.inner.api.delete_client(id).await {
            Ok(()) => {
                info!(id, "client deleted");
                Ok(())
            }
            Err(e) if e.is_not_found() => Err(CoreError::ClientNotFound { id }),
            Err(e) => Err(e.into()),
        }
    }

    /// Fetch a peer's tunnel configuration file contents.
    pub async fn fetch_config(&self, id: ClientId) -> Result<String, CoreError> {
        match self.inner.api.fetch_config(id).await {
            Ok(text) => Ok(text),
            Err(e) if e.is_not_found() => Err(CoreError::ClientNotFound { id }),
            Err(e) => Err(e.into()),
        }
    }
}

// ── Background tasks ─────────────────────────────────────────────────

/// Periodic client-list poll. Runs until cancelled.
async fn client_poll_task(controller: Controller, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(controller.inner.config.poll_interval);
    // A stalled backend must not trigger a burst of catch-up fetches.
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!("client poll task stopped");
                break;
            }
            _ = interval.tick() => {
                // Failures are logged in refresh_clients; the last
                // good snapshot stays in place and polling continues.
                let _ = controller.refresh_clients().await;
            }
        }
    }
}
