//! Bridges the wgdash-core client stream into the action channel.

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use wgdash_core::Controller;

use crate::action::Action;

/// Spawn the task that pumps store snapshots into the app loop.
///
/// Starts the controller's polling on entry and shuts it down on the
/// way out, so the poll loop never outlives the UI.
pub fn spawn_data_bridge(
    controller: Controller,
    action_tx: UnboundedSender<Action>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        controller.start().await;
        let mut clients = controller.clients();

        // Skip the initial snapshot when it is empty; sending it would
        // briefly blank the screen for nothing.
        let initial = clients.current().clone();
        if !initial.is_empty() {
            let _ = action_tx.send(Action::ClientsUpdated(initial));
        }

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                Some(snapshot) = clients.changed() => {
                    let _ = action_tx.send(Action::ClientsUpdated(snapshot));
                }
            }
        }

        controller.shutdown().await;
        debug!("data bridge stopped");
    })
}
