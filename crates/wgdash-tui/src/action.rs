//! All possible UI actions. Actions are the sole mechanism for state
//! mutation.

use std::sync::Arc;

use wgdash_core::{Client, ClientId};

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// A toast notification.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }

    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }
}

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Focus ──────────────────────────────────────────────────────
    FocusNext,
    FocusTable,
    FocusCeiling,
    FocusAddForm,

    // ── Data Events (from the wgdash-core stream) ──────────────────
    ClientsUpdated(Arc<Vec<Arc<Client>>>),

    // ── Peer Commands ──────────────────────────────────────────────
    RequestCreateClient(String),
    RequestDeleteClient(ClientId),
    RequestDownloadConfig(ClientId),

    // ── Settings ───────────────────────────────────────────────────
    CeilingChanged(f64),

    // ── Notifications ──────────────────────────────────────────────
    Notify(Notification),
}
