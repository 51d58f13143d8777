//! Reactive data layer between `wgdash-api` and the TUI.
//!
//! This crate owns the business logic, domain model, and reactive data
//! infrastructure for the wgdash workspace:
//!
//! - **[`Controller`]** -- Central facade managing the full lifecycle:
//!   [`start()`](Controller::start) spawns a cancellable background task
//!   that re-fetches the client list on a fixed interval, and the
//!   mutation methods ([`add_client`](Controller::add_client),
//!   [`remove_client`](Controller::remove_client),
//!   [`fetch_config`](Controller::fetch_config)) call straight through
//!   to the backend.
//!
//! - **[`DataStore`]** -- Lock-free reactive storage (`DashMap` +
//!   `tokio::sync::watch` channels). Each poll cycle lands as a single
//!   id-ordered snapshot, so the UI never observes a half-applied fetch.
//!
//! - **[`ClientStream`]** -- Subscription handle vended by the store.
//!   Exposes `current()` / `latest()` / `changed()` for reactive
//!   rendering.

pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::ControllerConfig;
pub use controller::Controller;
pub use error::CoreError;
pub use model::Client;
pub use store::DataStore;
pub use stream::ClientStream;
pub use wgdash_api::ClientId;
