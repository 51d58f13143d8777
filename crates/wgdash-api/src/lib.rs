// wgdash-api: Async Rust client for the wghttp WireGuard management API

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::WgApiClient;
pub use error::Error;
pub use transport::TransportConfig;
pub use types::{ClientId, ClientRecord};
