//! Discovery service abstraction.
//!
//! This module defines the boundary to the external discovery daemon - the
//! component that advertises on mDNS, watches for peers, and performs the
//! link handshake. The client never talks to the network itself; it consumes
//! this trait.
//!
//! # Design
//!
//! The trait mirrors the daemon's surface:
//! - `subscribe()` installs the push-event subscription
//! - `enable()` activates discovery (the `enable_networking` command)
//! - `snapshot()` fetches a full device list (`get_available_connections`)
//!
//! The daemon does not replay: events fired before `subscribe()` are
//! permanently lost, which is why [`ConnectionsClient::start`] subscribes
//! before it enables.
//!
//! [`ConnectionsClient::start`]: crate::ConnectionsClient::start

mod mock;

pub use mock::MockDiscovery;

use async_trait::async_trait;
use fdrop_types::DeviceEvent;
use thiserror::Error;
use tokio::sync::mpsc;

/// Buffer size of the push-event channel returned by `subscribe()`.
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Errors from the discovery boundary.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Installing the event subscription failed.
    #[error("subscribe failed: {0}")]
    Subscribe(String),

    /// Activating the discovery layer failed.
    #[error("enable failed: {0}")]
    Enable(String),

    /// The snapshot command failed.
    #[error("snapshot failed: {0}")]
    Snapshot(String),
}

/// The external discovery daemon, seen from the client.
///
/// Implementations bridge to the actual host (a Tauri invoke/event bridge,
/// an IPC socket, the mock for testing).
#[async_trait]
pub trait DiscoveryService: Send + Sync {
    /// Install the push-event subscription.
    ///
    /// Events delivered by the daemon before this call are lost with no
    /// replay. The returned channel yields events in transport order.
    async fn subscribe(&self) -> Result<mpsc::Receiver<DeviceEvent>, DiscoveryError>;

    /// Activate the discovery layer. Fire-and-forget: no response beyond
    /// delivery of the command is consulted.
    async fn enable(&self) -> Result<(), DiscoveryError>;

    /// Fetch a full point-in-time device snapshot.
    ///
    /// Returns the raw JSON array of device records as the daemon produced
    /// it; the caller parses and validates it in full before applying.
    async fn snapshot(&self) -> Result<String, DiscoveryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DiscoveryError::Snapshot("daemon gone".into());
        assert_eq!(err.to_string(), "snapshot failed: daemon gone");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DiscoveryError>();
    }
}
