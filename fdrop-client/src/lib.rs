//! # fdrop-client
//!
//! Subscription facade over the fdrop connection registry.
//!
//! This is the crate applications embed. It owns a
//! [`ConnectionRegistry`](fdrop_core::ConnectionRegistry), drives it from a
//! pluggable [`DiscoveryService`], and exposes a read-only view plus a
//! [`refresh`](ConnectionsClient::refresh) command.
//!
//! ## Example
//!
//! ```ignore
//! use fdrop_client::{ConnectionsClient, MockDiscovery};
//!
//! let client = ConnectionsClient::new(MockDiscovery::new());
//!
//! // Subscribes to push events, then activates discovery. The order is
//! // fixed inside start(); events fired before the subscription would be
//! // lost with no replay.
//! client.start().await?;
//!
//! // Pull a full snapshot and merge it.
//! client.refresh().await?;
//!
//! for device in client.devices() {
//!     println!("{} linked={}", device.raw_name, device.linked());
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod discovery;

pub use client::{ClientError, ConnectionsClient};
pub use discovery::{DiscoveryError, DiscoveryService, MockDiscovery, EVENT_CHANNEL_CAPACITY};
