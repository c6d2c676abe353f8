//! # fdrop-core
//!
//! Pure reconciliation logic for the fdrop connection registry.
//!
//! This crate has no I/O and no async. It provides:
//! - [`ConnectionRegistry`] - the authoritative map from device identity to
//!   connection state
//! - [`Reconciler`] - applies discovery push events to the registry under
//!   the merge policy
//!
//! The actual event delivery and snapshot fetching are performed by
//! fdrop-client, not by this crate. This enables instant unit testing
//! without mocks.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod reconciler;
mod registry;

pub use reconciler::{Applied, Reconciler};
pub use registry::{ConnectionRecord, ConnectionRegistry, LinkState, RegistryError};
