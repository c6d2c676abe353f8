//! # fdrop-types
//!
//! Boundary types for the fdrop peer discovery and transfer layer.
//!
//! This crate provides the types shared by all fdrop crates:
//! - [`DeviceRecord`], [`DeviceEvent`] - Device records as the discovery
//!   daemon emits them, and the push events built from them
//! - [`realname`] - Display-name derivation from an advertised service name
//! - [`TransferEvent`], [`classify`] - Typed transfer descriptors decoded
//!   from wire payloads
//! - [`TransferError`] - Classifier error taxonomy

#![warn(missing_docs)]
#![warn(clippy::all)]

mod device;
mod error;
mod name;
mod transfer;
pub mod wire;

pub use device::{DeviceEvent, DeviceRecord};
pub use error::TransferError;
pub use name::realname;
pub use transfer::{classify, FileManifest, Origin, TransferEvent, TransferKind, TransferPayload};
