//! Device records and push events from the discovery boundary.

use serde::{Deserialize, Serialize};

use crate::wire::{DEVICE_DISCOVERED, DEVICE_LINKED, DEVICE_REMOVED};

/// A device record as the discovery daemon emits it.
///
/// This is the payload shape of all three push events and of each entry in a
/// `get_available_connections` snapshot. `name` and `linked` are required;
/// a snapshot entry missing either is a deserialization error, which fails
/// the whole refresh rather than being skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    /// The raw advertised service name. Unique per device; the registry key.
    pub name: String,
    /// Whether the link handshake has completed. Informational on
    /// `device-discovered` payloads, authoritative on `device-linked`.
    pub linked: bool,
    /// Peer platform, learned during the link handshake. Absent before
    /// linking; may still be absent after it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

impl DeviceRecord {
    /// A record for a device that has been discovered but not linked.
    pub fn discovered(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            linked: false,
            platform: None,
        }
    }

    /// A record for a device that has completed the link handshake.
    pub fn linked(name: impl Into<String>, platform: Option<String>) -> Self {
        Self {
            name: name.into(),
            linked: true,
            platform,
        }
    }
}

/// A push event from the discovery daemon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceEvent {
    /// A peer appeared on the local network.
    Discovered(DeviceRecord),
    /// A peer's advertisement expired or was withdrawn.
    Removed(DeviceRecord),
    /// The link handshake with a peer completed.
    Linked(DeviceRecord),
}

impl DeviceEvent {
    /// Build an event from a wire event name and its payload.
    ///
    /// Returns `None` for event names this layer does not consume, so a
    /// host-side bridge can route raw (event, payload) pairs without
    /// matching the strings itself.
    pub fn from_wire(event: &str, payload: DeviceRecord) -> Option<Self> {
        match event {
            DEVICE_DISCOVERED => Some(Self::Discovered(payload)),
            DEVICE_REMOVED => Some(Self::Removed(payload)),
            DEVICE_LINKED => Some(Self::Linked(payload)),
            _ => None,
        }
    }

    /// The wire event name this event arrived under.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Discovered(_) => DEVICE_DISCOVERED,
            Self::Removed(_) => DEVICE_REMOVED,
            Self::Linked(_) => DEVICE_LINKED,
        }
    }

    /// The device record carried by the event.
    pub fn record(&self) -> &DeviceRecord {
        match self {
            Self::Discovered(r) | Self::Removed(r) | Self::Linked(r) => r,
        }
    }
}
