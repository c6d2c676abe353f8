//! Wire constants shared with the fdrop discovery daemon.
//!
//! Hosts that bridge daemon events into this crate must use these exact
//! strings; the daemon emits them verbatim.

/// The mDNS service type the discovery daemon advertises and browses.
pub const MDNS_SERVICE_TYPE: &str = "_fdrop._tcp.local.";

/// Marker separating a device's chosen name from the service suffix in an
/// advertised full name (e.g. `Bob._fdrop._tcp.local.`).
pub const SERVICE_SUFFIX: &str = "._fdrop";

/// Event emitted when a peer appears on the local network.
pub const DEVICE_DISCOVERED: &str = "device-discovered";

/// Event emitted when a peer's advertisement expires or is withdrawn.
pub const DEVICE_REMOVED: &str = "device-removed";

/// Event emitted when the link handshake with a peer completes.
pub const DEVICE_LINKED: &str = "device-linked";
