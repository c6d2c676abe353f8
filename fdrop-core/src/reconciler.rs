//! Applies discovery push events to the registry.
//!
//! Pure dispatch, no I/O: the owning layer (fdrop-client) feeds events in
//! the order the transport delivers them and decides what to do with a
//! [`RegistryError::NotFound`] - log it and drop the event, never crash.

use fdrop_types::DeviceEvent;

use crate::registry::{ConnectionRegistry, RegistryError};

/// Whether applying an event changed the registry.
///
/// Tells the owning layer whether observers need notifying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The registry changed.
    Changed,
    /// The event was a no-op (re-announcement, removal of an unknown
    /// identity).
    Unchanged,
}

/// Applies push events to a [`ConnectionRegistry`] under the merge policy.
#[derive(Debug, Default)]
pub struct Reconciler;

impl Reconciler {
    /// Apply one event.
    ///
    /// - `Discovered` inserts an unlinked record; the payload's `linked` and
    ///   `platform` fields are informational at discovery time and ignored
    /// - `Removed` deletes the record if present
    /// - `Linked` marks the record linked with the payload's platform;
    ///   an unknown identity is a `NotFound`, propagated unapplied
    pub fn apply(
        registry: &mut ConnectionRegistry,
        event: DeviceEvent,
    ) -> Result<Applied, RegistryError> {
        let changed = match event {
            DeviceEvent::Discovered(record) => registry.upsert_discovered(record.name),
            DeviceEvent::Removed(record) => registry.remove(&record.name),
            DeviceEvent::Linked(record) => {
                registry.mark_linked(&record.name, record.platform)?;
                true
            }
        };
        Ok(if changed {
            Applied::Changed
        } else {
            Applied::Unchanged
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fdrop_types::DeviceRecord;

    const BOB: &str = "Bob._fdrop._tcp.local.";

    fn discovered(name: &str) -> DeviceEvent {
        DeviceEvent::Discovered(DeviceRecord::discovered(name))
    }

    #[test]
    fn discovery_then_link_then_removal() {
        let mut registry = ConnectionRegistry::new();

        let applied = Reconciler::apply(&mut registry, discovered(BOB)).unwrap();
        assert_eq!(applied, Applied::Changed);

        let applied = Reconciler::apply(
            &mut registry,
            DeviceEvent::Linked(DeviceRecord::linked(BOB, Some("macOS".into()))),
        )
        .unwrap();
        assert_eq!(applied, Applied::Changed);
        assert_eq!(registry.get(BOB).unwrap().platform(), Some("macOS"));

        let applied = Reconciler::apply(
            &mut registry,
            DeviceEvent::Removed(DeviceRecord::discovered(BOB)),
        )
        .unwrap();
        assert_eq!(applied, Applied::Changed);
        assert!(registry.is_empty());
    }

    #[test]
    fn reannouncement_is_unchanged() {
        let mut registry = ConnectionRegistry::new();

        Reconciler::apply(&mut registry, discovered(BOB)).unwrap();
        let applied = Reconciler::apply(&mut registry, discovered(BOB)).unwrap();

        assert_eq!(applied, Applied::Unchanged);
    }

    #[test]
    fn discovery_payload_link_fields_are_informational() {
        let mut registry = ConnectionRegistry::new();

        // A discovery payload claiming linked state must not be believed.
        Reconciler::apply(
            &mut registry,
            DeviceEvent::Discovered(DeviceRecord::linked(BOB, Some("macOS".into()))),
        )
        .unwrap();

        assert!(!registry.get(BOB).unwrap().linked());
    }

    #[test]
    fn link_for_unknown_identity_propagates_not_found() {
        let mut registry = ConnectionRegistry::new();

        let err = Reconciler::apply(
            &mut registry,
            DeviceEvent::Linked(DeviceRecord::linked(BOB, None)),
        )
        .unwrap_err();

        assert_eq!(err, RegistryError::NotFound(BOB.to_string()));
        assert!(registry.is_empty());
    }

    #[test]
    fn removal_of_unknown_identity_is_unchanged() {
        let mut registry = ConnectionRegistry::new();

        let applied = Reconciler::apply(
            &mut registry,
            DeviceEvent::Removed(DeviceRecord::discovered(BOB)),
        )
        .unwrap();

        assert_eq!(applied, Applied::Unchanged);
    }
}
