//! The connection registry - the single authoritative picture of known
//! devices and their link state.
//!
//! Two unordered sources feed the registry: live push events and on-demand
//! full snapshots. The merge policy is asymmetric on purpose: incremental
//! events are authoritative, snapshot data is advisory for new entries only.
//! Once a device is linked, neither a rediscovery nor a stale snapshot may
//! regress it; only an explicit removal event deletes a record.

use std::collections::HashMap;

use fdrop_types::DeviceRecord;
use thiserror::Error;

/// Errors from registry operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A link was reported for an identity the registry has never seen.
    ///
    /// The discovery layer promises a `device-linked` event is never
    /// delivered before the corresponding `device-discovered` for an
    /// identity still present, so this indicates an ordering fault upstream
    /// (or a race with a removal). The caller logs and drops the event.
    #[error("no record for device {0:?}")]
    NotFound(String),
}

/// Link state of a known device.
///
/// Platform lives inside the `Linked` variant because it is learned only
/// during the link handshake; a record with a platform but no link cannot
/// be constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkState {
    /// Reachable on the local network, handshake not completed.
    Discovered,
    /// Trust handshake completed.
    Linked {
        /// Peer platform reported during the handshake, if any.
        platform: Option<String>,
    },
}

/// One known device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionRecord {
    /// The raw advertised service name (the registry key).
    pub raw_name: String,
    /// Link state. Monotonic within a session: never regresses from
    /// `Linked` back to `Discovered` except by removal and rediscovery.
    pub link: LinkState,
}

impl ConnectionRecord {
    /// Whether the link handshake has completed.
    pub fn linked(&self) -> bool {
        matches!(self.link, LinkState::Linked { .. })
    }

    /// The peer platform, if linked and reported.
    pub fn platform(&self) -> Option<&str> {
        match &self.link {
            LinkState::Linked { platform } => platform.as_deref(),
            LinkState::Discovered => None,
        }
    }
}

/// The authoritative in-memory map from device identity to connection state.
///
/// Owned by one long-lived context; all mutation goes through the
/// [`Reconciler`](crate::Reconciler) or a snapshot merge. Each operation
/// applies its full set of field changes in one step, so an observer holding
/// read access between operations never sees a torn record. Iteration order
/// carries no meaning.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    devices: HashMap<String, ConnectionRecord>,
    version: u64,
}

impl ConnectionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a discovery announcement.
    ///
    /// Inserts an unlinked record if the identity is new and returns true.
    /// If a record already exists it is left entirely untouched - a
    /// re-announcement of an already-linked peer must not regress its link
    /// state - and false is returned.
    pub fn upsert_discovered(&mut self, raw_name: impl Into<String>) -> bool {
        let raw_name = raw_name.into();
        if self.devices.contains_key(&raw_name) {
            return false;
        }
        self.devices.insert(
            raw_name.clone(),
            ConnectionRecord {
                raw_name,
                link: LinkState::Discovered,
            },
        );
        self.version += 1;
        true
    }

    /// Delete a record.
    ///
    /// Removing an unknown or already-removed identity is expected under a
    /// race with a refresh; it is a no-op, not an error. Returns whether a
    /// record was actually removed.
    pub fn remove(&mut self, identity: &str) -> bool {
        let removed = self.devices.remove(identity).is_some();
        if removed {
            self.version += 1;
        }
        removed
    }

    /// Mark a device as linked, recording its platform.
    ///
    /// Fails with [`RegistryError::NotFound`] if the identity has no record;
    /// the registry never fabricates a record for a link event, because that
    /// would mask an ordering violation upstream. On failure the registry is
    /// unchanged.
    pub fn mark_linked(
        &mut self,
        identity: &str,
        platform: Option<String>,
    ) -> Result<(), RegistryError> {
        let record = self
            .devices
            .get_mut(identity)
            .ok_or_else(|| RegistryError::NotFound(identity.to_string()))?;
        record.link = LinkState::Linked { platform };
        self.version += 1;
        Ok(())
    }

    /// Reconcile a full external snapshot against current state.
    ///
    /// Snapshot data is advisory for new entries only:
    /// - an absent identity is inserted with the link state the snapshot
    ///   carries (platform is honoured only on linked entries; on unlinked
    ///   entries it is informational and ignored)
    /// - a present record is never downgraded: a stale `linked: false` or a
    ///   missing platform in the snapshot leaves a linked record as it is
    /// - an unlinked record may be upgraded by a linked snapshot entry
    /// - identities absent from the snapshot are never removed; a snapshot
    ///   gap may just be a timing race, and removal is driven exclusively by
    ///   explicit removal events
    ///
    /// Returns the number of records inserted or upgraded. Repeated merges
    /// of the same snapshot are idempotent.
    pub fn snapshot_merge(&mut self, records: Vec<DeviceRecord>) -> usize {
        let mut changed = 0;
        for record in records {
            let link = if record.linked {
                LinkState::Linked {
                    platform: record.platform,
                }
            } else {
                LinkState::Discovered
            };
            match self.devices.get_mut(&record.name) {
                None => {
                    self.devices.insert(
                        record.name.clone(),
                        ConnectionRecord {
                            raw_name: record.name,
                            link,
                        },
                    );
                    changed += 1;
                }
                Some(existing) => {
                    // Never weaken what live events already established.
                    if !existing.linked() && matches!(link, LinkState::Linked { .. }) {
                        existing.link = link;
                        changed += 1;
                    }
                }
            }
        }
        if changed > 0 {
            self.version += 1;
        }
        changed
    }

    /// Look up a record by identity.
    pub fn get(&self, identity: &str) -> Option<&ConnectionRecord> {
        self.devices.get(identity)
    }

    /// Whether an identity is known.
    pub fn contains(&self, identity: &str) -> bool {
        self.devices.contains_key(identity)
    }

    /// Iterate over all records. Order carries no meaning.
    pub fn iter(&self) -> impl Iterator<Item = &ConnectionRecord> {
        self.devices.values()
    }

    /// Number of known devices.
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Whether no devices are known.
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Change counter, bumped once per effective mutation.
    ///
    /// Lets a presentation layer poll for changes without diffing records.
    pub fn version(&self) -> u64 {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOB: &str = "Bob._fdrop._tcp.local.";
    const ALICE: &str = "Alice._fdrop._tcp.local.";

    #[test]
    fn discovery_inserts_unlinked() {
        let mut registry = ConnectionRegistry::new();

        assert!(registry.upsert_discovered(BOB));

        let record = registry.get(BOB).unwrap();
        assert!(!record.linked());
        assert_eq!(record.platform(), None);
    }

    #[test]
    fn discovery_is_idempotent() {
        let mut registry = ConnectionRegistry::new();

        registry.upsert_discovered(BOB);
        let version = registry.version();
        assert!(!registry.upsert_discovered(BOB));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.version(), version);
    }

    #[test]
    fn rediscovery_does_not_regress_link() {
        let mut registry = ConnectionRegistry::new();
        registry.upsert_discovered(BOB);
        registry.mark_linked(BOB, Some("macOS".into())).unwrap();

        registry.upsert_discovered(BOB);

        let record = registry.get(BOB).unwrap();
        assert!(record.linked());
        assert_eq!(record.platform(), Some("macOS"));
    }

    #[test]
    fn mark_linked_sets_platform() {
        let mut registry = ConnectionRegistry::new();
        registry.upsert_discovered(BOB);

        registry.mark_linked(BOB, Some("Linux".into())).unwrap();

        let record = registry.get(BOB).unwrap();
        assert!(record.linked());
        assert_eq!(record.platform(), Some("Linux"));
    }

    #[test]
    fn mark_linked_unknown_identity_fails_and_changes_nothing() {
        let mut registry = ConnectionRegistry::new();
        registry.upsert_discovered(ALICE);
        let version = registry.version();

        let err = registry.mark_linked(BOB, None).unwrap_err();

        assert_eq!(err, RegistryError::NotFound(BOB.to_string()));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.version(), version);
    }

    #[test]
    fn remove_deletes_record() {
        let mut registry = ConnectionRegistry::new();
        registry.upsert_discovered(BOB);

        assert!(registry.remove(BOB));

        assert!(registry.is_empty());
    }

    #[test]
    fn remove_unknown_is_a_noop() {
        let mut registry = ConnectionRegistry::new();
        let version = registry.version();

        assert!(!registry.remove(BOB));
        assert_eq!(registry.version(), version);
    }

    #[test]
    fn snapshot_adds_unseen_devices() {
        let mut registry = ConnectionRegistry::new();

        let changed = registry.snapshot_merge(vec![
            DeviceRecord::discovered(ALICE),
            DeviceRecord::linked(BOB, Some("Windows".into())),
        ]);

        assert_eq!(changed, 2);
        assert!(!registry.get(ALICE).unwrap().linked());
        let bob = registry.get(BOB).unwrap();
        assert!(bob.linked());
        assert_eq!(bob.platform(), Some("Windows"));
    }

    #[test]
    fn stale_snapshot_does_not_downgrade() {
        let mut registry = ConnectionRegistry::new();
        registry.upsert_discovered(BOB);
        registry.mark_linked(BOB, Some("macOS".into())).unwrap();

        let changed = registry.snapshot_merge(vec![DeviceRecord::discovered(BOB)]);

        assert_eq!(changed, 0);
        let record = registry.get(BOB).unwrap();
        assert!(record.linked());
        assert_eq!(record.platform(), Some("macOS"));
    }

    #[test]
    fn snapshot_can_upgrade_an_unlinked_record() {
        let mut registry = ConnectionRegistry::new();
        registry.upsert_discovered(BOB);

        let changed =
            registry.snapshot_merge(vec![DeviceRecord::linked(BOB, Some("macOS".into()))]);

        assert_eq!(changed, 1);
        assert!(registry.get(BOB).unwrap().linked());
    }

    #[test]
    fn snapshot_omission_does_not_remove() {
        let mut registry = ConnectionRegistry::new();
        registry.upsert_discovered(BOB);

        registry.snapshot_merge(vec![DeviceRecord::discovered(ALICE)]);

        assert!(registry.contains(BOB));
        assert!(registry.contains(ALICE));
    }

    #[test]
    fn snapshot_merge_is_idempotent() {
        let mut registry = ConnectionRegistry::new();
        let snapshot = vec![DeviceRecord::linked(BOB, None)];

        registry.snapshot_merge(snapshot.clone());
        let version = registry.version();
        let changed = registry.snapshot_merge(snapshot);

        assert_eq!(changed, 0);
        assert_eq!(registry.version(), version);
    }

    #[test]
    fn unlinked_snapshot_entry_ignores_platform() {
        let mut registry = ConnectionRegistry::new();

        registry.snapshot_merge(vec![DeviceRecord {
            name: BOB.into(),
            linked: false,
            platform: Some("macOS".into()),
        }]);

        let record = registry.get(BOB).unwrap();
        assert!(!record.linked());
        assert_eq!(record.platform(), None);
    }

    #[test]
    fn no_record_has_platform_without_link() {
        let mut registry = ConnectionRegistry::new();
        registry.upsert_discovered(BOB);
        registry.upsert_discovered(ALICE);
        registry.mark_linked(BOB, Some("macOS".into())).unwrap();
        registry.snapshot_merge(vec![
            DeviceRecord::discovered(BOB),
            DeviceRecord {
                name: ALICE.into(),
                linked: false,
                platform: Some("iOS".into()),
            },
        ]);

        for record in registry.iter() {
            assert!(record.platform().is_none() || record.linked());
        }
    }
}
