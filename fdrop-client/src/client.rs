//! ConnectionsClient - the subscription facade over the registry.
//!
//! This module provides [`ConnectionsClient`], the one surface the
//! surrounding application sees: a read-only view of the connection
//! registry, a change-notification channel, and the `refresh()` command.
//!
//! # Architecture
//!
//! ```text
//! Application → ConnectionsClient → DiscoveryService → daemon
//!                      ↓
//!                 fdrop-core (pure registry + reconciler)
//! ```
//!
//! All mutation is serialized through two paths that each take the write
//! lock for the duration of one registry operation: the event pump task
//! (live push events) and `refresh()` (snapshot merges). Readers may look
//! at the registry concurrently but can never observe a half-applied
//! mutation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use fdrop_core::{Applied, ConnectionRecord, ConnectionRegistry, Reconciler, RegistryError};
use fdrop_types::{DeviceEvent, DeviceRecord};
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::discovery::{DiscoveryError, DiscoveryService};

/// Client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// `start()` was called on an already-started client.
    #[error("client already started")]
    AlreadyStarted,

    /// A discovery boundary call failed during `start()`.
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    /// The snapshot command failed or returned malformed data.
    ///
    /// The registry is left exactly as it was; a corrupt snapshot is never
    /// partially applied.
    #[error("refresh failed: {0}")]
    RefreshFailed(String),
}

/// State shared between the client and its event pump task.
#[derive(Debug)]
struct Shared {
    registry: RwLock<ConnectionRegistry>,
    changes: watch::Sender<u64>,
}

impl Shared {
    /// Broadcast the registry version. Called with the write lock held so
    /// notifications can never travel backwards.
    fn notify(&self, registry: &ConnectionRegistry) {
        let version = registry.version();
        self.changes.send_if_modified(|current| {
            if version > *current {
                *current = version;
                true
            } else {
                false
            }
        });
    }
}

/// The subscription facade: owns the registry, drives it from a
/// [`DiscoveryService`], exposes read access and `refresh()`.
///
/// Constructed once per session. No mutation surface is exported beyond
/// [`start`](Self::start) and [`refresh`](Self::refresh).
pub struct ConnectionsClient<D> {
    discovery: D,
    shared: Arc<Shared>,
    started: AtomicBool,
    pump: Mutex<Option<JoinHandle<()>>>,
}

impl<D: DiscoveryService> ConnectionsClient<D> {
    /// Create a client over the given discovery service.
    pub fn new(discovery: D) -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            discovery,
            shared: Arc::new(Shared {
                registry: RwLock::new(ConnectionRegistry::new()),
                changes,
            }),
            started: AtomicBool::new(false),
            pump: Mutex::new(None),
        }
    }

    /// Subscribe to push events, then activate discovery.
    ///
    /// The two steps are deliberately inseparable and ordered: the daemon
    /// does not replay, so any event fired before the subscription is
    /// installed would be permanently lost. Calling `start()` twice is
    /// [`ClientError::AlreadyStarted`]; a failed start resets the client so
    /// it can be retried.
    pub async fn start(&self) -> Result<(), ClientError> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(ClientError::AlreadyStarted);
        }
        let rx = match self.discovery.subscribe().await {
            Ok(rx) => rx,
            Err(e) => {
                self.started.store(false, Ordering::SeqCst);
                return Err(e.into());
            }
        };
        let shared = Arc::clone(&self.shared);
        let pump = tokio::spawn(event_pump(rx, shared));
        if let Err(e) = self.discovery.enable().await {
            pump.abort();
            self.started.store(false, Ordering::SeqCst);
            return Err(e.into());
        }
        *self.pump.lock().unwrap() = Some(pump);
        info!("connections client started");
        Ok(())
    }

    /// Fetch a full device snapshot and merge it into the registry.
    ///
    /// The snapshot is parsed and validated in full before any state is
    /// touched; a failed command or a single malformed entry fails the
    /// whole call with [`ClientError::RefreshFailed`] and leaves the
    /// registry unchanged. Safe to call repeatedly and concurrently with
    /// itself and with live events - the merge never weakens existing
    /// state, so duplicate refreshes are idempotent.
    pub async fn refresh(&self) -> Result<(), ClientError> {
        let raw = self
            .discovery
            .snapshot()
            .await
            .map_err(|e| ClientError::RefreshFailed(e.to_string()))?;
        let records: Vec<DeviceRecord> = serde_json::from_str(&raw)
            .map_err(|e| ClientError::RefreshFailed(format!("malformed snapshot: {e}")))?;

        let mut registry = self.shared.registry.write().unwrap();
        let changed = registry.snapshot_merge(records);
        if changed > 0 {
            debug!(changed, "merged device snapshot");
            self.shared.notify(&registry);
        }
        Ok(())
    }

    /// Look up one device by its raw advertised identity.
    pub fn device(&self, identity: &str) -> Option<ConnectionRecord> {
        self.shared.registry.read().unwrap().get(identity).cloned()
    }

    /// A point-in-time snapshot of all known devices. Order carries no
    /// meaning; the presentation layer may re-sort.
    pub fn devices(&self) -> Vec<ConnectionRecord> {
        self.shared
            .registry
            .read()
            .unwrap()
            .iter()
            .cloned()
            .collect()
    }

    /// The registry's current change counter.
    pub fn version(&self) -> u64 {
        self.shared.registry.read().unwrap().version()
    }

    /// Subscribe to change notifications.
    ///
    /// The channel carries the registry version; it moves only forwards and
    /// only when a mutation actually changed something.
    pub fn changes(&self) -> watch::Receiver<u64> {
        self.shared.changes.subscribe()
    }
}

impl<D> Drop for ConnectionsClient<D> {
    fn drop(&mut self) {
        if let Some(pump) = self.pump.lock().unwrap().take() {
            pump.abort();
        }
    }
}

/// Consumes push events and applies them through the reconciler.
///
/// A link event for an unknown identity means the daemon violated its
/// ordering contract (or raced a removal); it is logged and dropped, never
/// a crash.
async fn event_pump(mut rx: mpsc::Receiver<DeviceEvent>, shared: Arc<Shared>) {
    while let Some(event) = rx.recv().await {
        let name = event.name();
        let device = event.record().name.clone();
        let mut registry = shared.registry.write().unwrap();
        match Reconciler::apply(&mut registry, event) {
            Ok(Applied::Changed) => {
                debug!(event = name, device = %device, "applied device event");
                shared.notify(&registry);
            }
            Ok(Applied::Unchanged) => {}
            Err(RegistryError::NotFound(identity)) => {
                warn!(device = %identity, "dropping link event for unknown device");
            }
        }
    }
    debug!("device event stream closed");
}
