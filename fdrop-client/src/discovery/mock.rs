//! Mock discovery service for testing.
//!
//! Allows pushing events, scripting the snapshot response, and verifying
//! the order of calls.

use super::{DiscoveryError, DiscoveryService, EVENT_CHANNEL_CAPACITY};
use async_trait::async_trait;
use fdrop_types::DeviceEvent;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Mock discovery service for testing.
///
/// Events pushed before `subscribe()` are dropped, matching the real
/// daemon's no-replay behaviour.
#[derive(Debug, Default)]
pub struct MockDiscovery {
    inner: Arc<Mutex<MockDiscoveryInner>>,
}

#[derive(Debug, Default)]
struct MockDiscoveryInner {
    calls: Vec<&'static str>,
    event_tx: Option<mpsc::Sender<DeviceEvent>>,
    snapshot_response: Option<String>,
    fail_next_subscribe: Option<String>,
    fail_next_enable: Option<String>,
    fail_next_snapshot: Option<String>,
}

impl MockDiscovery {
    /// Create a new mock discovery service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver a push event to the current subscriber.
    ///
    /// Returns false if nothing is subscribed (the event is lost, as it
    /// would be against the real daemon).
    pub fn push_event(&self, event: DeviceEvent) -> bool {
        let tx = {
            let inner = self.inner.lock().unwrap();
            inner.event_tx.clone()
        };
        match tx {
            Some(tx) => tx.try_send(event).is_ok(),
            None => false,
        }
    }

    /// Script the raw JSON returned by the next `snapshot()` calls.
    pub fn set_snapshot(&self, raw_json: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.snapshot_response = Some(raw_json.to_string());
    }

    /// Cause the next `subscribe()` to fail with the given error.
    pub fn fail_next_subscribe(&self, error: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next_subscribe = Some(error.to_string());
    }

    /// Cause the next `enable()` to fail with the given error.
    pub fn fail_next_enable(&self, error: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next_enable = Some(error.to_string());
    }

    /// Cause the next `snapshot()` to fail with the given error.
    pub fn fail_next_snapshot(&self, error: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next_snapshot = Some(error.to_string());
    }

    /// The order of boundary calls made so far.
    pub fn calls(&self) -> Vec<&'static str> {
        let inner = self.inner.lock().unwrap();
        inner.calls.clone()
    }

    /// Whether a subscriber is currently installed.
    pub fn subscribed(&self) -> bool {
        let inner = self.inner.lock().unwrap();
        inner.event_tx.is_some()
    }
}

impl Clone for MockDiscovery {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl DiscoveryService for MockDiscovery {
    async fn subscribe(&self) -> Result<mpsc::Receiver<DeviceEvent>, DiscoveryError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push("subscribe");
        if let Some(error) = inner.fail_next_subscribe.take() {
            return Err(DiscoveryError::Subscribe(error));
        }
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        inner.event_tx = Some(tx);
        Ok(rx)
    }

    async fn enable(&self) -> Result<(), DiscoveryError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push("enable");
        if let Some(error) = inner.fail_next_enable.take() {
            return Err(DiscoveryError::Enable(error));
        }
        Ok(())
    }

    async fn snapshot(&self) -> Result<String, DiscoveryError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push("snapshot");
        if let Some(error) = inner.fail_next_snapshot.take() {
            return Err(DiscoveryError::Snapshot(error));
        }
        Ok(inner.snapshot_response.clone().unwrap_or_else(|| "[]".to_string()))
    }
}
