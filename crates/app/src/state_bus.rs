//! In-process state bus backed by a tokio broadcast channel.

use std::future::Future;

use tokio::sync::broadcast;

use hausbridge_domain::entity::EntitySnapshot;
use hausbridge_domain::error::HausBridgeError;

use crate::ports::HostNotifier;

/// Broadcasts every entity state change to in-process subscribers.
///
/// This is the [`HostNotifier`] used when the host renders by listening on
/// a channel. Publishing succeeds even when there are no subscribers (the
/// change is simply dropped); slow subscribers may observe a lag.
#[derive(Debug, Clone)]
pub struct StateBus {
    sender: broadcast::Sender<EntitySnapshot>,
}

impl StateBus {
    /// Create a new bus with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribe to changes published *after* this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<EntitySnapshot> {
        self.sender.subscribe()
    }
}

impl HostNotifier for StateBus {
    fn state_changed(
        &self,
        snapshot: EntitySnapshot,
    ) -> impl Future<Output = Result<(), HausBridgeError>> + Send {
        // Fails only without receivers, which is fine.
        let _ = self.sender.send(snapshot);
        async { Ok(()) }
    }
}
