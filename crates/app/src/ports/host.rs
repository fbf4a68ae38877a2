//! Host port — how the bridge asks the host to re-render an entity.

use std::future::Future;

use hausbridge_domain::entity::EntitySnapshot;
use hausbridge_domain::error::HausBridgeError;

/// Receives entity state changes and schedules a host-side update.
///
/// Called by the read loop after every accepted state replacement (and
/// once when a device goes unavailable). Failures are logged by the
/// caller and never stop the loop.
pub trait HostNotifier: Send + Sync {
    /// Schedule an update of the host's view of `snapshot.fqid`.
    fn state_changed(
        &self,
        snapshot: EntitySnapshot,
    ) -> impl Future<Output = Result<(), HausBridgeError>> + Send;
}

impl<T: HostNotifier> HostNotifier for std::sync::Arc<T> {
    fn state_changed(
        &self,
        snapshot: EntitySnapshot,
    ) -> impl Future<Output = Result<(), HausBridgeError>> + Send {
        (**self).state_changed(snapshot)
    }
}
