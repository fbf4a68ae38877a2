//! Registry port — resolves a device identifier to its channel pair.

use std::sync::Arc;

use hausbridge_domain::error::NotFoundError;
use hausbridge_domain::id::DeviceFqid;

use super::DeviceChannel;

/// Lookup of device channels, injected into entity setup.
///
/// A missing device is a setup-time configuration error: the entity is
/// never created and no read loop is started for it.
pub trait DeviceRegistry {
    type Channel: DeviceChannel + 'static;

    /// Find the channel pair for `fqid`.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] when no device with that identifier exists.
    fn lookup(&self, fqid: &DeviceFqid) -> Result<Arc<Self::Channel>, NotFoundError>;
}
