//! In-memory [`DeviceRegistry`] keyed by device identifier.

use std::collections::HashMap;
use std::sync::Arc;

use hausbridge_domain::error::NotFoundError;
use hausbridge_domain::id::DeviceFqid;

use crate::ports::{DeviceChannel, DeviceRegistry};
use crate::queue::InProcessChannel;

/// Registry filled by the device runtime at startup and read by entity setup.
pub struct InMemoryRegistry<C = InProcessChannel> {
    channels: HashMap<DeviceFqid, Arc<C>>,
}

impl<C> Default for InMemoryRegistry<C> {
    fn default() -> Self {
        Self {
            channels: HashMap::new(),
        }
    }
}

impl<C> InMemoryRegistry<C> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the channel pair of a device, replacing (and returning) any
    /// previous registration for the same identifier.
    pub fn register(&mut self, fqid: DeviceFqid, channel: C) -> Option<Arc<C>> {
        self.channels.insert(fqid, Arc::new(channel))
    }

    #[must_use]
    pub fn contains(&self, fqid: &DeviceFqid) -> bool {
        self.channels.contains_key(fqid)
    }

    /// Identifiers of all registered devices, sorted.
    #[must_use]
    pub fn fqids(&self) -> Vec<&DeviceFqid> {
        let mut fqids: Vec<_> = self.channels.keys().collect();
        fqids.sort();
        fqids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

impl<C: DeviceChannel + 'static> DeviceRegistry for InMemoryRegistry<C> {
    type Channel = C;

    fn lookup(&self, fqid: &DeviceFqid) -> Result<Arc<C>, NotFoundError> {
        self.channels
            .get(fqid)
            .map(Arc::clone)
            .ok_or_else(|| NotFoundError {
                entity: "Device",
                id: fqid.to_string(),
            })
    }
}
