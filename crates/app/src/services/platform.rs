//! Entity platform — builds entity bridges from configuration.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use hausbridge_domain::error::{HausBridgeError, ValidationError};
use hausbridge_domain::id::DeviceFqid;
use hausbridge_domain::platform::PlatformConfig;
use hausbridge_domain::translator::Translator;

use crate::bridge::EntityBridge;
use crate::ports::{DeviceRegistry, HostNotifier};
use crate::ready::HostReady;

/// Sets up one [`EntityBridge`] per configured device.
///
/// The registry is injected so the platform never reaches for a global
/// device table. A device can be bridged at most once at a time: it is
/// released when its bridge goes through [`remove`](Self::remove) or is
/// dropped.
pub struct EntityPlatform<R, N> {
    registry: R,
    notifier: N,
    ready: HostReady,
    bridged: HashMap<DeviceFqid, Weak<()>>,
}

impl<R, N> EntityPlatform<R, N>
where
    R: DeviceRegistry,
    N: HostNotifier + Clone + 'static,
{
    /// Create a platform resolving devices through `registry`.
    pub fn new(registry: R, notifier: N, ready: HostReady) -> Self {
        Self {
            registry,
            notifier,
            ready,
            bridged: HashMap::new(),
        }
    }

    /// Build the bridge for one configured entity. The bridge is returned
    /// detached; the host attaches it once it has been added.
    ///
    /// # Errors
    ///
    /// Returns [`HausBridgeError::Validation`] if the configuration is
    /// invalid or the device is already bridged, and
    /// [`HausBridgeError::NotFound`] if the registry does not know the device.
    #[tracing::instrument(skip(self, config), fields(device = %config.device_fqid, kind = %config.kind))]
    pub fn setup(
        &mut self,
        config: &PlatformConfig,
    ) -> Result<EntityBridge<R::Channel, N>, HausBridgeError> {
        config.validate()?;
        if self.is_bridged(&config.device_fqid) {
            return Err(ValidationError::DuplicateDevice {
                fqid: config.device_fqid.to_string(),
            }
            .into());
        }
        let channel = self.registry.lookup(&config.device_fqid)?;

        let claim = Arc::new(());
        let bridge = EntityBridge::new(
            config.device_fqid.clone(),
            config.name.clone(),
            Translator::for_config(config),
            channel,
            self.notifier.clone(),
            self.ready.clone(),
        )
        .with_claim(Arc::clone(&claim));
        self.bridged
            .insert(config.device_fqid.clone(), Arc::downgrade(&claim));
        tracing::info!("entity set up");
        Ok(bridge)
    }

    /// Build bridges for every configured entity, skipping (and logging)
    /// those that fail.
    pub fn setup_all<'a>(
        &mut self,
        configs: impl IntoIterator<Item = &'a PlatformConfig>,
    ) -> Vec<EntityBridge<R::Channel, N>> {
        configs
            .into_iter()
            .filter_map(|config| match self.setup(config) {
                Ok(bridge) => Some(bridge),
                Err(err) => {
                    tracing::error!(device = %config.device_fqid, %err, "failed to set up entity");
                    None
                }
            })
            .collect()
    }

    /// Detach a bridge and release its device for a later setup.
    pub async fn remove(&mut self, mut bridge: EntityBridge<R::Channel, N>) {
        bridge.detach().await;
        self.bridged.remove(bridge.fqid());
    }

    /// Whether a live bridge exists for `fqid`.
    #[must_use]
    pub fn is_bridged(&self, fqid: &DeviceFqid) -> bool {
        self.bridged
            .get(fqid)
            .is_some_and(|claim| claim.strong_count() > 0)
    }

    #[must_use]
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// The readiness signal handed to every bridge.
    #[must_use]
    pub fn ready(&self) -> &HostReady {
        &self.ready
    }
}
