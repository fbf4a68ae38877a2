//! # hausbridge-adapter-virtual
//!
//! Virtual device runtime that provides simulated devices for testing and
//! demonstration purposes. Each device runs as a task on the device end of
//! an in-process channel pair, exactly where a network-backed runtime would.
//!
//! ## Provided devices
//!
//! | Device | Identifier | Behaviour |
//! |--------|------------|-----------|
//! | Virtual Switch | `virtual.switch` | Reports `OFF`, then echoes every `ON` / `OFF` command |
//! | Virtual Sensor | `virtual.temperature` | Publishes a drifting `°C` reading every interval |
//!
//! ## Dependency rule
//!
//! Depends on `hausbridge-app` (channel pair, registry) and `hausbridge-domain` only.

mod devices;

use std::time::Duration;

use tokio::task::JoinHandle;

use hausbridge_app::queue::InProcessChannel;
use hausbridge_app::registry::InMemoryRegistry;
use hausbridge_domain::error::ValidationError;
use hausbridge_domain::id::DeviceFqid;
use hausbridge_domain::platform::PlatformConfig;

pub use devices::{VirtualDevice, VirtualSensor, VirtualSwitch};

/// Identifier of the built-in virtual switch.
pub const SWITCH_FQID: &str = "virtual.switch";

/// Identifier of the built-in virtual temperature sensor.
pub const SENSOR_FQID: &str = "virtual.temperature";

/// Virtual runtime owning a fixed set of simulated devices.
pub struct VirtualIntegration {
    devices: Vec<VirtualDevice>,
    capacity: usize,
    tasks: Vec<JoinHandle<()>>,
}

impl VirtualIntegration {
    /// Create the runtime with the built-in switch and sensor.
    ///
    /// `capacity` bounds each device's queues.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if a built-in device identifier is
    /// rejected.
    pub fn new(sensor_interval: Duration, capacity: usize) -> Result<Self, ValidationError> {
        let devices = vec![
            VirtualDevice::Switch(VirtualSwitch::new(
                DeviceFqid::new(SWITCH_FQID)?,
                "Virtual Switch",
            )),
            VirtualDevice::Sensor(VirtualSensor::new(
                DeviceFqid::new(SENSOR_FQID)?,
                "Virtual Temperature",
                "\u{b0}C",
                21.5,
                sensor_interval,
            )),
        ];
        Ok(Self {
            devices,
            capacity,
            tasks: Vec::new(),
        })
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        "virtual"
    }

    /// Entity configurations bridging every virtual device.
    #[must_use]
    pub fn entity_configs(&self) -> Vec<PlatformConfig> {
        self.devices.iter().map(VirtualDevice::entity_config).collect()
    }

    /// Create a channel pair per device, register the bridge halves and start
    /// the devices on the other halves.
    ///
    /// Must be called from within a tokio runtime. Setting up a running
    /// runtime again does nothing.
    pub fn setup(&mut self, registry: &mut InMemoryRegistry) -> Vec<DeviceFqid> {
        if !self.tasks.is_empty() {
            tracing::warn!("virtual devices already started");
            return self.devices.iter().map(|d| d.fqid().clone()).collect();
        }

        let mut registered = Vec::with_capacity(self.devices.len());
        for device in &self.devices {
            let (channel, endpoint) = InProcessChannel::pair(self.capacity);
            if registry.register(device.fqid().clone(), channel).is_some() {
                tracing::warn!(
                    device = %device.fqid(),
                    "replaced an existing device registration"
                );
            }
            self.tasks.push(tokio::spawn(device.clone().run(endpoint)));
            registered.push(device.fqid().clone());
        }

        tracing::info!(count = registered.len(), "virtual devices started");
        registered
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.tasks.is_empty()
    }

    /// Stop every device task.
    pub async fn teardown(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
        for task in self.tasks.drain(..) {
            match task.await {
                Err(err) if !err.is_cancelled() => {
                    tracing::warn!(%err, "virtual device task failed");
                }
                _ => {}
            }
        }
        tracing::info!("virtual devices stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use hausbridge_app::ports::{DeviceChannel, DeviceRegistry};
    use hausbridge_domain::entity::EntityKind;
    use hausbridge_domain::message::{Command, Message};

    fn integration() -> VirtualIntegration {
        VirtualIntegration::new(Duration::from_millis(5), 4).unwrap()
    }

    fn fqid(value: &str) -> DeviceFqid {
        DeviceFqid::new(value).unwrap()
    }

    async fn next(channel: &InProcessChannel) -> Message {
        let message = tokio::time::timeout(Duration::from_secs(1), channel.receive())
            .await
            .unwrap()
            .unwrap();
        channel.task_done();
        message
    }

    #[test]
    fn should_use_built_in_identifiers() {
        let ids: Vec<_> = integration()
            .entity_configs()
            .into_iter()
            .map(|c| c.device_fqid)
            .collect();
        assert_eq!(ids, vec![fqid(SWITCH_FQID), fqid(SENSOR_FQID)]);
    }

    #[test]
    fn should_return_virtual_as_name() {
        assert_eq!(integration().name(), "virtual");
    }

    #[test]
    fn should_describe_one_entity_per_device() {
        let configs = integration().entity_configs();

        let kinds: Vec<_> = configs.iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![EntityKind::Switch, EntityKind::Sensor]);
        assert!(configs.iter().all(|c| c.validate().is_ok()));
    }

    #[tokio::test]
    async fn should_register_every_device_on_setup() {
        let mut integration = integration();
        let mut registry = InMemoryRegistry::new();

        let registered = integration.setup(&mut registry);

        assert_eq!(registered.len(), 2);
        for fqid in &registered {
            assert!(registry.lookup(fqid).is_ok());
        }
        assert!(integration.is_running());
        integration.teardown().await;
    }

    #[tokio::test]
    async fn should_not_start_devices_twice() {
        let mut integration = integration();
        let mut registry = InMemoryRegistry::new();
        integration.setup(&mut registry);
        let first = registry.lookup(&fqid("virtual.switch")).unwrap();

        integration.setup(&mut registry);

        let second = registry.lookup(&fqid("virtual.switch")).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        integration.teardown().await;
    }

    #[tokio::test]
    async fn should_drive_switch_through_registered_channel() {
        let mut integration = integration();
        let mut registry = InMemoryRegistry::new();
        integration.setup(&mut registry);
        let channel = registry.lookup(&fqid("virtual.switch")).unwrap();

        assert_eq!(next(&channel).await, Message::with_state("OFF"));
        channel.send(Command::on()).await.unwrap();
        assert_eq!(next(&channel).await, Message::with_state("ON"));

        integration.teardown().await;
    }

    #[tokio::test]
    async fn should_stop_devices_on_teardown() {
        let mut integration = integration();
        let mut registry = InMemoryRegistry::new();
        integration.setup(&mut registry);
        let channel = registry.lookup(&fqid("virtual.temperature")).unwrap();

        integration.teardown().await;

        assert!(!integration.is_running());
        let drained = tokio::time::timeout(Duration::from_secs(1), async {
            while channel.receive().await.is_some() {
                channel.task_done();
            }
        })
        .await;
        assert!(drained.is_ok());
    }
}
