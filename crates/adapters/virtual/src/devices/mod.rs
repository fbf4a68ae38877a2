//! Virtual device implementations — switch, sensor.
//!
//! Each virtual device has a fixed [`DeviceFqid`] so the entities bridging
//! it remain stable across restarts of the runtime.

mod sensor;
mod switch;

pub use sensor::VirtualSensor;
pub use switch::VirtualSwitch;

use hausbridge_app::queue::DeviceEndpoint;
use hausbridge_domain::id::DeviceFqid;
use hausbridge_domain::platform::PlatformConfig;

/// Wrapper enum for the concrete virtual device types.
#[derive(Debug, Clone)]
pub enum VirtualDevice {
    Switch(VirtualSwitch),
    Sensor(VirtualSensor),
}

impl VirtualDevice {
    #[must_use]
    pub fn fqid(&self) -> &DeviceFqid {
        match self {
            Self::Switch(d) => d.fqid(),
            Self::Sensor(d) => d.fqid(),
        }
    }

    /// Entity configuration bridging this device.
    #[must_use]
    pub fn entity_config(&self) -> PlatformConfig {
        match self {
            Self::Switch(d) => d.entity_config(),
            Self::Sensor(d) => d.entity_config(),
        }
    }

    /// Drive the device on its end of a channel pair until the bridge is gone.
    pub async fn run(self, endpoint: DeviceEndpoint) {
        match self {
            Self::Switch(d) => d.run(endpoint).await,
            Self::Sensor(d) => d.run(endpoint).await,
        }
    }
}
