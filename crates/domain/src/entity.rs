//! Entity: the host-facing, observable side of a device.
//!
//! An entity mirrors the last state reported by exactly one device. Its
//! state is only ever replaced by a successful translation of a device
//! message; commands never touch it.

mod sensor_value;
mod snapshot;
mod state;

pub use sensor_value::SensorValue;
pub use snapshot::{EntitySnapshot, Timestamp, now};
pub use state::EntityState;

use serde::{Deserialize, Serialize};

/// The kinds of entity a device can be bridged to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Switch,
    Sensor,
}

impl EntityKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Switch => "switch",
            Self::Sensor => "sensor",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
