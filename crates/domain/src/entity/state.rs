//! Observable entity state: what the host displays.

use serde::{Deserialize, Serialize};

use super::{EntityKind, SensorValue};

/// Host-visible state of an entity, shaped by its kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EntityState {
    Switch {
        is_on: bool,
    },
    Sensor {
        /// Last reported reading; `None` until the first message arrives.
        value: Option<SensorValue>,
        /// Unit from static configuration, never from the message.
        unit: Option<String>,
    },
}

impl EntityState {
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Switch { .. } => EntityKind::Switch,
            Self::Sensor { .. } => EntityKind::Sensor,
        }
    }

    /// Whether a switch is on. Always `false` for sensors.
    #[must_use]
    pub fn is_on(&self) -> bool {
        matches!(self, Self::Switch { is_on: true })
    }

    /// The latest sensor reading, if any.
    #[must_use]
    pub fn value(&self) -> Option<&SensorValue> {
        match self {
            Self::Sensor { value, .. } => value.as_ref(),
            Self::Switch { .. } => None,
        }
    }

    /// The configured unit of measurement, if any.
    #[must_use]
    pub fn unit(&self) -> Option<&str> {
        match self {
            Self::Sensor { unit, .. } => unit.as_deref(),
            Self::Switch { .. } => None,
        }
    }
}

impl std::fmt::Display for EntityState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Switch { is_on: true } => f.write_str("on"),
            Self::Switch { is_on: false } => f.write_str("off"),
            Self::Sensor { value: None, .. } => f.write_str("unknown"),
            Self::Sensor {
                value: Some(value),
                unit: None,
            } => std::fmt::Display::fmt(value, f),
            Self::Sensor {
                value: Some(value),
                unit: Some(unit),
            } => write!(f, "{value} {unit}"),
        }
    }
}
