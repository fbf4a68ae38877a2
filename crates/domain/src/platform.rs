//! Per-entity platform configuration.
//!
//! One [`PlatformConfig`] describes one entity to bridge: which device it
//! mirrors, how it is displayed, and, for sensors, the static unit and
//! optional declared value type of its readings.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entity::EntityKind;
use crate::error::ValidationError;
use crate::id::DeviceFqid;

/// Declared type of a sensor's `state` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Bool,
    Int,
    /// Accepts integers as well as fractional numbers.
    Float,
    String,
}

impl ValueType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
        }
    }

    /// Whether `value` has this type.
    #[must_use]
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Self::Bool => value.is_boolean(),
            Self::Int => value.is_i64() || value.is_u64(),
            Self::Float => value.is_number(),
            Self::String => value.is_string(),
        }
    }
}

/// Configuration of a single bridged entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Fully-qualified identifier of the device to bridge.
    pub device_fqid: DeviceFqid,
    /// Optional display name.
    #[serde(default)]
    pub name: Option<String>,
    pub kind: EntityKind,
    /// Unit of measurement (sensors only).
    #[serde(default)]
    pub unit: Option<String>,
    /// Declared value type (sensors only).
    #[serde(default)]
    pub value_type: Option<ValueType>,
}

impl PlatformConfig {
    #[must_use]
    pub fn switch(device_fqid: DeviceFqid) -> Self {
        Self {
            device_fqid,
            name: None,
            kind: EntityKind::Switch,
            unit: None,
            value_type: None,
        }
    }

    #[must_use]
    pub fn sensor(device_fqid: DeviceFqid, unit: Option<String>) -> Self {
        Self {
            device_fqid,
            name: None,
            kind: EntityKind::Sensor,
            unit,
            value_type: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = Some(value_type);
        self
    }

    /// Check the invariants not expressible in the type.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when a name is blank or a sensor-only
    /// field is set on a switch.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(ValidationError::BlankName);
        }
        if self.kind == EntityKind::Switch {
            if self.unit.is_some() {
                return Err(ValidationError::UnitOnSwitch);
            }
            if self.value_type.is_some() {
                return Err(ValidationError::ValueTypeOnSwitch);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fqid(s: &str) -> DeviceFqid {
        DeviceFqid::new(s).unwrap()
    }

    #[test]
    fn should_deserialize_switch_from_toml() {
        let config: PlatformConfig = toml::from_str(
            r#"
            device_fqid = "node1.relay"
            name = "Porch light"
            kind = "switch"
            "#,
        )
        .unwrap();
        assert_eq!(config.device_fqid, fqid("node1.relay"));
        assert_eq!(config.name.as_deref(), Some("Porch light"));
        assert_eq!(config.kind, EntityKind::Switch);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_deserialize_sensor_with_unit_and_type() {
        let config: PlatformConfig = toml::from_str(
            r#"
            device_fqid = "node1.thermo"
            kind = "sensor"
            unit = "°C"
            value_type = "float"
            "#,
        )
        .unwrap();
        assert_eq!(config.unit.as_deref(), Some("°C"));
        assert_eq!(config.value_type, Some(ValueType::Float));
        assert!(config.name.is_none());
    }

    #[test]
    fn should_reject_blank_name() {
        let config = PlatformConfig::switch(fqid("a.b")).with_name("  ");
        assert_eq!(config.validate(), Err(ValidationError::BlankName));
    }

    #[test]
    fn should_reject_unit_on_switch() {
        let mut config = PlatformConfig::switch(fqid("a.b"));
        config.unit = Some("W".to_string());
        assert_eq!(config.validate(), Err(ValidationError::UnitOnSwitch));
    }

    #[test]
    fn should_reject_value_type_on_switch() {
        let config = PlatformConfig::switch(fqid("a.b")).with_value_type(ValueType::Bool);
        assert_eq!(config.validate(), Err(ValidationError::ValueTypeOnSwitch));
    }

    #[test]
    fn should_reject_missing_fqid() {
        let result: Result<PlatformConfig, _> = toml::from_str(r#"kind = "switch""#);
        assert!(result.is_err());
    }

    #[test]
    fn should_accept_integers_as_float() {
        assert!(ValueType::Float.accepts(&json!(3)));
        assert!(ValueType::Float.accepts(&json!(3.5)));
        assert!(!ValueType::Int.accepts(&json!(3.5)));
        assert!(!ValueType::String.accepts(&json!(3)));
        assert!(ValueType::Bool.accepts(&json!(false)));
    }
}
