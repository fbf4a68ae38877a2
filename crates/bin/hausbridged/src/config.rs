//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `hausbridge.toml` in the working directory, or at the path in
//! `HAUSBRIDGE_CONFIG`. Every field has a sensible default so the file is
//! optional. Environment variables take precedence over file values.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use hausbridge_domain::platform::PlatformConfig;

const DEFAULT_PATH: &str = "hausbridge.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Queue sizes.
    pub channels: ChannelsConfig,
    /// Virtual device runtime.
    #[serde(rename = "virtual")]
    pub virtual_devices: VirtualConfig,
    /// Entities to bridge. When empty, every virtual device is bridged.
    pub entities: Vec<PlatformConfig>,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Queue sizes.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ChannelsConfig {
    /// Capacity of each device queue.
    pub capacity: usize,
    /// Capacity of the entity state bus.
    pub bus_capacity: usize,
}

/// Virtual device runtime settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct VirtualConfig {
    /// Start the simulated devices.
    pub enabled: bool,
    /// Time between two virtual sensor readings.
    pub sensor_interval_ms: u64,
}

impl Config {
    /// Load configuration from `HAUSBRIDGE_CONFIG` or `hausbridge.toml`
    /// (if present) then apply environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os("HAUSBRIDGE_CONFIG")
            .map_or_else(|| PathBuf::from(DEFAULT_PATH), PathBuf::from);
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("HAUSBRIDGE_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.channels.capacity == 0 {
            return Err(ConfigError::Validation(
                "channel capacity must be non-zero".to_string(),
            ));
        }
        if self.channels.bus_capacity == 0 {
            return Err(ConfigError::Validation(
                "bus capacity must be non-zero".to_string(),
            ));
        }
        if self.virtual_devices.enabled && self.virtual_devices.sensor_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "virtual sensor interval must be non-zero".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for entity in &self.entities {
            entity.validate().map_err(|err| {
                ConfigError::Validation(format!("entity {}: {err}", entity.device_fqid))
            })?;
            if !seen.insert(&entity.device_fqid) {
                return Err(ConfigError::Validation(format!(
                    "entity {} is configured twice",
                    entity.device_fqid
                )));
            }
        }
        Ok(())
    }

    /// Return the virtual sensor reading interval.
    #[must_use]
    pub fn sensor_interval(&self) -> Duration {
        Duration::from_millis(self.virtual_devices.sensor_interval_ms)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "hausbridged=info,hausbridge=info".to_string(),
        }
    }
}

impl Default for ChannelsConfig {
    fn default() -> Self {
        Self {
            capacity: 16,
            bus_capacity: 256,
        }
    }
}

impl Default for VirtualConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sensor_interval_ms: 5_000,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use hausbridge_domain::entity::EntityKind;
    use hausbridge_domain::platform::ValueType;

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.channels.capacity, 16);
        assert_eq!(config.channels.bus_capacity, 256);
        assert!(config.virtual_devices.enabled);
        assert_eq!(config.sensor_interval(), Duration::from_secs(5));
        assert!(config.entities.is_empty());
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.channels.capacity, 16);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = r#"
            [logging]
            filter = "debug"

            [channels]
            capacity = 4
            bus_capacity = 32

            [virtual]
            enabled = false
            sensor_interval_ms = 250

            [[entities]]
            device_fqid = "node1.relay"
            name = "Porch light"
            kind = "switch"

            [[entities]]
            device_fqid = "node1.temp"
            kind = "sensor"
            unit = "°C"
            value_type = "float"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(config.channels.capacity, 4);
        assert_eq!(config.channels.bus_capacity, 32);
        assert!(!config.virtual_devices.enabled);
        assert_eq!(config.sensor_interval(), Duration::from_millis(250));
        assert_eq!(config.entities.len(), 2);
        assert_eq!(config.entities[0].kind, EntityKind::Switch);
        assert_eq!(config.entities[1].value_type, Some(ValueType::Float));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_parse_partial_toml_with_defaults() {
        let toml = "
            [channels]
            capacity = 8
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.channels.capacity, 8);
        assert_eq!(config.channels.bus_capacity, 256);
        assert!(config.virtual_devices.enabled);
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file(Path::new("nonexistent.toml")).unwrap();
        assert_eq!(config.channels.capacity, 16);
    }

    #[test]
    fn should_reject_zero_capacity() {
        let mut config = Config::default();
        config.channels.capacity = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn should_reject_zero_sensor_interval_when_virtual_enabled() {
        let mut config = Config::default();
        config.virtual_devices.sensor_interval_ms = 0;
        assert!(config.validate().is_err());

        config.virtual_devices.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_reject_invalid_entity() {
        let toml = r#"
            [[entities]]
            device_fqid = "node1.relay"
            kind = "switch"
            unit = "W"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("node1.relay"));
    }

    #[test]
    fn should_reject_entity_configured_twice() {
        let toml = r#"
            [[entities]]
            device_fqid = "node1.relay"
            kind = "switch"

            [[entities]]
            device_fqid = "node1.relay"
            kind = "switch"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_report_parse_error_for_blank_device_fqid() {
        let toml = r#"
            [[entities]]
            device_fqid = "  "
            kind = "switch"
        "#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }
}
