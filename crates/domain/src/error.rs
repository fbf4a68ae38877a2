//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`HausBridgeError`] via `#[from]`. No variant carries a bare `String`
//! describing the failure.

use serde_json::Value;

/// Top-level error for hausbridge operations.
#[derive(Debug, thiserror::Error)]
pub enum HausBridgeError {
    /// Invalid configuration or identifier.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A lookup by identifier found nothing.
    #[error("not found: {0}")]
    NotFound(#[from] NotFoundError),

    /// A device message could not be translated into entity state.
    #[error("translation error: {0}")]
    Translation(#[from] TranslationError),

    /// The device channel rejected an operation.
    #[error("channel error: {0}")]
    Channel(#[from] ChannelError),
}

/// Domain validation failures.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("device fqid must not be empty")]
    EmptyDeviceFqid,

    #[error("entity name must not be blank when provided")]
    BlankName,

    #[error("unit is only meaningful for sensor entities")]
    UnitOnSwitch,

    #[error("value type is only meaningful for sensor entities")]
    ValueTypeOnSwitch,

    #[error("device {fqid} is already bridged to an entity")]
    DuplicateDevice {
        /// The device identifier that was configured twice.
        fqid: String,
    },
}

/// A lookup found no matching item.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    /// Kind of item that was looked up (e.g. `"Device"`).
    pub entity: &'static str,
    /// The identifier that was looked up.
    pub id: String,
}

/// Why a device message could not be turned into entity state.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TranslationError {
    /// The message payload is not a JSON object.
    #[error("message is not an object")]
    NotAnObject,

    /// The message has no `state` field.
    #[error("message has no state field")]
    MissingState,

    /// The `state` field holds a value this entity kind does not accept.
    #[error("unexpected state value {value}")]
    UnexpectedState {
        /// The offending value.
        value: Value,
    },

    /// The `state` value does not match the configured value type.
    #[error("state value {value} is not a {expected}")]
    TypeMismatch {
        /// The configured value type.
        expected: &'static str,
        /// The offending value.
        value: Value,
    },
}

/// Failures on the device channel pair.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ChannelError {
    /// The device side of the channel is gone.
    #[error("device channel closed")]
    Closed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_not_found_with_kind_and_id() {
        let err = NotFoundError {
            entity: "Device",
            id: "kitchen.light".to_string(),
        };
        assert_eq!(err.to_string(), "Device kitchen.light not found");
    }

    #[test]
    fn should_convert_validation_error_into_top_level() {
        let err: HausBridgeError = ValidationError::EmptyDeviceFqid.into();
        assert!(matches!(
            err,
            HausBridgeError::Validation(ValidationError::EmptyDeviceFqid)
        ));
    }

    #[test]
    fn should_include_source_in_top_level_message() {
        let err: HausBridgeError = NotFoundError {
            entity: "Device",
            id: "node9.ghost".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "not found: Device node9.ghost not found");
    }

    #[test]
    fn should_display_unexpected_state_with_value() {
        let err = TranslationError::UnexpectedState {
            value: serde_json::json!("BOGUS"),
        };
        assert_eq!(err.to_string(), "unexpected state value \"BOGUS\"");
    }

    #[test]
    fn should_display_type_mismatch() {
        let err = TranslationError::TypeMismatch {
            expected: "float",
            value: serde_json::json!(true),
        };
        assert_eq!(err.to_string(), "state value true is not a float");
    }

    #[test]
    fn should_display_duplicate_device() {
        let err = ValidationError::DuplicateDevice {
            fqid: "garage.door".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "device garage.door is already bridged to an entity"
        );
    }
}
