//! Sensor translation: pass the reading through, attach the static unit.

use super::{StateTranslator, state_of};
use crate::entity::{EntityState, SensorValue};
use crate::error::TranslationError;
use crate::message::Message;
use crate::platform::ValueType;

/// Translates `{"state": <scalar>}` into a sensor reading.
///
/// The unit comes from configuration and never varies with the payload.
/// When a value type is declared, readings of another type are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SensorTranslator {
    unit: Option<String>,
    value_type: Option<ValueType>,
}

impl SensorTranslator {
    #[must_use]
    pub fn new(unit: Option<String>, value_type: Option<ValueType>) -> Self {
        Self { unit, value_type }
    }

    #[must_use]
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }
}

impl StateTranslator for SensorTranslator {
    fn initial_state(&self) -> EntityState {
        EntityState::Sensor {
            value: None,
            unit: self.unit.clone(),
        }
    }

    fn translate(&self, message: &Message) -> Result<EntityState, TranslationError> {
        let raw = state_of(message)?;
        if let Some(expected) = self.value_type.filter(|t| !t.accepts(raw)) {
            return Err(TranslationError::TypeMismatch {
                expected: expected.as_str(),
                value: raw.clone(),
            });
        }
        let value = SensorValue::from_json(raw)
            .ok_or_else(|| TranslationError::UnexpectedState { value: raw.clone() })?;
        Ok(EntityState::Sensor {
            value: Some(value),
            unit: self.unit.clone(),
        })
    }
}
