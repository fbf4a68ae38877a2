//! State translators: pure mappings from a device [`Message`] to the
//! [`EntityState`] of the entity mirroring it.
//!
//! Each entity kind has its own strategy implementing [`StateTranslator`];
//! [`Translator`] wraps the concrete strategies so a bridge can hold one
//! without being generic over it.

mod sensor;
mod switch;

pub use sensor::SensorTranslator;
pub use switch::SwitchTranslator;

use crate::entity::{EntityKind, EntityState};
use crate::error::TranslationError;
use crate::message::Message;
use crate::platform::PlatformConfig;

/// Translation strategy for one entity kind.
pub trait StateTranslator {
    /// State shown before the device has reported anything.
    fn initial_state(&self) -> EntityState;

    /// Translate a device message.
    ///
    /// # Errors
    ///
    /// Returns [`TranslationError`] when the message does not carry a state
    /// this entity kind understands. Callers must leave the current state
    /// untouched in that case.
    fn translate(&self, message: &Message) -> Result<EntityState, TranslationError>;
}

/// The concrete translators, one per [`EntityKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum Translator {
    Switch(SwitchTranslator),
    Sensor(SensorTranslator),
}

impl Translator {
    /// Pick the translator matching a platform configuration.
    #[must_use]
    pub fn for_config(config: &PlatformConfig) -> Self {
        match config.kind {
            EntityKind::Switch => Self::Switch(SwitchTranslator),
            EntityKind::Sensor => Self::Sensor(SensorTranslator::new(
                config.unit.clone(),
                config.value_type,
            )),
        }
    }

    #[must_use]
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Switch(_) => EntityKind::Switch,
            Self::Sensor(_) => EntityKind::Sensor,
        }
    }
}

impl StateTranslator for Translator {
    fn initial_state(&self) -> EntityState {
        match self {
            Self::Switch(t) => t.initial_state(),
            Self::Sensor(t) => t.initial_state(),
        }
    }

    fn translate(&self, message: &Message) -> Result<EntityState, TranslationError> {
        match self {
            Self::Switch(t) => t.translate(message),
            Self::Sensor(t) => t.translate(message),
        }
    }
}

/// Extract the `state` field, distinguishing non-object payloads from
/// objects that lack the field.
fn state_of(message: &Message) -> Result<&serde_json::Value, TranslationError> {
    if !message.is_object() {
        return Err(TranslationError::NotAnObject);
    }
    message.state().ok_or(TranslationError::MissingState)
}
