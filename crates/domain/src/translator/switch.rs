//! Switch translation: `state == ON`.

use super::{StateTranslator, state_of};
use crate::entity::EntityState;
use crate::error::TranslationError;
use crate::message::{Message, OnOffState};

/// Translates `{"state": "ON" | "OFF"}` into `is_on`.
///
/// Anything but the two exact members is rejected rather than read as off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwitchTranslator;

impl StateTranslator for SwitchTranslator {
    fn initial_state(&self) -> EntityState {
        EntityState::Switch { is_on: false }
    }

    fn translate(&self, message: &Message) -> Result<EntityState, TranslationError> {
        let value = state_of(message)?;
        let state = OnOffState::from_value(value).ok_or_else(|| {
            TranslationError::UnexpectedState {
                value: value.clone(),
            }
        })?;
        Ok(EntityState::Switch {
            is_on: state == OnOffState::On,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn should_start_off() {
        assert_eq!(
            SwitchTranslator.initial_state(),
            EntityState::Switch { is_on: false }
        );
    }

    #[test]
    fn should_translate_on() {
        let state = SwitchTranslator.translate(&Message::with_state("ON")).unwrap();
        assert!(state.is_on());
    }

    #[test]
    fn should_translate_off() {
        let state = SwitchTranslator
            .translate(&Message::with_state("OFF"))
            .unwrap();
        assert_eq!(state, EntityState::Switch { is_on: false });
    }

    #[test]
    fn should_reject_unknown_member_instead_of_reading_off() {
        let err = SwitchTranslator
            .translate(&Message::with_state("BOGUS"))
            .unwrap_err();
        assert_eq!(
            err,
            TranslationError::UnexpectedState {
                value: json!("BOGUS")
            }
        );
    }

    #[test]
    fn should_reject_boolean_state() {
        let err = SwitchTranslator
            .translate(&Message::with_state(true))
            .unwrap_err();
        assert!(matches!(err, TranslationError::UnexpectedState { .. }));
    }

    #[test]
    fn should_reject_message_without_state() {
        let err = SwitchTranslator
            .translate(&Message::from(json!({"value": "ON"})))
            .unwrap_err();
        assert_eq!(err, TranslationError::MissingState);
    }
}
