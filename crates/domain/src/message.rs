//! Wire shapes exchanged with the device runtime.
//!
//! Both directions use the same shape, `{ "state": <enum|scalar> }`:
//! a [`Message`] travels from the device on its outbound queue, a
//! [`Command`] travels to the device on its inbound queue.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name of the field carrying the state in both messages and commands.
pub const STATE_FIELD: &str = "state";

/// Binary state reported by and sent to switch devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OnOffState {
    On,
    Off,
}

impl OnOffState {
    /// Wire representation (`"ON"` / `"OFF"`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::On => "ON",
            Self::Off => "OFF",
        }
    }

    /// Parse a wire value, accepting only the two exact members.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value.as_str()? {
            "ON" => Some(Self::On),
            "OFF" => Some(Self::Off),
            _ => None,
        }
    }
}

impl From<bool> for OnOffState {
    fn from(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}

impl fmt::Display for OnOffState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A state message received from a device.
///
/// The payload is kept as raw JSON: its shape is only checked by the
/// translator of the entity consuming it, so that a malformed message can
/// be logged verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Message(Value);

impl Message {
    /// Build a well-formed message carrying `state`.
    pub fn with_state(state: impl Into<Value>) -> Self {
        let mut payload = serde_json::Map::new();
        payload.insert(STATE_FIELD.to_string(), state.into());
        Self(Value::Object(payload))
    }

    /// The `state` field, if the payload is an object containing it.
    #[must_use]
    pub fn state(&self) -> Option<&Value> {
        self.0.as_object()?.get(STATE_FIELD)
    }

    #[must_use]
    pub fn is_object(&self) -> bool {
        self.0.is_object()
    }

    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for Message {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A command sent to a device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// Desired target state.
    pub state: Value,
}

impl Command {
    pub fn new(state: impl Into<Value>) -> Self {
        Self {
            state: state.into(),
        }
    }

    #[must_use]
    pub fn on() -> Self {
        Self::new(OnOffState::On.as_str())
    }

    #[must_use]
    pub fn off() -> Self {
        Self::new(OnOffState::Off.as_str())
    }

    /// The message a device echoing this command would report back.
    #[must_use]
    pub fn to_message(&self) -> Message {
        Message::with_state(self.state.clone())
    }
}

impl From<OnOffState> for Command {
    fn from(state: OnOffState) -> Self {
        Self::new(state.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn should_serialize_on_off_as_uppercase() {
        assert_eq!(serde_json::to_string(&OnOffState::On).unwrap(), "\"ON\"");
        assert_eq!(serde_json::to_string(&OnOffState::Off).unwrap(), "\"OFF\"");
    }

    #[test]
    fn should_parse_only_exact_on_off_members() {
        assert_eq!(OnOffState::from_value(&json!("ON")), Some(OnOffState::On));
        assert_eq!(OnOffState::from_value(&json!("OFF")), Some(OnOffState::Off));
        assert_eq!(OnOffState::from_value(&json!("on")), None);
        assert_eq!(OnOffState::from_value(&json!(true)), None);
        assert_eq!(OnOffState::from_value(&json!(1)), None);
    }

    #[test]
    fn should_expose_state_field_of_object_message() {
        let message = Message::from(json!({"state": 21.5, "extra": "x"}));
        assert_eq!(message.state(), Some(&json!(21.5)));
    }

    #[test]
    fn should_return_no_state_for_non_object_message() {
        let message = Message::from(json!("ON"));
        assert!(!message.is_object());
        assert_eq!(message.state(), None);
    }

    #[test]
    fn should_build_command_wire_shape() {
        let json = serde_json::to_value(Command::on()).unwrap();
        assert_eq!(json, json!({"state": "ON"}));
        let json = serde_json::to_value(Command::off()).unwrap();
        assert_eq!(json, json!({"state": "OFF"}));
    }

    #[test]
    fn should_echo_command_as_message() {
        let message = Command::new(42).to_message();
        assert_eq!(message.as_value(), &json!({"state": 42}));
    }

    #[test]
    fn should_display_message_as_json() {
        let message = Message::with_state("BOGUS");
        assert_eq!(message.to_string(), r#"{"state":"BOGUS"}"#);
    }
}
