//! Events exchanged with the host message channel.
//!
//! An [`InboundEvent`] is the loosely typed message a node receives. The
//! instruction it carries is picked, in order of preference, from:
//!
//! 1. structured top-level fields (`state`, `brightness`, `color`, `mired`,
//!    `transitiontime`);
//! 2. the `payload`: a string (or boolean) command such as `"on"`;
//! 3. the `payload` as an instruction object (legacy form, kept for existing
//!    flows and slated for removal).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::ConfigurationError;
use crate::instruction::{Instruction, PartialInstruction, loose_id};
use crate::target::TargetSpec;

/// Message received from the host channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InboundEvent {
    /// Requested target type (`device` / `group`). A non-string value is kept
    /// in its JSON text form so it is rejected as an unknown type later on.
    #[serde(
        default,
        rename = "type",
        deserialize_with = "loose_kind",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    /// Every other key: target id, structured instruction fields, and
    /// whatever else the host attached.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Instruction as found on an event, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawInstruction {
    /// Plain string command, e.g. `"on"`.
    Command(String),
    /// Structured top-level fields.
    Fields(PartialInstruction),
    /// Instruction object carried in `payload`. Legacy form.
    Legacy(PartialInstruction),
}

impl RawInstruction {
    /// Whether the instruction came through the legacy payload object.
    #[must_use]
    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::Legacy(_))
    }

    /// Normalize into the canonical [`Instruction`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnrecognisedCommand`] for an unknown
    /// string command.
    pub fn normalize(&self) -> Result<Instruction, ConfigurationError> {
        match self {
            Self::Command(command) => Instruction::from_command(command),
            Self::Fields(fields) | Self::Legacy(fields) => Ok(Instruction::normalize(fields)),
        }
    }
}

impl InboundEvent {
    /// Target fields supplied with the request. `tradfri_id` is preferred
    /// over `id` when both are present.
    #[must_use]
    pub fn target_spec(&self) -> TargetSpec {
        let id = self
            .fields
            .get("tradfri_id")
            .or_else(|| self.fields.get("id"))
            .and_then(loose_id);
        TargetSpec {
            id,
            kind: self.kind.clone(),
        }
    }

    /// Pick the instruction carried by this event.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::EmptyInstruction`] when neither
    /// structured fields nor a usable payload are present, and
    /// [`ConfigurationError::UnrecognisedCommand`] for a payload of an
    /// unsupported shape.
    pub fn raw_instruction(&self) -> Result<RawInstruction, ConfigurationError> {
        let fields = PartialInstruction::from_json_object(&self.fields);
        if !fields.is_empty() {
            return Ok(RawInstruction::Fields(fields));
        }

        match &self.payload {
            None | Some(Value::Null) => Err(ConfigurationError::EmptyInstruction),
            Some(Value::String(command)) => Ok(RawInstruction::Command(command.clone())),
            Some(Value::Bool(on)) => Ok(RawInstruction::Command(
                if *on { "on" } else { "off" }.to_string(),
            )),
            Some(Value::Object(object)) => {
                let legacy = PartialInstruction::from_json_object(object);
                if legacy.is_empty() {
                    Err(ConfigurationError::EmptyInstruction)
                } else {
                    Ok(RawInstruction::Legacy(legacy))
                }
            }
            Some(other) => Err(ConfigurationError::UnrecognisedCommand(other.to_string())),
        }
    }
}

fn loose_kind<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(kind)) => Some(kind),
        Some(other) => Some(other.to_string()),
    })
}

/// Message emitted to the host channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundEvent {
    pub payload: Value,
}

impl OutboundEvent {
    /// Control-path result: a bare success flag.
    #[must_use]
    pub fn control(success: bool) -> Self {
        Self {
            payload: Value::Bool(success),
        }
    }

    /// Read-path result: the fetched object.
    #[must_use]
    pub fn read(payload: Value) -> Self {
        Self { payload }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::Power;
    use serde_json::json;

    fn event(value: Value) -> InboundEvent {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn should_read_target_from_id_and_type() {
        let spec = event(json!({ "type": "device", "id": 7 })).target_spec();
        assert_eq!(spec.id, Some(7));
        assert_eq!(spec.kind.as_deref(), Some("device"));
    }

    #[test]
    fn should_keep_non_string_type_as_text() {
        let spec = event(json!({ "type": 1, "id": 7, "state": "on" })).target_spec();
        assert_eq!(spec.kind.as_deref(), Some("1"));

        let spec = event(json!({ "type": null, "id": 7 })).target_spec();
        assert_eq!(spec.kind, None);
    }

    #[test]
    fn should_prefer_tradfri_id_over_id() {
        let spec = event(json!({ "tradfri_id": "65540", "id": 7 })).target_spec();
        assert_eq!(spec.id, Some(65_540));
    }

    #[test]
    fn should_pick_structured_fields_first() {
        let raw = event(json!({ "state": "off", "payload": { "state": "on" } }))
            .raw_instruction()
            .unwrap();
        assert!(!raw.is_legacy());
        assert_eq!(raw.normalize().unwrap().power, Some(Power::Off));
    }

    #[test]
    fn should_pick_string_payload_as_command() {
        let raw = event(json!({ "payload": " On " }))
            .raw_instruction()
            .unwrap();
        assert_eq!(raw, RawInstruction::Command(" On ".to_string()));
        assert_eq!(raw.normalize().unwrap().power, Some(Power::On));
    }

    #[test]
    fn should_map_boolean_payload_to_command() {
        let raw = event(json!({ "payload": false }))
            .raw_instruction()
            .unwrap();
        assert_eq!(raw, RawInstruction::Command("off".to_string()));
    }

    #[test]
    fn should_fall_back_to_legacy_payload_object() {
        let raw = event(json!({ "payload": { "brightness": 0 } }))
            .raw_instruction()
            .unwrap();
        assert!(raw.is_legacy());
        let instruction = raw.normalize().unwrap();
        assert_eq!(instruction.power, Some(Power::Off));
        assert_eq!(instruction.brightness, Some(0));
    }

    #[test]
    fn should_reject_empty_legacy_payload_object() {
        let err = event(json!({ "payload": { "topic": "x" } }))
            .raw_instruction()
            .unwrap_err();
        assert_eq!(err, ConfigurationError::EmptyInstruction);
    }

    #[test]
    fn should_reject_event_without_instruction() {
        let err = event(json!({ "id": 3, "type": "group" }))
            .raw_instruction()
            .unwrap_err();
        assert_eq!(err, ConfigurationError::EmptyInstruction);
    }

    #[test]
    fn should_reject_numeric_payload() {
        let err = event(json!({ "payload": 12 }))
            .raw_instruction()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::UnrecognisedCommand("12".to_string())
        );
    }

    #[test]
    fn should_serialize_control_output_as_bare_flag() {
        let json = serde_json::to_value(OutboundEvent::control(true)).unwrap();
        assert_eq!(json, json!({ "payload": true }));
    }
}
