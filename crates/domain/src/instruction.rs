//! Instruction — the canonical "set state" request sent to the hub.
//!
//! Callers hand in a loosely typed [`PartialInstruction`]; [`Instruction::normalize`]
//! turns it into the sparse, hub-ready form with the cross-field rules applied:
//!
//! 1. brightness `0` forces power `off`;
//! 2. otherwise power `off` forces brightness `0`;
//! 3. brightness is capped at [`MAX_BRIGHTNESS`];
//! 4. colour loses one leading `#` and is lowercased;
//! 5. colour temperature and transition time are multiplied by [`HUB_UNIT_SCALE`].
//!
//! Rule 1 is checked first, so `{brightness: 0, state: "on"}` turns the light off.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ConfigurationError;

/// Highest brightness level the hub accepts.
pub const MAX_BRIGHTNESS: u8 = 254;

/// Factor between request-level units and hub-native units for colour
/// temperature and transition time.
pub const HUB_UNIT_SCALE: u32 = 10;

/// Requested power state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Power {
    On,
    Off,
}

impl Power {
    /// Parse `on` / `off`, ignoring surrounding whitespace and case.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.eq_ignore_ascii_case("on") {
            Some(Self::On)
        } else if text.eq_ignore_ascii_case("off") {
            Some(Self::Off)
        } else {
            None
        }
    }
}

impl std::fmt::Display for Power {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::On => f.write_str("on"),
            Self::Off => f.write_str("off"),
        }
    }
}

/// Instruction fields exactly as supplied by the caller, before any rule runs.
///
/// Numbers are kept signed so that malformed (negative) values can be told
/// apart from legitimate ones during normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialInstruction {
    pub power: Option<Power>,
    pub brightness: Option<i64>,
    pub color: Option<String>,
    /// Colour temperature in request-level units.
    pub mired: Option<i64>,
    /// Transition time in request-level units.
    pub transition_time: Option<i64>,
}

impl PartialInstruction {
    /// Pick the instruction fields out of a loosely typed JSON object.
    ///
    /// Unknown keys are ignored and values of the wrong shape are treated as
    /// absent.
    #[must_use]
    pub fn from_json_object(object: &Map<String, Value>) -> Self {
        Self {
            power: object.get("state").and_then(loose_power),
            brightness: object.get("brightness").and_then(loose_integer),
            color: object.get("color").and_then(loose_string),
            mired: object.get("mired").and_then(loose_integer),
            transition_time: object.get("transitiontime").and_then(loose_integer),
        }
    }

    /// Whether no field at all was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.power.is_none()
            && self.brightness.is_none()
            && self.color.is_none()
            && self.mired.is_none()
            && self.transition_time.is_none()
    }
}

/// Canonical, hub-ready instruction. Unset fields are omitted from hub calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instruction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<Power>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_temperature: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_time: Option<u32>,
}

impl Instruction {
    /// Apply the normalization rules to a caller-supplied instruction.
    #[must_use]
    pub fn normalize(raw: &PartialInstruction) -> Self {
        let mut instruction = Self {
            power: raw.power,
            brightness: raw.brightness.and_then(clamp_brightness),
            color: raw.color.as_deref().map(normalize_color),
            color_temperature: raw.mired.and_then(scale_to_hub),
            transition_time: raw.transition_time.and_then(scale_to_hub),
        };

        if raw.brightness == Some(0) {
            instruction.power = Some(Power::Off);
        } else if raw.power == Some(Power::Off) {
            instruction.brightness = Some(0);
        }

        instruction
    }

    /// Build the instruction for a plain string command (`on` / `off`).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnrecognisedCommand`] for anything else.
    pub fn from_command(command: &str) -> Result<Self, ConfigurationError> {
        let power = Power::parse(command)
            .ok_or_else(|| ConfigurationError::UnrecognisedCommand(command.trim().to_string()))?;
        Ok(Self::normalize(&PartialInstruction {
            power: Some(power),
            ..PartialInstruction::default()
        }))
    }

    /// Same instruction with the colour dropped, for the group-level call of a
    /// colour fanout.
    #[must_use]
    pub fn without_color(&self) -> Self {
        Self {
            color: None,
            ..self.clone()
        }
    }
}

/// Strip one leading `#` and lowercase. The hex format itself is not checked.
#[must_use]
pub fn normalize_color(color: &str) -> String {
    color.strip_prefix('#').unwrap_or(color).to_lowercase()
}

fn clamp_brightness(value: i64) -> Option<u8> {
    if value < 0 {
        return None;
    }
    let value = u8::try_from(value).unwrap_or(u8::MAX);
    Some(value.min(MAX_BRIGHTNESS))
}

/// Saturates at `u32::MAX` rather than dropping oversized values.
fn scale_to_hub(value: i64) -> Option<u32> {
    if value < 0 {
        return None;
    }
    let value = u32::try_from(value).unwrap_or(u32::MAX);
    Some(value.saturating_mul(HUB_UNIT_SCALE))
}

/// Numbers outside the `i64` range saturate. Fractions round toward negative
/// infinity, so a negative fraction stays negative.
fn loose_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|_| i64::MAX))
            .or_else(|| n.as_f64().and_then(float_to_integer)),
        Value::String(s) => {
            let s = s.trim();
            s.parse()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(float_to_integer))
        }
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn float_to_integer(value: f64) -> Option<i64> {
    // `as` saturates at the i64 bounds
    if value.is_finite() {
        Some(value.floor() as i64)
    } else {
        None
    }
}

fn loose_power(value: &Value) -> Option<Power> {
    match value {
        Value::String(s) => Power::parse(s),
        Value::Bool(true) => Some(Power::On),
        Value::Bool(false) => Some(Power::Off),
        _ => None,
    }
}

fn loose_string(value: &Value) -> Option<String> {
    value.as_str().map(ToString::to_string)
}

/// Parse a loosely typed id (JSON number or numeric string).
pub(crate) fn loose_id(value: &Value) -> Option<u32> {
    loose_integer(value).and_then(|v| u32::try_from(v).ok())
}
