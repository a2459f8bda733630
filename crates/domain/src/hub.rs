//! Hub objects — devices, groups, and the enumeration of both.

use serde::{Deserialize, Serialize};

use crate::id::{DeviceId, GroupId};
use crate::instruction::{Instruction, Power};

/// Last known light state of a device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightState {
    pub on: bool,
    pub brightness: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_temperature: Option<u32>,
}

impl LightState {
    /// Merge the set fields of `instruction` into this state.
    pub fn apply(&mut self, instruction: &Instruction) {
        if let Some(power) = instruction.power {
            self.on = power == Power::On;
        }
        if let Some(brightness) = instruction.brightness {
            self.brightness = brightness;
        }
        if let Some(color) = &instruction.color {
            self.color = Some(color.clone());
        }
        if let Some(temperature) = instruction.color_temperature {
            self.color_temperature = Some(temperature);
        }
    }
}

/// A single light known to the hub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Whether the hub currently reaches the device.
    pub alive: bool,
    pub state: LightState,
}

impl Device {
    /// A reachable device that is switched off.
    #[must_use]
    pub fn new(id: DeviceId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            model: None,
            alive: true,
            state: LightState::default(),
        }
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// A named set of devices. The hub keeps membership; it may change at any time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub devices: Vec<DeviceId>,
    pub on: bool,
    pub brightness: u8,
}

impl Group {
    #[must_use]
    pub fn new(id: GroupId, name: impl Into<String>, devices: Vec<DeviceId>) -> Self {
        Self {
            id,
            name: name.into(),
            devices,
            on: false,
            brightness: 0,
        }
    }

    /// Merge the group-level fields (power, brightness) of `instruction`.
    /// Colour is not a group-level property on the hub.
    pub fn apply(&mut self, instruction: &Instruction) {
        if let Some(power) = instruction.power {
            self.on = power == Power::On;
        }
        if let Some(brightness) = instruction.brightness {
            self.brightness = brightness;
        }
    }
}

/// Everything the hub knows about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubSnapshot {
    pub devices: Vec<Device>,
    pub groups: Vec<Group>,
}
