//! In-memory port implementations shared by the unit tests.

use std::collections::HashSet;
use std::sync::Mutex;

use lightgate_domain::error::HubError;
use lightgate_domain::event::OutboundEvent;
use lightgate_domain::hub::{Device, Group};
use lightgate_domain::id::{DeviceId, GroupId};
use lightgate_domain::instruction::Instruction;

use crate::ports::{HubClient, NodeSink};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum HubCall {
    GetDevice(DeviceId),
    GetGroup(GroupId),
    GetDevices,
    GetGroups,
    SetDevice(DeviceId, Instruction),
    SetGroup(GroupId, Instruction),
}

/// Hub stub that records every call and fails on demand.
#[derive(Default)]
pub(crate) struct RecordingHub {
    devices: Vec<Device>,
    groups: Vec<Group>,
    failing_devices: HashSet<DeviceId>,
    fail_group_writes: bool,
    calls: Mutex<Vec<HubCall>>,
}

impl RecordingHub {
    pub(crate) fn with_device(mut self, id: u32) -> Self {
        self.devices
            .push(Device::new(DeviceId::new(id), format!("Light {id}")));
        self
    }

    pub(crate) fn with_group(mut self, id: u32, members: &[u32]) -> Self {
        for member in members {
            self = self.with_device(*member);
        }
        self.groups.push(Group::new(
            GroupId::new(id),
            format!("Group {id}"),
            members.iter().copied().map(DeviceId::new).collect(),
        ));
        self
    }

    pub(crate) fn failing_device(mut self, id: u32) -> Self {
        self.failing_devices.insert(DeviceId::new(id));
        self
    }

    pub(crate) fn failing_group_writes(mut self) -> Self {
        self.fail_group_writes = true;
        self
    }

    pub(crate) fn calls(&self) -> Vec<HubCall> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn device_writes(&self) -> Vec<(DeviceId, Instruction)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                HubCall::SetDevice(id, instruction) => Some((id, instruction)),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn group_writes(&self) -> Vec<(GroupId, Instruction)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                HubCall::SetGroup(id, instruction) => Some((id, instruction)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: HubCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl HubClient for RecordingHub {
    async fn get_device(&self, id: DeviceId) -> Result<Device, HubError> {
        self.record(HubCall::GetDevice(id));
        self.devices
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or(HubError::device_not_found(id))
    }

    async fn get_group(&self, id: GroupId) -> Result<Group, HubError> {
        self.record(HubCall::GetGroup(id));
        self.groups
            .iter()
            .find(|g| g.id == id)
            .cloned()
            .ok_or(HubError::group_not_found(id))
    }

    async fn get_devices(&self) -> Result<Vec<Device>, HubError> {
        self.record(HubCall::GetDevices);
        Ok(self.devices.clone())
    }

    async fn get_groups(&self) -> Result<Vec<Group>, HubError> {
        self.record(HubCall::GetGroups);
        Ok(self.groups.clone())
    }

    async fn set_device_state(
        &self,
        id: DeviceId,
        instruction: &Instruction,
    ) -> Result<(), HubError> {
        self.record(HubCall::SetDevice(id, instruction.clone()));
        if self.failing_devices.contains(&id) {
            return Err(HubError::Unreachable(format!("device {id} did not answer")));
        }
        Ok(())
    }

    async fn set_group_state(
        &self,
        id: GroupId,
        instruction: &Instruction,
    ) -> Result<(), HubError> {
        self.record(HubCall::SetGroup(id, instruction.clone()));
        if self.fail_group_writes {
            return Err(HubError::Unreachable(format!("group {id} did not answer")));
        }
        Ok(())
    }
}

/// Sink that keeps everything it receives.
#[derive(Default)]
pub(crate) struct RecordingSink {
    outputs: Mutex<Vec<OutboundEvent>>,
    errors: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub(crate) fn outputs(&self) -> Vec<OutboundEvent> {
        self.outputs.lock().unwrap().clone()
    }

    pub(crate) fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

impl NodeSink for RecordingSink {
    fn emit(&self, event: OutboundEvent) {
        self.outputs.lock().unwrap().push(event);
    }

    fn report_error(&self, message: String) {
        self.errors.lock().unwrap().push(message);
    }
}
