//! # lightgate-adapter-virtual
//!
//! Simulated lighting hub for testing and demonstration.
//!
//! ## Behaviour
//!
//! | Call | Effect |
//! |------|--------|
//! | `get_device` / `get_group` | Current snapshot, or `NotFound` |
//! | `set_device_state` | Merges the instruction into the device; `Unreachable` if the device is marked offline |
//! | `set_group_state` | Updates the group and applies power/brightness to every reachable member; colour is ignored like on real hubs |
//! | `authenticate` | Issues a random pre-shared key when the security code matches |
//!
//! Every call can be delayed by a configurable latency to exercise the
//! concurrent paths of the dispatcher.
//!
//! ## Dependency rule
//!
//! Depends on `lightgate-app` (port traits) and `lightgate-domain` only.

mod config;

pub use config::{VirtualDeviceConfig, VirtualGroupConfig, VirtualHubConfig};

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use lightgate_app::ports::{HubClient, HubPairing};
use lightgate_domain::error::HubError;
use lightgate_domain::hub::{Device, Group};
use lightgate_domain::id::{DeviceId, GroupId};
use lightgate_domain::instruction::Instruction;

#[derive(Default)]
struct HubState {
    devices: BTreeMap<DeviceId, Device>,
    groups: BTreeMap<GroupId, Group>,
}

/// In-memory hub implementing [`HubClient`] and [`HubPairing`].
pub struct VirtualHub {
    state: Mutex<HubState>,
    latency: Duration,
    security_code: Option<String>,
}

impl Default for VirtualHub {
    fn default() -> Self {
        Self::new(&VirtualHubConfig::default())
    }
}

impl VirtualHub {
    /// Build a hub populated from `config`.
    #[must_use]
    pub fn new(config: &VirtualHubConfig) -> Self {
        let mut state = HubState::default();
        for device in &config.devices {
            let mut entry = Device::new(DeviceId::new(device.id), device.name.clone());
            entry.model.clone_from(&device.model);
            state.devices.insert(entry.id, entry);
        }
        for group in &config.groups {
            let entry = Group::new(
                GroupId::new(group.id),
                group.name.clone(),
                group.devices.iter().copied().map(DeviceId::new).collect(),
            );
            state.groups.insert(entry.id, entry);
        }
        Self {
            state: Mutex::new(state),
            latency: Duration::from_millis(config.latency_ms),
            security_code: config.security_code.clone(),
        }
    }

    /// Mark a device as reachable or not. Writes to an unreachable device fail.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::NotFound`] if the device does not exist.
    pub fn set_reachable(&self, id: DeviceId, reachable: bool) -> Result<(), HubError> {
        let mut state = self.lock();
        let device = state
            .devices
            .get_mut(&id)
            .ok_or(HubError::device_not_found(id))?;
        device.alive = reachable;
        Ok(())
    }

    /// Replace the membership of a group, as a change made from another
    /// client would.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::NotFound`] if the group does not exist.
    pub fn set_members(&self, id: GroupId, devices: Vec<DeviceId>) -> Result<(), HubError> {
        let mut state = self.lock();
        let group = state
            .groups
            .get_mut(&id)
            .ok_or(HubError::group_not_found(id))?;
        group.devices = devices;
        Ok(())
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn lock(&self) -> MutexGuard<'_, HubState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl HubClient for VirtualHub {
    async fn get_device(&self, id: DeviceId) -> Result<Device, HubError> {
        self.simulate_latency().await;
        self.lock()
            .devices
            .get(&id)
            .cloned()
            .ok_or(HubError::device_not_found(id))
    }

    async fn get_group(&self, id: GroupId) -> Result<Group, HubError> {
        self.simulate_latency().await;
        self.lock()
            .groups
            .get(&id)
            .cloned()
            .ok_or(HubError::group_not_found(id))
    }

    async fn get_devices(&self) -> Result<Vec<Device>, HubError> {
        self.simulate_latency().await;
        Ok(self.lock().devices.values().cloned().collect())
    }

    async fn get_groups(&self) -> Result<Vec<Group>, HubError> {
        self.simulate_latency().await;
        Ok(self.lock().groups.values().cloned().collect())
    }

    async fn set_device_state(
        &self,
        id: DeviceId,
        instruction: &Instruction,
    ) -> Result<(), HubError> {
        self.simulate_latency().await;
        let mut state = self.lock();
        let device = state
            .devices
            .get_mut(&id)
            .ok_or(HubError::device_not_found(id))?;
        if !device.alive {
            return Err(HubError::Unreachable(format!(
                "device {id} is not responding"
            )));
        }
        device.state.apply(instruction);
        tracing::debug!(device = %id, ?instruction, "virtual device updated");
        Ok(())
    }

    async fn set_group_state(
        &self,
        id: GroupId,
        instruction: &Instruction,
    ) -> Result<(), HubError> {
        self.simulate_latency().await;
        let mut state = self.lock();
        let HubState { devices, groups } = &mut *state;
        let group = groups.get_mut(&id).ok_or(HubError::group_not_found(id))?;
        group.apply(instruction);

        let member_instruction = instruction.without_color();
        for member in &group.devices {
            if let Some(device) = devices.get_mut(member).filter(|d| d.alive) {
                device.state.apply(&member_instruction);
            }
        }
        tracing::debug!(group = %id, ?instruction, "virtual group updated");
        Ok(())
    }
}

impl HubPairing for VirtualHub {
    async fn authenticate(&self, identity: &str, security_code: &str) -> Result<String, HubError> {
        self.simulate_latency().await;
        if let Some(expected) = &self.security_code
            && expected != security_code
        {
            return Err(HubError::Rejected(format!(
                "invalid security code for identity {identity}"
            )));
        }
        Ok(uuid::Uuid::new_v4().simple().to_string()[..16].to_string())
    }
}
