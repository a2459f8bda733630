//! Hub port — the operations the core needs from the hub client.
//!
//! The hub client owns the connection and the wire protocol. It is shared by
//! reference across concurrent requests and must accept concurrent calls.

use std::future::Future;

use lightgate_domain::error::HubError;
use lightgate_domain::hub::{Device, Group, HubSnapshot};
use lightgate_domain::id::{DeviceId, GroupId};
use lightgate_domain::instruction::Instruction;

/// Read and write access to the lighting hub.
pub trait HubClient: Send + Sync {
    /// Fetch one device.
    fn get_device(&self, id: DeviceId) -> impl Future<Output = Result<Device, HubError>> + Send;

    /// Fetch one group, including its current membership.
    fn get_group(&self, id: GroupId) -> impl Future<Output = Result<Group, HubError>> + Send;

    /// Fetch every device.
    fn get_devices(&self) -> impl Future<Output = Result<Vec<Device>, HubError>> + Send;

    /// Fetch every group.
    fn get_groups(&self) -> impl Future<Output = Result<Vec<Group>, HubError>> + Send;

    /// Fetch every device and group.
    ///
    /// The default implementation issues [`get_devices`](Self::get_devices)
    /// and [`get_groups`](Self::get_groups) concurrently.
    fn get_all(&self) -> impl Future<Output = Result<HubSnapshot, HubError>> + Send {
        async move {
            let (devices, groups) =
                futures::future::try_join(self.get_devices(), self.get_groups()).await?;
            Ok(HubSnapshot { devices, groups })
        }
    }

    /// Apply the set fields of `instruction` to one device.
    fn set_device_state(
        &self,
        id: DeviceId,
        instruction: &Instruction,
    ) -> impl Future<Output = Result<(), HubError>> + Send;

    /// Apply the set fields of `instruction` to a group. The hub ignores
    /// colour at this level.
    fn set_group_state(
        &self,
        id: GroupId,
        instruction: &Instruction,
    ) -> impl Future<Output = Result<(), HubError>> + Send;
}

/// Registration of a new client identity with the hub.
pub trait HubPairing: Send + Sync {
    /// Register `identity` using the security code printed on the hub and
    /// return the pre-shared key issued for it.
    fn authenticate(
        &self,
        identity: &str,
        security_code: &str,
    ) -> impl Future<Output = Result<String, HubError>> + Send;
}
