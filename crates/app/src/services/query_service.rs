//! Query service — read-only pass-through to the hub.

use std::sync::Arc;

use serde::Serialize;

use lightgate_domain::error::HubError;
use lightgate_domain::hub::{Device, Group, HubSnapshot};
use lightgate_domain::id::{DeviceId, GroupId};
use lightgate_domain::target::ReadTarget;

use crate::ports::HubClient;

/// Whatever a read request fetched. Serializes as the bare object or list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ReadResult {
    Device(Device),
    Group(Group),
    Devices(Vec<Device>),
    Groups(Vec<Group>),
    All(HubSnapshot),
}

/// Application service for hub reads.
pub struct QueryService<H> {
    hub: Arc<H>,
}

impl<H: HubClient> QueryService<H> {
    /// Create a new service over a shared hub connection.
    pub fn new(hub: Arc<H>) -> Self {
        Self { hub }
    }

    /// # Errors
    ///
    /// Returns [`HubError::NotFound`] when the hub has no such device.
    #[tracing::instrument(skip(self))]
    pub async fn get_device(&self, id: DeviceId) -> Result<Device, HubError> {
        self.hub.get_device(id).await
    }

    /// # Errors
    ///
    /// Returns [`HubError::NotFound`] when the hub has no such group.
    #[tracing::instrument(skip(self))]
    pub async fn get_group(&self, id: GroupId) -> Result<Group, HubError> {
        self.hub.get_group(id).await
    }

    /// # Errors
    ///
    /// Returns the hub client's error.
    pub async fn list_devices(&self) -> Result<Vec<Device>, HubError> {
        self.hub.get_devices().await
    }

    /// # Errors
    ///
    /// Returns the hub client's error.
    pub async fn list_groups(&self) -> Result<Vec<Group>, HubError> {
        self.hub.get_groups().await
    }

    /// Every device and group known to the hub.
    ///
    /// # Errors
    ///
    /// Returns the hub client's error.
    pub async fn snapshot(&self) -> Result<HubSnapshot, HubError> {
        self.hub.get_all().await
    }

    /// Fetch whatever `target` names.
    ///
    /// # Errors
    ///
    /// Returns the hub client's error.
    #[tracing::instrument(skip(self))]
    pub async fn read(&self, target: ReadTarget) -> Result<ReadResult, HubError> {
        Ok(match target {
            ReadTarget::Device(id) => ReadResult::Device(self.get_device(id).await?),
            ReadTarget::Group(id) => ReadResult::Group(self.get_group(id).await?),
            ReadTarget::Devices => ReadResult::Devices(self.list_devices().await?),
            ReadTarget::Groups => ReadResult::Groups(self.list_groups().await?),
            ReadTarget::All => ReadResult::All(self.snapshot().await?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::test_support::{HubCall, RecordingHub};

    fn make_service() -> (QueryService<RecordingHub>, Arc<RecordingHub>) {
        let hub = Arc::new(
            RecordingHub::default()
                .with_group(1, &[10, 11])
                .with_device(12),
        );
        (QueryService::new(Arc::clone(&hub)), hub)
    }

    #[tokio::test]
    async fn should_fetch_single_device() {
        let (svc, _) = make_service();
        let device = svc.get_device(DeviceId::new(12)).await.unwrap();
        assert_eq!(device.name, "Light 12");
    }

    #[tokio::test]
    async fn should_return_not_found_for_unknown_group() {
        let (svc, _) = make_service();
        let err = svc.get_group(GroupId::new(99)).await.unwrap_err();
        assert_eq!(err, HubError::group_not_found(GroupId::new(99)));
    }

    #[tokio::test]
    async fn should_read_everything_through_both_listings() {
        let (svc, hub) = make_service();
        let ReadResult::All(snapshot) = svc.read(ReadTarget::All).await.unwrap() else {
            panic!("expected a snapshot");
        };
        assert_eq!(snapshot.devices.len(), 3);
        assert_eq!(snapshot.groups.len(), 1);

        let calls = hub.calls();
        assert!(calls.contains(&HubCall::GetDevices));
        assert!(calls.contains(&HubCall::GetGroups));
    }

    #[tokio::test]
    async fn should_list_groups_for_group_listing() {
        let (svc, _) = make_service();
        let result = svc.read(ReadTarget::Groups).await.unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["devices"], serde_json::json!([10, 11]));
    }
}
