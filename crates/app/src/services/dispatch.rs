//! Dispatch coordinator — turns one canonical instruction into hub calls.
//!
//! | Target | Colour set | Hub calls |
//! |--------|------------|-----------|
//! | device | any | `set_device_state(id)` |
//! | group | no | `set_group_state(id)` |
//! | group | yes | `get_group(id)`, then concurrently `set_device_state(member)` for every member and `set_group_state(id)` without colour |
//!
//! The hub cannot set colour on a group, hence the fanout. All calls of a
//! fanout run together and are awaited together; the batch succeeds only if
//! every call does. Nothing serializes two fanouts aimed at the same group,
//! so overlapping requests may interleave their writes.

use std::sync::Arc;

use futures::future::{join, join_all};

use lightgate_domain::error::{FanoutError, HubError, LightgateError};
use lightgate_domain::id::GroupId;
use lightgate_domain::instruction::Instruction;
use lightgate_domain::outcome::DispatchOutcome;
use lightgate_domain::target::Target;

use crate::ports::{HubClient, NodeSink};

/// Issues the hub calls for a control request and reduces their results.
pub struct DispatchCoordinator<H, S> {
    hub: Arc<H>,
    sink: S,
}

impl<H: HubClient, S: NodeSink> DispatchCoordinator<H, S> {
    /// Create a coordinator over a shared hub connection. Failures are
    /// reported to `sink`.
    pub fn new(hub: Arc<H>, sink: S) -> Self {
        Self { hub, sink }
    }

    /// Dispatch `instruction` to `target` and report the outcome.
    ///
    /// Never fails: hub errors are reported on the sink's error channel and
    /// folded into the returned [`DispatchOutcome`].
    pub async fn dispatch(&self, target: Target, instruction: &Instruction) -> DispatchOutcome {
        DispatchOutcome::from(&self.execute(target, instruction).await)
    }

    /// Like [`dispatch`](Self::dispatch) but hands back the typed error after
    /// reporting it, for callers that need to tell failures apart.
    ///
    /// # Errors
    ///
    /// Same as [`try_dispatch`](Self::try_dispatch).
    #[tracing::instrument(skip_all, fields(to = %target))]
    pub async fn execute(
        &self,
        target: Target,
        instruction: &Instruction,
    ) -> Result<(), LightgateError> {
        let result = self.try_dispatch(target, instruction).await;
        if let Err(err) = &result {
            tracing::warn!(error = %err, "dispatch failed");
            self.sink.report_error(err.to_string());
        }
        result
    }

    /// Dispatch without reporting.
    ///
    /// # Errors
    ///
    /// Returns [`LightgateError::Hub`] when a single call (or the membership
    /// lookup) fails, and [`LightgateError::Fanout`] when any call of a
    /// colour fanout fails.
    pub async fn try_dispatch(
        &self,
        target: Target,
        instruction: &Instruction,
    ) -> Result<(), LightgateError> {
        match target {
            Target::Device(id) => {
                tracing::debug!(device = %id, "setting device state");
                self.hub.set_device_state(id, instruction).await?;
            }
            Target::Group(id) if instruction.color.is_none() => {
                tracing::debug!(group = %id, "setting group state");
                self.hub.set_group_state(id, instruction).await?;
            }
            Target::Group(id) => self.fan_out(id, instruction).await?,
        }
        Ok(())
    }

    async fn fan_out(&self, id: GroupId, instruction: &Instruction) -> Result<(), LightgateError> {
        let group = self.hub.get_group(id).await?;
        tracing::debug!(group = %id, members = group.devices.len(), "fanning out colour");

        let group_instruction = instruction.without_color();
        let member_calls = group
            .devices
            .iter()
            .map(|member| self.hub.set_device_state(*member, instruction));

        let (member_results, group_result) = join(
            join_all(member_calls),
            self.hub.set_group_state(id, &group_instruction),
        )
        .await;

        reduce_batch(member_results.into_iter().chain([group_result]))?;
        Ok(())
    }
}

/// Reduce the settled results of a batch: success only if every call
/// succeeded, otherwise the first failure in launch order.
///
/// # Errors
///
/// Returns a [`FanoutError`] carrying the first failure and the failure count.
pub fn reduce_batch(
    results: impl IntoIterator<Item = Result<(), HubError>>,
) -> Result<(), FanoutError> {
    let mut total = 0;
    let mut failed = 0;
    let mut first = None;
    for result in results {
        total += 1;
        if let Err(err) = result {
            failed += 1;
            first.get_or_insert(err);
        }
    }
    match first {
        None => Ok(()),
        Some(first) => Err(FanoutError {
            failed,
            total,
            first,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use lightgate_domain::hub::{Device, Group};
    use lightgate_domain::id::DeviceId;
    use lightgate_domain::instruction::Power;
    use tokio::sync::Barrier;

    use crate::test_support::{HubCall, RecordingHub, RecordingSink};

    type TestCoordinator = DispatchCoordinator<RecordingHub, Arc<RecordingSink>>;

    fn coordinator(hub: RecordingHub) -> (TestCoordinator, Arc<RecordingHub>, Arc<RecordingSink>) {
        let hub = Arc::new(hub);
        let sink = Arc::new(RecordingSink::default());
        (
            DispatchCoordinator::new(Arc::clone(&hub), Arc::clone(&sink)),
            hub,
            sink,
        )
    }

    fn colour(color: &str) -> Instruction {
        Instruction {
            power: Some(Power::On),
            brightness: Some(120),
            color: Some(color.to_string()),
            ..Instruction::default()
        }
    }

    #[tokio::test]
    async fn should_issue_one_device_call_for_device_target() {
        let (coordinator, hub, _) = coordinator(RecordingHub::default().with_device(7));
        let instruction = colour("ff0000");

        let outcome = coordinator
            .dispatch(Target::Device(DeviceId::new(7)), &instruction)
            .await;

        assert_eq!(outcome, DispatchOutcome::succeeded());
        assert_eq!(
            hub.calls(),
            vec![HubCall::SetDevice(DeviceId::new(7), instruction)]
        );
    }

    #[tokio::test]
    async fn should_issue_one_group_call_when_no_colour() {
        let (coordinator, hub, _) = coordinator(RecordingHub::default().with_group(1, &[10, 11]));
        let instruction = Instruction {
            brightness: Some(40),
            ..Instruction::default()
        };

        let outcome = coordinator
            .dispatch(Target::Group(GroupId::new(1)), &instruction)
            .await;

        assert!(outcome.success);
        assert_eq!(hub.group_writes(), vec![(GroupId::new(1), instruction)]);
        assert!(hub.device_writes().is_empty());
        assert!(!hub.calls().contains(&HubCall::GetGroup(GroupId::new(1))));
    }

    #[tokio::test]
    async fn should_fan_colour_out_to_every_member() {
        let (coordinator, hub, sink) =
            coordinator(RecordingHub::default().with_group(1, &[10, 11, 12]));
        let instruction = colour("00ff00");

        let outcome = coordinator
            .dispatch(Target::Group(GroupId::new(1)), &instruction)
            .await;

        assert!(outcome.success);
        assert_eq!(hub.calls()[0], HubCall::GetGroup(GroupId::new(1)));

        let mut members: Vec<_> = hub.device_writes().into_iter().map(|(id, _)| id).collect();
        members.sort();
        assert_eq!(
            members,
            vec![DeviceId::new(10), DeviceId::new(11), DeviceId::new(12)]
        );
        assert!(
            hub.device_writes()
                .iter()
                .all(|(_, sent)| sent.color.as_deref() == Some("00ff00"))
        );

        let group_writes = hub.group_writes();
        assert_eq!(group_writes.len(), 1);
        assert_eq!(group_writes[0].1, instruction.without_color());
        assert!(sink.errors().is_empty());
    }

    #[tokio::test]
    async fn should_fail_whole_fanout_when_one_member_fails() {
        let (coordinator, hub, sink) = coordinator(
            RecordingHub::default()
                .with_group(1, &[10, 11, 12])
                .failing_device(11),
        );

        let outcome = coordinator
            .dispatch(Target::Group(GroupId::new(1)), &colour("0000ff"))
            .await;

        assert!(!outcome.success);
        let error = outcome.error.unwrap();
        assert_eq!(
            error,
            "1 of 4 hub calls failed: hub unreachable: device 11 did not answer"
        );
        // every call was still issued
        assert_eq!(hub.device_writes().len(), 3);
        assert_eq!(hub.group_writes().len(), 1);
        assert_eq!(sink.errors(), vec![error]);
    }

    #[tokio::test]
    async fn should_keep_only_first_failure_in_launch_order() {
        let (coordinator, _, _) = coordinator(
            RecordingHub::default()
                .with_group(1, &[10, 11])
                .failing_device(11)
                .failing_group_writes(),
        );

        let err = coordinator
            .try_dispatch(Target::Group(GroupId::new(1)), &colour("0000ff"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            LightgateError::Fanout(FanoutError {
                failed: 2,
                total: 3,
                first: HubError::Unreachable("device 11 did not answer".to_string()),
            })
        );
    }

    #[tokio::test]
    async fn should_abort_fanout_when_group_is_unknown() {
        let (coordinator, hub, sink) = coordinator(RecordingHub::default());

        let outcome = coordinator
            .dispatch(Target::Group(GroupId::new(42)), &colour("ffffff"))
            .await;

        assert_eq!(outcome.error.as_deref(), Some("group 42 not found"));
        assert_eq!(hub.calls(), vec![HubCall::GetGroup(GroupId::new(42))]);
        assert_eq!(sink.errors().len(), 1);
    }

    #[tokio::test]
    async fn should_report_single_call_failure() {
        let (coordinator, _, sink) =
            coordinator(RecordingHub::default().with_device(3).failing_device(3));

        let outcome = coordinator
            .dispatch(Target::Device(DeviceId::new(3)), &Instruction::default())
            .await;

        assert!(!outcome.success);
        assert_eq!(
            sink.errors(),
            vec!["hub unreachable: device 3 did not answer".to_string()]
        );
    }

    #[tokio::test]
    async fn should_still_call_group_when_group_has_no_members() {
        let (coordinator, hub, _) = coordinator(RecordingHub::default().with_group(2, &[]));

        let outcome = coordinator
            .dispatch(Target::Group(GroupId::new(2)), &colour("123456"))
            .await;

        assert!(outcome.success);
        assert!(hub.device_writes().is_empty());
        assert_eq!(hub.group_writes().len(), 1);
    }

    #[test]
    fn should_reduce_empty_batch_to_success() {
        assert!(reduce_batch(std::iter::empty()).is_ok());
    }

    /// Hub whose writes only complete once every write of the batch has
    /// started, which deadlocks unless the calls run concurrently.
    struct BarrierHub {
        group: Group,
        barrier: Barrier,
    }

    impl HubClient for BarrierHub {
        async fn get_device(&self, id: DeviceId) -> Result<Device, HubError> {
            Err(HubError::device_not_found(id))
        }

        async fn get_group(&self, _id: GroupId) -> Result<Group, HubError> {
            Ok(self.group.clone())
        }

        async fn get_devices(&self) -> Result<Vec<Device>, HubError> {
            Ok(vec![])
        }

        async fn get_groups(&self) -> Result<Vec<Group>, HubError> {
            Ok(vec![self.group.clone()])
        }

        async fn set_device_state(&self, _id: DeviceId, _i: &Instruction) -> Result<(), HubError> {
            self.barrier.wait().await;
            Ok(())
        }

        async fn set_group_state(&self, _id: GroupId, _i: &Instruction) -> Result<(), HubError> {
            self.barrier.wait().await;
            Ok(())
        }
    }

    #[tokio::test]
    async fn should_run_fanout_calls_concurrently() {
        let members = vec![DeviceId::new(1), DeviceId::new(2), DeviceId::new(3)];
        let hub = Arc::new(BarrierHub {
            barrier: Barrier::new(members.len() + 1),
            group: Group::new(GroupId::new(9), "Kitchen", members),
        });
        let coordinator = DispatchCoordinator::new(hub, Arc::new(RecordingSink::default()));

        let outcome = tokio::time::timeout(
            Duration::from_secs(5),
            coordinator.dispatch(Target::Group(GroupId::new(9)), &colour("abcdef")),
        )
        .await
        .expect("fanout calls should not wait on each other");

        assert!(outcome.success);
    }
}
