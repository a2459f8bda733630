//! Control node — resolve, normalize, dispatch, report.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use lightgate_domain::error::{ConfigurationError, LightgateError};
use lightgate_domain::event::{InboundEvent, OutboundEvent};
use lightgate_domain::instruction::Instruction;
use lightgate_domain::outcome::DispatchOutcome;
use lightgate_domain::target::{Target, TargetSpec};

use crate::ports::{HubClient, NodeSink};
use crate::services::dispatch::DispatchCoordinator;

/// Per-node settings.
#[derive(Debug, Clone, Default)]
pub struct ControlNodeConfig {
    /// Fixed target. A non-zero id here overrides whatever the request names.
    pub target: TargetSpec,
    /// Emit a success flag downstream after every request.
    pub send_output: bool,
}

/// Handles control requests: one [`DispatchOutcome`] per inbound event.
pub struct ControlNode<H, S> {
    config: ControlNodeConfig,
    coordinator: DispatchCoordinator<H, S>,
    sink: S,
}

impl<H: HubClient, S: NodeSink + Clone> ControlNode<H, S> {
    pub fn new(config: ControlNodeConfig, hub: Arc<H>, sink: S) -> Self {
        Self {
            config,
            coordinator: DispatchCoordinator::new(hub, sink.clone()),
            sink,
        }
    }

    /// Process one inbound event.
    ///
    /// Requests whose target or instruction cannot be resolved are reported
    /// on the error channel and never reach the hub.
    pub async fn handle(&self, event: InboundEvent) -> DispatchOutcome {
        DispatchOutcome::from(&self.submit(event).await)
    }

    /// Process one inbound event and return the typed failure, if any. The
    /// error is reported and the output emitted exactly as for
    /// [`handle`](Self::handle).
    ///
    /// # Errors
    ///
    /// Returns [`LightgateError::Configuration`] when the request is rejected
    /// before reaching the hub, otherwise the dispatch error.
    #[tracing::instrument(skip_all)]
    pub async fn submit(&self, event: InboundEvent) -> Result<(), LightgateError> {
        let result = match self.prepare(&event) {
            Ok((target, instruction)) => self.coordinator.execute(target, &instruction).await,
            Err(err) => {
                tracing::warn!(error = %err, "rejected control request");
                let err = LightgateError::from(err);
                self.sink.report_error(err.to_string());
                Err(err)
            }
        };
        if self.config.send_output {
            self.sink.emit(OutboundEvent::control(result.is_ok()));
        }
        result
    }

    fn prepare(&self, event: &InboundEvent) -> Result<(Target, Instruction), ConfigurationError> {
        let target = Target::resolve(&self.config.target, &event.target_spec())?;
        let raw = event.raw_instruction()?;
        if raw.is_legacy() {
            tracing::warn!(
                %target,
                "instruction object in payload is deprecated, send top-level fields instead"
            );
        }
        Ok((target, raw.normalize()?))
    }
}

impl<H, S> ControlNode<H, S>
where
    H: HubClient + 'static,
    S: NodeSink + Clone + 'static,
{
    /// Drain `events` until the channel closes, handling every event on its
    /// own task so a slow request never holds up the next one. Returns once
    /// all in-flight requests have settled.
    pub async fn run(self: Arc<Self>, mut events: mpsc::Receiver<InboundEvent>) {
        let mut in_flight = JoinSet::new();
        while let Some(event) = events.recv().await {
            let node = Arc::clone(&self);
            in_flight.spawn(async move {
                node.handle(event).await;
            });
            while in_flight.try_join_next().is_some() {}
        }
        while in_flight.join_next().await.is_some() {}
        tracing::debug!("control event channel closed");
    }
}
