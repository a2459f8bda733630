//! Query node — read path. Emits the fetched object downstream.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use lightgate_domain::error::LightgateError;
use lightgate_domain::event::{InboundEvent, OutboundEvent};
use lightgate_domain::target::{ReadTarget, TargetSpec};

use crate::ports::{HubClient, NodeSink};
use crate::services::query_service::{QueryService, ReadResult};

/// Handles read requests for one device, one group, or everything.
pub struct QueryNode<H, S> {
    target: TargetSpec,
    service: QueryService<H>,
    sink: S,
}

impl<H: HubClient, S: NodeSink> QueryNode<H, S> {
    /// `target` is the node-level target; a non-zero id overrides the request.
    pub fn new(target: TargetSpec, hub: Arc<H>, sink: S) -> Self {
        Self {
            target,
            service: QueryService::new(hub),
            sink,
        }
    }

    /// Fetch what the event asks for and emit it. Failures are reported on
    /// the error channel and nothing is emitted.
    ///
    /// # Errors
    ///
    /// Returns the configuration or hub error that was reported.
    #[tracing::instrument(skip_all)]
    pub async fn handle(&self, event: &InboundEvent) -> Result<ReadResult, LightgateError> {
        let result = self.read(event).await;
        match &result {
            Ok(read) => match serde_json::to_value(read) {
                Ok(payload) => self.sink.emit(OutboundEvent::read(payload)),
                Err(err) => {
                    let message = format!("failed to encode read result: {err}");
                    self.sink.report_error(message);
                }
            },
            Err(err) => {
                tracing::warn!(error = %err, "read failed");
                self.sink.report_error(err.to_string());
            }
        }
        result
    }

    async fn read(&self, event: &InboundEvent) -> Result<ReadResult, LightgateError> {
        let target = ReadTarget::resolve(&self.target, &event.target_spec())?;
        Ok(self.service.read(target).await?)
    }
}

impl<H, S> QueryNode<H, S>
where
    H: HubClient + 'static,
    S: NodeSink + 'static,
{
    /// Drain `events` until the channel closes, one task per read request.
    pub async fn run(self: Arc<Self>, mut events: mpsc::Receiver<InboundEvent>) {
        let mut in_flight = JoinSet::new();
        while let Some(event) = events.recv().await {
            let node = Arc::clone(&self);
            in_flight.spawn(async move {
                // already reported on the error channel
                let _ = node.handle(&event).await;
            });
            while in_flight.try_join_next().is_some() {}
        }
        while in_flight.join_next().await.is_some() {}
        tracing::debug!("query event channel closed");
    }
}
