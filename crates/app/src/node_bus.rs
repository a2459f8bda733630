//! In-process node bus backed by tokio broadcast channels.

use tokio::sync::broadcast;

use lightgate_domain::event::OutboundEvent;

use crate::ports::NodeSink;

/// In-process [`NodeSink`] using two tokio [`broadcast`] channels: one for
/// outbound events, one for operator-visible errors.
///
/// Sending succeeds even when there are no active subscribers (the message
/// is simply dropped). Cloning shares the same channels.
#[derive(Clone)]
pub struct NodeBus {
    outputs: broadcast::Sender<OutboundEvent>,
    errors: broadcast::Sender<String>,
}

impl NodeBus {
    /// Create a new bus with the given per-channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (outputs, _) = broadcast::channel(capacity);
        let (errors, _) = broadcast::channel(capacity);
        Self { outputs, errors }
    }

    /// Subscribe to outbound events emitted *after* this call.
    #[must_use]
    pub fn subscribe_outputs(&self) -> broadcast::Receiver<OutboundEvent> {
        self.outputs.subscribe()
    }

    /// Subscribe to error messages reported *after* this call.
    #[must_use]
    pub fn subscribe_errors(&self) -> broadcast::Receiver<String> {
        self.errors.subscribe()
    }
}

impl NodeSink for NodeBus {
    fn emit(&self, event: OutboundEvent) {
        // fails only when there are no receivers
        let _ = self.outputs.send(event);
    }

    fn report_error(&self, message: String) {
        let _ = self.errors.send(message);
    }
}
