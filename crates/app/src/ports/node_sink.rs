//! Node sink port — where a node sends its results.

use std::sync::Arc;

use lightgate_domain::event::OutboundEvent;

/// Receives the outbound events and the operator-visible error messages of
/// a node.
pub trait NodeSink: Send + Sync {
    /// Send an event downstream on the host channel.
    fn emit(&self, event: OutboundEvent);

    /// Report a human-readable error, independently of any outbound event.
    fn report_error(&self, message: String);
}

impl<T: NodeSink> NodeSink for Arc<T> {
    fn emit(&self, event: OutboundEvent) {
        (**self).emit(event);
    }

    fn report_error(&self, message: String) {
        (**self).report_error(message);
    }
}
