//! Shared application state for axum handlers.

use std::sync::Arc;

use lightgate_app::nodes::ControlNode;
use lightgate_app::ports::{HubClient, HubPairing, NodeSink};
use lightgate_app::services::pairing_service::PairingService;
use lightgate_app::services::query_service::QueryService;

/// Application state shared across all axum handlers.
///
/// Generic over the hub client `H`, the pairing port `P` and the node sink
/// `S` to avoid dynamic dispatch. `Clone` is implemented manually so the
/// underlying types themselves do not need to be `Clone`; only the `Arc`
/// wrappers are cloned.
pub struct AppState<H, P, S> {
    /// Control node fed by `POST /api/control`.
    pub control: Arc<ControlNode<H, S>>,
    /// Read access to the hub.
    pub query_service: Arc<QueryService<H>>,
    /// Client identity registration.
    pub pairing_service: Arc<PairingService<P>>,
}

impl<H, P, S> Clone for AppState<H, P, S> {
    fn clone(&self) -> Self {
        Self {
            control: Arc::clone(&self.control),
            query_service: Arc::clone(&self.query_service),
            pairing_service: Arc::clone(&self.pairing_service),
        }
    }
}

impl<H, P, S> AppState<H, P, S>
where
    H: HubClient + 'static,
    P: HubPairing + 'static,
    S: NodeSink + Clone + 'static,
{
    /// Create a new application state from service instances.
    pub fn new(
        control: ControlNode<H, S>,
        query_service: QueryService<H>,
        pairing_service: PairingService<P>,
    ) -> Self {
        Self {
            control: Arc::new(control),
            query_service: Arc::new(query_service),
            pairing_service: Arc::new(pairing_service),
        }
    }

    /// Create a new application state from pre-wrapped `Arc`s.
    ///
    /// Use this when the control node is also driven by the event channel.
    pub fn from_arcs(
        control: Arc<ControlNode<H, S>>,
        query_service: Arc<QueryService<H>>,
        pairing_service: Arc<PairingService<P>>,
    ) -> Self {
        Self {
            control,
            query_service,
            pairing_service,
        }
    }
}
