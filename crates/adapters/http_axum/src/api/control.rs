//! `POST /api/control` — feed one request to the control node.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use lightgate_app::ports::{HubClient, HubPairing, NodeSink};
use lightgate_domain::event::InboundEvent;
use lightgate_domain::outcome::DispatchOutcome;

use crate::state::AppState;

/// Always answers with the request's [`DispatchOutcome`]: `200` on success,
/// `400` when the request was rejected before reaching the hub, `502` for
/// any hub failure.
pub async fn submit<H, P, S>(
    State(state): State<AppState<H, P, S>>,
    Json(event): Json<InboundEvent>,
) -> (StatusCode, Json<DispatchOutcome>)
where
    H: HubClient + 'static,
    P: HubPairing + 'static,
    S: NodeSink + Clone + 'static,
{
    let result = state.control.submit(event).await;
    let status = match &result {
        Ok(()) => StatusCode::OK,
        Err(err) if err.is_configuration() => StatusCode::BAD_REQUEST,
        Err(_) => StatusCode::BAD_GATEWAY,
    };
    (status, Json(DispatchOutcome::from(&result)))
}
