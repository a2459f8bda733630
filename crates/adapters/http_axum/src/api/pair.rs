//! `POST /api/pair` — register a fresh client identity with the hub.

use axum::Json;
use axum::extract::State;
use serde::Deserialize;

use lightgate_app::ports::{HubClient, HubPairing, NodeSink};
use lightgate_app::services::pairing_service::Credentials;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for pairing.
#[derive(Deserialize)]
pub struct PairRequest {
    /// Security code printed on the hub.
    #[serde(default)]
    pub security_code: String,
}

/// `POST /api/pair`
pub async fn pair<H, P, S>(
    State(state): State<AppState<H, P, S>>,
    Json(req): Json<PairRequest>,
) -> Result<Json<Credentials>, ApiError>
where
    H: HubClient + 'static,
    P: HubPairing + 'static,
    S: NodeSink + Clone + 'static,
{
    let credentials = state.pairing_service.pair(&req.security_code).await?;
    Ok(Json(credentials))
}
