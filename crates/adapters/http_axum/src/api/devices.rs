//! JSON handlers for devices.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, State};

use lightgate_app::ports::{HubClient, HubPairing, NodeSink};
use lightgate_domain::hub::Device;
use lightgate_domain::id::DeviceId;

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /api/devices/{id}`
pub async fn get<H, P, S>(
    State(state): State<AppState<H, P, S>>,
    Path(id): Path<String>,
) -> Result<Json<Device>, ApiError>
where
    H: HubClient + 'static,
    P: HubPairing + 'static,
    S: NodeSink + Clone + 'static,
{
    let device_id = DeviceId::from_str(&id).map_err(|_| ApiError::InvalidId(id))?;
    let device = state.query_service.get_device(device_id).await?;
    Ok(Json(device))
}
