//! JSON handlers for groups.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, State};

use lightgate_app::ports::{HubClient, HubPairing, NodeSink};
use lightgate_domain::hub::Group;
use lightgate_domain::id::GroupId;

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /api/groups/{id}`
pub async fn get<H, P, S>(
    State(state): State<AppState<H, P, S>>,
    Path(id): Path<String>,
) -> Result<Json<Group>, ApiError>
where
    H: HubClient + 'static,
    P: HubPairing + 'static,
    S: NodeSink + Clone + 'static,
{
    let group_id = GroupId::from_str(&id).map_err(|_| ApiError::InvalidId(id))?;
    let group = state.query_service.get_group(group_id).await?;
    Ok(Json(group))
}
