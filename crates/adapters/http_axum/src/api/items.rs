//! `GET /api/items` — everything the hub knows about.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use lightgate_app::ports::{HubClient, HubPairing, NodeSink};
use lightgate_domain::hub::{Device, Group, HubSnapshot};

use crate::error::ApiError;
use crate::state::AppState;

/// One enumerated hub object, tagged with its kind.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Item {
    Device(Device),
    Group(Group),
}

/// Body of the enumeration endpoint.
#[derive(Debug, Serialize)]
pub struct ItemsResponse {
    pub items: Vec<Item>,
    pub status: &'static str,
}

impl From<HubSnapshot> for ItemsResponse {
    fn from(snapshot: HubSnapshot) -> Self {
        let items = snapshot
            .devices
            .into_iter()
            .map(Item::Device)
            .chain(snapshot.groups.into_iter().map(Item::Group))
            .collect();
        Self {
            items,
            status: "ok",
        }
    }
}

/// `GET /api/items`
pub async fn list<H, P, S>(
    State(state): State<AppState<H, P, S>>,
) -> Result<Json<ItemsResponse>, ApiError>
where
    H: HubClient + 'static,
    P: HubPairing + 'static,
    S: NodeSink + Clone + 'static,
{
    let snapshot = state.query_service.snapshot().await?;
    Ok(Json(snapshot.into()))
}
