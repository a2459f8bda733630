//! JSON API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod control;
#[allow(clippy::missing_errors_doc)]
pub mod devices;
#[allow(clippy::missing_errors_doc)]
pub mod groups;
#[allow(clippy::missing_errors_doc)]
pub mod items;
#[allow(clippy::missing_errors_doc)]
pub mod pair;

use axum::Router;
use axum::routing::{get, post};

use lightgate_app::ports::{HubClient, HubPairing, NodeSink};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<H, P, S>() -> Router<AppState<H, P, S>>
where
    H: HubClient + 'static,
    P: HubPairing + 'static,
    S: NodeSink + Clone + 'static,
{
    Router::new()
        .route("/items", get(items::list::<H, P, S>))
        .route("/devices/{id}", get(devices::get::<H, P, S>))
        .route("/groups/{id}", get(groups::get::<H, P, S>))
        .route("/control", post(control::submit::<H, P, S>))
        .route("/pair", post(pair::pair::<H, P, S>))
}
