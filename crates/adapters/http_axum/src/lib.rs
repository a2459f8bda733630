//! # lightgate-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a small **JSON admin API**: enumerate the hub (`/api/items`),
//!   fetch one device or group, and pair a new client identity
//!   (`/api/pair`).
//! - Accept control requests on `/api/control` and hand them to the
//!   [`ControlNode`](lightgate_app::nodes::ControlNode), answering with the
//!   request's `DispatchOutcome`.
//! - Map [`LightgateError`](lightgate_domain::error::LightgateError) into
//!   status codes (see [`error`]).
//!
//! ## Dependency rule
//! Depends on `lightgate-app` (for port traits, services and nodes) and
//! `lightgate-domain` (for types used in request/response mapping). Never
//! leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
