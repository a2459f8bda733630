//! # lightgate-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `HubClient` — device/group reads and state writes
//!   - `HubPairing` — registering a client identity with the hub
//!   - `NodeSink` — outbound events and the operator-visible error channel
//! - Define **driving/inbound** use-cases:
//!   - `DispatchCoordinator` — single call or colour fanout, result reduction
//!   - `QueryService`, `PairingService` — pass-through reads and pairing
//!   - `ControlNode`, `QueryNode` — per-event handling for the host channel
//! - Provide **in-process infrastructure** (node bus) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `lightgate-domain` only (plus `tokio` for channels and tasks).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod node_bus;
pub mod nodes;
pub mod ports;
pub mod services;

#[cfg(test)]
mod test_support;
