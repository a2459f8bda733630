//! Nodes — the driving side of the core, fed by the host event channel.
//!
//! A node owns its configuration (an optional fixed target and output
//! settings) and turns each [`InboundEvent`](lightgate_domain::event::InboundEvent)
//! into service calls, emitting results through a [`NodeSink`](crate::ports::NodeSink).

pub mod control;
pub mod query;

pub use control::{ControlNode, ControlNodeConfig};
pub use query::QueryNode;
