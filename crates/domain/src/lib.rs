//! # lightgate-domain
//!
//! Pure domain model for the lightgate hub adapter.
//!
//! ## Responsibilities
//! - Typed hub identifiers and the error taxonomy
//! - **Instructions**: the loosely typed input form, the canonical hub form,
//!   and the normalization rules between them
//! - **Targets**: resolving which device or group a request addresses
//! - **Hub objects**: devices, groups, and snapshots of both
//! - **Events**: inbound/outbound messages of the host channel and the
//!   dispatch outcome
//!
//! ## Dependency rule
//! This crate has **no internal dependencies** and performs no IO.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;

pub mod event;
pub mod hub;
pub mod instruction;
pub mod outcome;
pub mod target;
