//! # Router Module
//!
//! Ordered route table and negotiated route resolution.
//!
//! ## Overview
//!
//! Routes are registered as (method, path pattern, accept type, handler,
//! renderer) entries and evaluated in registration order. Resolution is a
//! two-stage filter:
//!
//! 1. **Structural**: the entry's method must equal the request method and
//!    its pattern must match the path (see [`crate::matcher`]).
//! 2. **Negotiated**: when the request carries an `Accept` header, the
//!    structural survivors are grouped by their declared accept type
//!    (first-registered entry per distinct type) and the group keys are
//!    negotiated against the header (see [`crate::mime`]). Without an
//!    `Accept` header the first structural survivor wins outright.
//!
//! Registration is append-only with no validation or dedup; later entries
//! may shadow earlier ones for the same pattern and method. Lookups never
//! fail, absence is a normal `None`.

mod core;
#[cfg(test)]
mod tests;

pub use core::{RouteEntry, RouteHandler, RouteMatch, RouteRegistry, DEFAULT_ACCEPT_TYPE};
