//! # Interceptor Module
//!
//! Before/after handlers scoped by phase, method, path, and accept type.
//!
//! A registration is built incrementally (`before`/`after`, `on`, `except`,
//! `accepting`, `method`, `execute`) and treated as immutable once handed to
//! the registry. An empty filter set means "no constraint": no phase means
//! both phases, no method means every method, no include means every path,
//! no accept type means any accept header.
//!
//! Resolution walks registrations in registration order and returns every
//! applicable one, in that order. There is no implicit priority beyond
//! registration order.

mod core;

pub use core::{
    InterceptorHandler, InterceptorMatch, InterceptorRegistration, InterceptorRegistry, Phase,
    MATCH_ALL_PATHS,
};
