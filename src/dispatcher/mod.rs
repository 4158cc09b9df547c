//! # Dispatcher Module
//!
//! The dispatch pipeline sequencing before-interceptors, the route handler,
//! and after-interceptors for one inbound request.
//!
//! ## Request Flow
//!
//! 1. Resolve and run the "before" chain against the shared response
//!    accumulator.
//! 2. Resolve the route, run its handler, render the result through the
//!    route's renderer. A HEAD request with no HEAD route retries the
//!    lookup as GET and, on a hit, marks the body consumed-but-empty.
//! 3. Resolve and run the "after" chain.
//! 4. Finalize: synthesize a 404 for unconsumed requests, or report
//!    "not consumed" when a co-hosted fallback handler owns those.
//!
//! ## Halt and Fault
//!
//! Every handler returns an explicit outcome. A halt aborts all later steps
//! and phases and supplies status/body itself. A fault is matched against
//! the registered fault handlers, first binding wins; an unmapped fault
//! produces a fixed 500. After a fault the "after" chain never runs, unlike
//! a halt this is the terminal state of the request.
//!
//! ## Concurrency
//!
//! One dispatch per inbound request; a `Dispatcher` is shared behind `&self`
//! across however many worker units the host transport supplies. The
//! request/response pair of a dispatch is exclusively owned and never
//! reused.

mod core;

pub use core::{Dispatched, Dispatcher};
