//! # shunt
//!
//! An embeddable HTTP request-dispatch engine. Application code registers
//! routes (method + path pattern + accept type + handler) and before/after
//! interceptors (filters scoped by method, path, and accept type); the
//! engine resolves and executes the correct chain for each inbound request
//! and produces a final status and body, or a "not consumed" signal when the
//! host owns fallback handling.
//!
//! The engine is transport-agnostic: the host parses HTTP off the wire,
//! builds a [`Request`], and writes whatever [`Dispatcher::dispatch`]
//! returns. Nothing here listens, reads, or writes sockets.
//!
//! ## Architecture
//!
//! - **[`matcher`]** - path pattern matching (literals, `:param`, `*`)
//! - **[`mime`]** - content negotiation against `Accept` headers
//! - **[`router`]** - ordered route table with negotiated lookup
//! - **[`interceptor`]** - before/after handler registrations and chain
//!   resolution
//! - **[`dispatcher`]** - the pipeline sequencing before, route, after with
//!   halt and fault handling
//! - **[`render`]** - per-route rendering capability (identity, template,
//!   transform)
//! - **[`fault`]** - the halt/fault taxonomy and fault handler table
//! - **[`request`]** / **[`response`]** - the facades handlers see
//!
//! ## Quick Start
//!
//! ```
//! use http::Method;
//! use shunt::{
//!     Dispatched, Dispatcher, InterceptorRegistration, InterceptorRegistry, Request,
//!     RouteEntry, RouteRegistry,
//! };
//! use std::sync::Arc;
//!
//! let routes = Arc::new(RouteRegistry::new());
//! let interceptors = Arc::new(InterceptorRegistry::new());
//!
//! routes.add_route(RouteEntry::new(Method::GET, "/hello/:name", |req, _res| {
//!     let name = req.param("name").unwrap_or("world");
//!     Ok(Some(serde_json::Value::String(format!("Hello {name}!"))))
//! }));
//!
//! interceptors.register(
//!     InterceptorRegistration::new()
//!         .before()
//!         .execute(|_req, res| {
//!             res.set_header("x-request-seen", "1");
//!             Ok(())
//!         }),
//! );
//!
//! let dispatcher = Dispatcher::new(Arc::clone(&routes), Arc::clone(&interceptors));
//!
//! match dispatcher.dispatch(Request::new(Method::GET, "/hello/world")) {
//!     Dispatched::Consumed(res) => {
//!         assert_eq!(res.status(), 200);
//!         assert_eq!(res.body(), Some("Hello world!"));
//!     }
//!     Dispatched::NotConsumed => unreachable!(),
//! }
//!
//! // Teardown empties both tables.
//! routes.clear();
//! interceptors.clear();
//! ```
//!
//! ## Halt, Fault, and 404
//!
//! A handler short-circuits the pipeline by returning a halt: the remaining
//! steps and phases are skipped and the halt payload supplies status and
//! body. A fault (any error escaping a handler) is matched against handlers
//! registered with [`Dispatcher::on_error`]; unmapped faults become a fixed
//! 500. A request nothing consumed becomes a 404 at finalization, or
//! [`Dispatched::NotConsumed`] when the pipeline is built with
//! `defer_unconsumed(true)`.
//!
//! ## Concurrency
//!
//! Registries are read-mostly shared tables: lookups are synchronous and
//! safe under concurrent dispatches, while registration and `clear` are
//! meant for setup and controlled teardown only. Each dispatch exclusively
//! owns its request/response pair.

pub mod dispatcher;
pub mod fault;
pub mod interceptor;
pub mod matcher;
pub mod mime;
pub mod render;
pub mod request;
pub mod response;
pub mod router;

pub use dispatcher::{Dispatched, Dispatcher};
pub use fault::{halt, halt_body, halt_status, FaultMapper, Halt, HandlerResult, Interrupt};
pub use interceptor::{
    InterceptorMatch, InterceptorRegistration, InterceptorRegistry, Phase, MATCH_ALL_PATHS,
};
pub use render::Renderer;
pub use request::Request;
pub use response::Response;
pub use router::{RouteEntry, RouteMatch, RouteRegistry, DEFAULT_ACCEPT_TYPE};
