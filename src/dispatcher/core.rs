//! Dispatch pipeline core - hot path for request execution.

use crate::fault::{FaultMapper, Halt, Interrupt};
use crate::interceptor::{InterceptorRegistry, Phase};
use crate::request::Request;
use crate::response::Response;
use crate::router::RouteRegistry;
use http::Method;
use std::sync::Arc;
use tracing::{debug, error};

const INTERNAL_ERROR_BODY: &str = "<html><body><h2>500 Internal Error</h2></body></html>";

fn not_found_body(path: &str) -> String {
    format!(
        "<html><body><h2>404 Not found</h2>The requested route [{path}] has not been mapped</body></html>"
    )
}

/// Final outcome of one dispatch.
#[derive(Debug)]
pub enum Dispatched {
    /// The engine produced a response; status, headers, and body are final.
    Consumed(Response),
    /// Nothing consumed the request and the pipeline is configured to let a
    /// co-hosted fallback handler take over.
    NotConsumed,
}

impl Dispatched {
    /// Unwrap the consumed response; panics on `NotConsumed`.
    ///
    /// Convenience for hosts running without a fallback handler, where
    /// every dispatch consumes.
    #[must_use]
    pub fn into_response(self) -> Response {
        match self {
            Dispatched::Consumed(res) => res,
            Dispatched::NotConsumed => panic!("request was not consumed"),
        }
    }
}

/// The dispatch pipeline.
///
/// Holds the two registries (explicitly constructed and injected, shared
/// with whatever setup code keeps registering into them), the fault handler
/// table, and the unconsumed-request policy.
pub struct Dispatcher {
    routes: Arc<RouteRegistry>,
    interceptors: Arc<InterceptorRegistry>,
    faults: FaultMapper,
    defer_unconsumed: bool,
}

impl Dispatcher {
    #[must_use]
    pub fn new(routes: Arc<RouteRegistry>, interceptors: Arc<InterceptorRegistry>) -> Self {
        Dispatcher {
            routes,
            interceptors,
            faults: FaultMapper::new(),
            defer_unconsumed: false,
        }
    }

    /// Report [`Dispatched::NotConsumed`] for unconsumed requests instead
    /// of synthesizing a 404, so a co-hosted fallback handler can run.
    #[must_use]
    pub fn defer_unconsumed(mut self, enabled: bool) -> Self {
        self.defer_unconsumed = enabled;
        self
    }

    /// Register a fault handler for one concrete fault type.
    ///
    /// Handlers are consulted in registration order, so register the most
    /// specific type first and any catch-all last.
    pub fn on_error<E, F>(&mut self, handler: F)
    where
        E: std::error::Error + Send + Sync + 'static,
        F: Fn(&E, &Request, &mut Response) + Send + Sync + 'static,
    {
        self.faults.on_error::<E, F>(handler);
    }

    /// Register a catch-all fault handler.
    pub fn on_any_error<F>(&mut self, handler: F)
    where
        F: Fn(&anyhow::Error, &Request, &mut Response) + Send + Sync + 'static,
    {
        self.faults.on_any_error(handler);
    }

    /// Run one request through the pipeline.
    pub fn dispatch(&self, mut request: Request) -> Dispatched {
        let mut response = Response::new();
        let mut body_content: Option<String> = None;

        debug!(
            method = %request.method(),
            path = %request.path(),
            accept = request.accept_type().unwrap_or("-"),
            "dispatch begin"
        );

        match self.run_phases(&mut request, &mut response, &mut body_content) {
            Ok(()) => {}
            Err(Interrupt::Halt(halt)) => {
                apply_halt(halt, &mut response, &mut body_content);
            }
            Err(Interrupt::Fault(fault)) => {
                self.recover(&fault, &request, &mut response, &mut body_content);
            }
        }

        // A redirect with no body still counts as consumed
        if body_content.is_none() && response.is_redirected() {
            body_content = Some(String::new());
        }

        let body = match body_content {
            Some(body) => body,
            None => {
                if self.defer_unconsumed {
                    debug!(path = %request.path(), "request not consumed, deferring");
                    return Dispatched::NotConsumed;
                }
                response.set_status(404);
                not_found_body(request.path())
            }
        };

        if response.content_type().is_none() {
            response.set_content_type("text/html; charset=utf-8");
        }
        response.set_body(body);
        Dispatched::Consumed(response)
    }

    fn run_phases(
        &self,
        request: &mut Request,
        response: &mut Response,
        body_content: &mut Option<String>,
    ) -> Result<(), Interrupt> {
        self.execute_interceptors(Phase::Before, request, response, body_content)?;
        self.execute_route(request, response, body_content)?;
        self.execute_interceptors(Phase::After, request, response, body_content)?;
        Ok(())
    }

    fn execute_interceptors(
        &self,
        phase: Phase,
        request: &mut Request,
        response: &mut Response,
        body_content: &mut Option<String>,
    ) -> Result<(), Interrupt> {
        let chain = self.interceptors.find_interceptors(
            phase,
            request.method(),
            request.path(),
            request.accept_type(),
        );
        for matched in chain {
            request.bind_params(&matched.pattern);
            (matched.handler)(&*request, response)?;
            sync_body(response, body_content);
        }
        Ok(())
    }

    fn execute_route(
        &self,
        request: &mut Request,
        response: &mut Response,
        body_content: &mut Option<String>,
    ) -> Result<(), Interrupt> {
        let found = self.routes.find_route(request.method(), request.path(), request.accept_type());

        match found {
            Some(matched) => {
                request.bind_params(&matched.pattern);
                let result = (matched.entry.handler)(&*request, response)?;
                let rendered = matched
                    .entry
                    .renderer
                    .render(result.as_ref())
                    .map_err(Interrupt::Fault)?;
                // A null render must not erase a body set earlier in the chain
                if let Some(rendered) = rendered {
                    *body_content = Some(rendered);
                }
            }
            None => {
                // HEAD is GET without a message body; when only a GET route
                // exists, answer with its headers and an empty body.
                if *request.method() == Method::HEAD && body_content.is_none() {
                    let get_route = self.routes.find_route(
                        &Method::GET,
                        request.path(),
                        request.accept_type(),
                    );
                    if get_route.is_some() {
                        *body_content = Some(String::new());
                    }
                }
            }
        }
        Ok(())
    }

    fn recover(
        &self,
        fault: &anyhow::Error,
        request: &Request,
        response: &mut Response,
        body_content: &mut Option<String>,
    ) {
        if self.faults.apply(fault, request, response) {
            debug!(error = %fault, "mapped fault recovered");
            sync_body(response, body_content);
        } else {
            error!(error = ?fault, path = %request.path(), "unmapped fault during dispatch");
            response.set_status(500);
            *body_content = Some(INTERNAL_ERROR_BODY.to_string());
        }
    }
}

/// Copy a body set on the accumulator into the pipeline's body slot,
/// keeping the slot untouched when the handler set none.
fn sync_body(response: &Response, body_content: &mut Option<String>) {
    if let Some(body) = response.body() {
        *body_content = Some(body.to_string());
    }
}

fn apply_halt(halt: Halt, response: &mut Response, body_content: &mut Option<String>) {
    debug!(status = ?halt.status, "halt occurred");
    if let Some(status) = halt.status {
        response.set_status(status);
    }
    *body_content = Some(halt.body.unwrap_or_default());
}
