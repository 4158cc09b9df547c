//! Route table core - hot path for route resolution.

use crate::fault::HandlerResult;
use crate::matcher;
use crate::mime;
use crate::render::Renderer;
use crate::request::Request;
use crate::response::Response;
use http::Method;
use serde_json::Value;
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

/// Declared accept type for routes registered without one.
pub const DEFAULT_ACCEPT_TYPE: &str = "*/*";

/// Shared route handler: reads the request, mutates the response
/// accumulator, and returns an optional model for the route's renderer.
pub type RouteHandler =
    Arc<dyn Fn(&Request, &mut Response) -> HandlerResult<Option<Value>> + Send + Sync>;

/// One registered route.
///
/// Immutable once registered; lives until an explicit [`RouteRegistry::clear`].
#[derive(Clone)]
pub struct RouteEntry {
    pub method: Method,
    pub pattern: String,
    pub accept_type: String,
    pub handler: RouteHandler,
    pub renderer: Renderer,
}

impl RouteEntry {
    /// Create an entry with the default accept type and identity renderer.
    pub fn new<F>(method: Method, pattern: &str, handler: F) -> Self
    where
        F: Fn(&Request, &mut Response) -> HandlerResult<Option<Value>> + Send + Sync + 'static,
    {
        RouteEntry {
            method,
            pattern: pattern.to_string(),
            accept_type: DEFAULT_ACCEPT_TYPE.to_string(),
            handler: Arc::new(handler),
            renderer: Renderer::Identity,
        }
    }

    /// Declare the accept type this route serves.
    #[must_use]
    pub fn accept(mut self, accept_type: &str) -> Self {
        self.accept_type = accept_type.to_string();
        self
    }

    /// Attach a rendering capability (identity is the default).
    #[must_use]
    pub fn render_with(mut self, renderer: Renderer) -> Self {
        self.renderer = renderer;
        self
    }

    fn matches(&self, method: &Method, path: &str) -> bool {
        self.method == *method && matcher::matches(&self.pattern, path)
    }
}

impl std::fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteEntry")
            .field("method", &self.method)
            .field("pattern", &self.pattern)
            .field("accept_type", &self.accept_type)
            .finish_non_exhaustive()
    }
}

/// Result of resolving a request against the route table.
///
/// Created per lookup and discarded after the handler runs.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// The registered pattern that matched.
    pub pattern: String,
    /// The concrete request path.
    pub path: String,
    /// The request's accept header, if any.
    pub accept_type: Option<String>,
    /// The winning entry.
    pub entry: Arc<RouteEntry>,
}

/// Ordered, process-wide route table.
///
/// Explicitly constructed and injected into the dispatcher; there is no
/// implicit global. Lookups take the read lock and are safe under any
/// number of concurrent dispatches; `add_route`/`clear` take the write lock
/// and belong to setup and teardown, not steady-state traffic.
#[derive(Default)]
pub struct RouteRegistry {
    routes: RwLock<Vec<Arc<RouteEntry>>>,
}

impl RouteRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. No validation, no dedup.
    pub fn add_route(&self, entry: RouteEntry) {
        let mut routes = self.routes.write().expect("route table lock poisoned");
        debug!(
            method = %entry.method,
            pattern = %entry.pattern,
            accept_type = %entry.accept_type,
            total_routes = routes.len() + 1,
            "route registered"
        );
        routes.push(Arc::new(entry));
    }

    /// Resolve the single best route for a request.
    ///
    /// Filters to structurally-matching entries, then lets content
    /// negotiation pick among distinct declared accept types. With no
    /// `Accept` header the first structural match wins. `None` when nothing
    /// matches structurally or negotiation finds no compatible type.
    #[must_use]
    pub fn find_route(&self, method: &Method, path: &str, accept: Option<&str>) -> Option<RouteMatch> {
        let routes = self.routes.read().expect("route table lock poisoned");
        let matched: Vec<&Arc<RouteEntry>> =
            routes.iter().filter(|e| e.matches(method, path)).collect();

        debug!(
            method = %method,
            path = %path,
            accept = accept.unwrap_or("-"),
            structural_matches = matched.len(),
            "route lookup"
        );

        let entry = match accept {
            Some(accept) if !matched.is_empty() => {
                // First-registered entry per distinct declared type, in
                // first-occurrence order.
                let mut groups: Vec<(&str, &Arc<RouteEntry>)> = Vec::new();
                for e in &matched {
                    if !groups.iter().any(|(t, _)| *t == e.accept_type) {
                        groups.push((e.accept_type.as_str(), *e));
                    }
                }
                let best = mime::best_match(groups.iter().map(|(t, _)| *t), Some(accept));
                match best {
                    Some(best) => groups
                        .iter()
                        .find(|(t, _)| *t == best.as_str())
                        .map(|(_, e)| Arc::clone(e)),
                    None => None,
                }
            }
            _ => matched.first().map(|e| Arc::clone(*e)),
        };

        match entry {
            Some(entry) => Some(RouteMatch {
                pattern: entry.pattern.clone(),
                path: path.to_string(),
                accept_type: accept.map(str::to_string),
                entry,
            }),
            None => {
                warn!(method = %method, path = %path, "no route matched");
                None
            }
        }
    }

    /// Drop every entry. Teardown only; racing this against in-flight
    /// lookups is unsupported.
    pub fn clear(&self) {
        self.routes.write().expect("route table lock poisoned").clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.read().expect("route table lock poisoned").len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
