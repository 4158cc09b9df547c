//! Interceptor registrations and chain resolution.

use crate::fault::HandlerResult;
use crate::matcher;
use crate::mime;
use crate::request::Request;
use crate::response::Response;
use http::Method;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Matched-pattern sentinel reported by registrations with no include set.
pub const MATCH_ALL_PATHS: &str = "*";

/// Shared interceptor handler: reads the request and mutates the shared
/// response accumulator.
pub type InterceptorHandler =
    Arc<dyn Fn(&Request, &mut Response) -> HandlerResult<()> + Send + Sync>;

/// Interception phase relative to the route handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Before,
    After,
}

/// One interceptor registration with its filters.
///
/// Built incrementally through the chaining methods, then appended to the
/// registry and never mutated again. Filter values are deduplicated on
/// insert, so the fields behave as sets.
#[derive(Clone)]
pub struct InterceptorRegistration {
    phases: Vec<Phase>,
    methods: Vec<Method>,
    included_paths: Vec<String>,
    excluded_paths: Vec<String>,
    accept_types: Vec<String>,
    handler: InterceptorHandler,
}

impl Default for InterceptorRegistration {
    fn default() -> Self {
        Self::new()
    }
}

impl InterceptorRegistration {
    /// Start an empty registration: both phases, every method, every path,
    /// any accept type, no-op handler.
    #[must_use]
    pub fn new() -> Self {
        InterceptorRegistration {
            phases: Vec::new(),
            methods: Vec::new(),
            included_paths: Vec::new(),
            excluded_paths: Vec::new(),
            accept_types: Vec::new(),
            handler: Arc::new(|_req, _res| Ok(())),
        }
    }

    /// Run in the before phase.
    #[must_use]
    pub fn before(mut self) -> Self {
        if !self.phases.contains(&Phase::Before) {
            self.phases.push(Phase::Before);
        }
        self
    }

    /// Run in the after phase.
    #[must_use]
    pub fn after(mut self) -> Self {
        if !self.phases.contains(&Phase::After) {
            self.phases.push(Phase::After);
        }
        self
    }

    /// Restrict to paths matching any of `patterns`.
    #[must_use]
    pub fn on<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for pattern in patterns {
            let pattern = pattern.into();
            if !self.included_paths.contains(&pattern) {
                self.included_paths.push(pattern);
            }
        }
        self
    }

    /// Never run on paths matching any of `patterns`, regardless of the
    /// include set.
    #[must_use]
    pub fn except<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for pattern in patterns {
            let pattern = pattern.into();
            if !self.excluded_paths.contains(&pattern) {
                self.excluded_paths.push(pattern);
            }
        }
        self
    }

    /// Restrict to requests whose accept header is compatible with any of
    /// `types`.
    #[must_use]
    pub fn accepting<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for accept_type in types {
            let accept_type = accept_type.into();
            if !self.accept_types.contains(&accept_type) {
                self.accept_types.push(accept_type);
            }
        }
        self
    }

    /// Restrict to one HTTP method (repeatable).
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        if !self.methods.contains(&method) {
            self.methods.push(method);
        }
        self
    }

    /// Attach the handler to run when the registration applies.
    #[must_use]
    pub fn execute<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Request, &mut Response) -> HandlerResult<()> + Send + Sync + 'static,
    {
        self.handler = Arc::new(handler);
        self
    }
}

/// One resolved interceptor for a concrete request.
#[derive(Clone)]
pub struct InterceptorMatch {
    /// The included pattern that matched, or [`MATCH_ALL_PATHS`].
    pub pattern: String,
    /// The concrete request path.
    pub path: String,
    /// The request's accept header, if any.
    pub accept_type: Option<String>,
    pub handler: InterceptorHandler,
}

/// Ordered, process-wide interceptor table.
///
/// Same locking discipline as the route registry: concurrent lookups,
/// serialized setup/teardown mutation.
#[derive(Default)]
pub struct InterceptorRegistry {
    registrations: RwLock<Vec<Arc<InterceptorRegistration>>>,
}

impl InterceptorRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a registration.
    pub fn register(&self, registration: InterceptorRegistration) {
        self.registrations
            .write()
            .expect("interceptor table lock poisoned")
            .push(Arc::new(registration));
    }

    /// Resolve the ordered chain of interceptors applicable to a request in
    /// `phase`.
    ///
    /// A registration is skipped when a non-empty phase set excludes the
    /// phase, a non-empty method set excludes the method, a non-empty
    /// accept set is incompatible with the request accept header, or any
    /// excluded pattern matches the path. Otherwise an empty include set
    /// matches every path, and a non-empty one matches through its first
    /// pattern that fits.
    #[must_use]
    pub fn find_interceptors(
        &self,
        phase: Phase,
        method: &Method,
        path: &str,
        accept: Option<&str>,
    ) -> Vec<InterceptorMatch> {
        let registrations = self
            .registrations
            .read()
            .expect("interceptor table lock poisoned");

        let mut matches = Vec::new();
        'next: for reg in registrations.iter() {
            if !reg.phases.is_empty() && !reg.phases.contains(&phase) {
                continue;
            }
            if !reg.methods.is_empty() && !reg.methods.contains(method) {
                continue;
            }
            if !reg.accept_types.is_empty()
                && mime::best_match(reg.accept_types.iter().map(String::as_str), accept).is_none()
            {
                continue;
            }
            for excluded in &reg.excluded_paths {
                if matcher::matches(excluded, path) {
                    continue 'next;
                }
            }
            if reg.included_paths.is_empty() {
                matches.push(InterceptorMatch {
                    pattern: MATCH_ALL_PATHS.to_string(),
                    path: path.to_string(),
                    accept_type: accept.map(str::to_string),
                    handler: Arc::clone(&reg.handler),
                });
            } else if let Some(included) = reg
                .included_paths
                .iter()
                .find(|p| matcher::matches(p, path))
            {
                matches.push(InterceptorMatch {
                    pattern: included.clone(),
                    path: path.to_string(),
                    accept_type: accept.map(str::to_string),
                    handler: Arc::clone(&reg.handler),
                });
            }
        }

        debug!(
            phase = ?phase,
            method = %method,
            path = %path,
            chain_len = matches.len(),
            "interceptor chain resolved"
        );
        matches
    }

    /// Drop every registration. Teardown only.
    pub fn clear(&self) {
        self.registrations
            .write()
            .expect("interceptor table lock poisoned")
            .clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.registrations
            .read()
            .expect("interceptor table lock poisoned")
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
