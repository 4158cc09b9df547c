//! Host-facing request facade handed to handlers.

use crate::matcher::{self, ParamVec};
use http::Method;
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::debug;

/// Maximum inline headers/cookies before heap allocation.
pub const MAX_INLINE_HEADERS: usize = 16;

/// Stack-allocated header/cookie storage.
///
/// Names are shared as `Arc<str>` since the same header names repeat across
/// requests; values are per-request data.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

const ACCEPT_TYPE_HEADER: &str = "accept";

/// One inbound request as seen by interceptors and route handlers.
///
/// Built by the host transport from a normalized method token and the
/// decoded request path (an attached query string is split off and parsed).
/// Path parameters are rebound by the pipeline against each handler's
/// matched pattern before that handler runs, so an interceptor matched on
/// `/user/:name` and a route on `/user/:id` each see their own binding.
///
/// A `Request` is exclusively owned by one in-flight dispatch and must not
/// be reused across requests.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    path: String,
    headers: HeaderVec,
    cookies: HeaderVec,
    query_params: ParamVec,
    params: ParamVec,
    body: Option<String>,
}

impl Request {
    /// Build a request from a method and a decoded path, with or without a
    /// query string.
    #[must_use]
    pub fn new(method: Method, path: &str) -> Self {
        let (path, query) = match path.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (path, None),
        };
        Request {
            method,
            path: path.to_string(),
            headers: HeaderVec::new(),
            cookies: HeaderVec::new(),
            query_params: query.map(parse_query_params).unwrap_or_default(),
            params: ParamVec::new(),
            body: None,
        }
    }

    /// Attach a header. A `Cookie` header is additionally parsed into the
    /// cookie table.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if name.eq_ignore_ascii_case("cookie") {
            self.cookies = parse_cookies(value);
        }
        self.headers.push((Arc::from(name), value.to_string()));
        self
    }

    /// Attach a raw body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Decoded request path without the query string.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw `Accept` header, if the client sent one.
    #[inline]
    #[must_use]
    pub fn accept_type(&self) -> Option<&str> {
        self.header(ACCEPT_TYPE_HEADER)
    }

    /// Get a header by name (case-insensitive per RFC 7230).
    #[inline]
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    #[inline]
    #[must_use]
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Get a query parameter by name, last occurrence winning on duplicates
    /// (e.g. `?limit=10&limit=20` yields `20`).
    #[inline]
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Get a bound path parameter by name, as bound against the pattern of
    /// the handler currently executing.
    #[inline]
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Raw request body, if any.
    #[inline]
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Parse the body as JSON. Handlers can `?` the result; a parse failure
    /// surfaces as a fault.
    pub fn body_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(self.body.as_deref().unwrap_or(""))
    }

    /// Rebind path parameters against `pattern` ahead of a handler call.
    pub(crate) fn bind_params(&mut self, pattern: &str) {
        self.params = matcher::extract_params(pattern, &self.path);
        debug!(pattern = %pattern, params = ?self.params, "path params bound");
    }
}

/// Parse a query string into name/value pairs, URL-decoding both.
fn parse_query_params(query: &str) -> ParamVec {
    url::form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (Arc::from(k.as_ref()), v.to_string()))
        .collect()
}

/// Parse a `Cookie` header value into name/value pairs.
fn parse_cookies(value: &str) -> HeaderVec {
    value
        .split(';')
        .filter_map(|pair| {
            let mut parts = pair.trim().splitn(2, '=');
            let name = parts.next()?.trim();
            if name.is_empty() {
                return None;
            }
            let value = parts.next().unwrap_or("").trim().to_string();
            Some((Arc::from(name), value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_string_is_split_and_decoded() {
        let req = Request::new(Method::GET, "/users?limit=10&name=a%20b&limit=20");
        assert_eq!(req.path(), "/users");
        assert_eq!(req.query_param("name"), Some("a b"));
        // last occurrence wins
        assert_eq!(req.query_param("limit"), Some("20"));
    }

    #[test]
    fn cookie_header_is_parsed() {
        let req = Request::new(Method::GET, "/").with_header("Cookie", "session=abc; theme=dark");
        assert_eq!(req.cookie("session"), Some("abc"));
        assert_eq!(req.cookie("theme"), Some("dark"));
        assert_eq!(req.cookie("missing"), None);
    }

    #[test]
    fn headers_are_case_insensitive() {
        let req = Request::new(Method::GET, "/").with_header("Accept", "application/json");
        assert_eq!(req.header("accept"), Some("application/json"));
        assert_eq!(req.accept_type(), Some("application/json"));
    }

    #[test]
    fn params_rebind_per_pattern() {
        let mut req = Request::new(Method::GET, "/user/42");
        req.bind_params("/user/:id");
        assert_eq!(req.param("id"), Some("42"));
        req.bind_params("/user/:name");
        assert_eq!(req.param("name"), Some("42"));
        assert_eq!(req.param("id"), None);
    }
}
