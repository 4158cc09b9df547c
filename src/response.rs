//! Mutable response accumulator shared along one dispatch chain.

use crate::request::HeaderVec;
use std::sync::Arc;

const CONTENT_TYPE: &str = "content-type";
const LOCATION: &str = "location";

/// Response state accumulated across interceptors, the route handler, and
/// fault handlers of a single dispatch.
///
/// Starts at status 200 with no body. The pipeline owns exactly one
/// accumulator per in-flight request; handlers receive it as `&mut` and
/// mutate it in chain order.
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    headers: HeaderVec,
    cookies: HeaderVec,
    body: Option<String>,
    redirected: bool,
}

impl Default for Response {
    fn default() -> Self {
        Response {
            status: 200,
            headers: HeaderVec::new(),
            cookies: HeaderVec::new(),
            body: None,
            redirected: false,
        }
    }
}

impl Response {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn set_status(&mut self, status: u16) {
        self.status = status;
    }

    #[inline]
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = Some(body.into());
    }

    /// Get a header by name (case-insensitive).
    #[inline]
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or replace a header (name compared case-insensitively).
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value.into()));
    }

    #[inline]
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header(CONTENT_TYPE)
    }

    pub fn set_content_type(&mut self, content_type: &str) {
        self.set_header(CONTENT_TYPE, content_type);
    }

    pub fn set_cookie(&mut self, name: &str, value: impl Into<String>) {
        self.cookies.retain(|(k, _)| k.as_ref() != name);
        self.cookies.push((Arc::from(name), value.into()));
    }

    pub fn remove_cookie(&mut self, name: &str) {
        self.cookies.retain(|(k, _)| k.as_ref() != name);
    }

    #[inline]
    #[must_use]
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Cookies set so far, in insertion order.
    #[must_use]
    pub fn cookies(&self) -> &HeaderVec {
        &self.cookies
    }

    /// Headers set so far, in insertion order.
    #[must_use]
    pub fn headers(&self) -> &HeaderVec {
        &self.headers
    }

    /// Redirect to `location` with status 302.
    ///
    /// A redirected response with no body still finalizes as consumed, so
    /// no 404 is synthesized around it.
    pub fn redirect(&mut self, location: &str) {
        self.redirect_with_status(location, 302);
    }

    /// Redirect with an explicit 3xx status.
    pub fn redirect_with_status(&mut self, location: &str, status: u16) {
        self.status = status;
        self.set_header(LOCATION, location);
        self.redirected = true;
    }

    #[inline]
    #[must_use]
    pub fn is_redirected(&self) -> bool {
        self.redirected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_200_with_no_body() {
        let res = Response::new();
        assert_eq!(res.status(), 200);
        assert_eq!(res.body(), None);
        assert!(!res.is_redirected());
    }

    #[test]
    fn set_header_replaces_case_insensitively() {
        let mut res = Response::new();
        res.set_header("Content-Type", "text/plain");
        res.set_header("content-type", "application/json");
        assert_eq!(res.content_type(), Some("application/json"));
        assert_eq!(res.headers().len(), 1);
    }

    #[test]
    fn redirect_sets_status_location_and_flag() {
        let mut res = Response::new();
        res.redirect("/login");
        assert_eq!(res.status(), 302);
        assert_eq!(res.header("location"), Some("/login"));
        assert!(res.is_redirected());
    }
}
