use super::{RouteEntry, RouteRegistry};
use http::Method;

fn entry(method: Method, pattern: &str, tag: &'static str) -> RouteEntry {
    RouteEntry::new(method, pattern, move |_req, _res| {
        Ok(Some(serde_json::Value::String(tag.to_string())))
    })
}

fn tag_of(registry: &RouteRegistry, method: Method, path: &str, accept: Option<&str>) -> Option<String> {
    registry.find_route(&method, path, accept).map(|m| {
        let mut res = crate::response::Response::new();
        let req = crate::request::Request::new(m.entry.method.clone(), path);
        match (m.entry.handler)(&req, &mut res).unwrap() {
            Some(serde_json::Value::String(s)) => s,
            other => panic!("unexpected handler result: {other:?}"),
        }
    })
}

#[test]
fn first_registered_wins_without_accept_header() {
    let registry = RouteRegistry::new();
    registry.add_route(entry(Method::GET, "/hello", "first"));
    registry.add_route(entry(Method::GET, "/hello", "second"));
    assert_eq!(
        tag_of(&registry, Method::GET, "/hello", None).as_deref(),
        Some("first")
    );
}

#[test]
fn method_must_match() {
    let registry = RouteRegistry::new();
    registry.add_route(entry(Method::GET, "/hello", "get"));
    assert!(registry.find_route(&Method::POST, "/hello", None).is_none());
}

#[test]
fn negotiation_picks_among_declared_types() {
    let registry = RouteRegistry::new();
    registry.add_route(entry(Method::GET, "/data", "html").accept("text/html"));
    registry.add_route(entry(Method::GET, "/data", "json").accept("application/json"));

    assert_eq!(
        tag_of(&registry, Method::GET, "/data", Some("application/json")).as_deref(),
        Some("json")
    );
    // wildcard falls back to registration order
    assert_eq!(
        tag_of(&registry, Method::GET, "/data", Some("*/*")).as_deref(),
        Some("html")
    );
    // nothing compatible is no route at all
    assert!(registry
        .find_route(&Method::GET, "/data", Some("text/plain"))
        .is_none());
}

#[test]
fn grouping_keeps_first_entry_per_type() {
    let registry = RouteRegistry::new();
    registry.add_route(entry(Method::GET, "/data", "json1").accept("application/json"));
    registry.add_route(entry(Method::GET, "/data", "json2").accept("application/json"));
    assert_eq!(
        tag_of(&registry, Method::GET, "/data", Some("application/json")).as_deref(),
        Some("json1")
    );
}

#[test]
fn match_reports_pattern_and_path() {
    let registry = RouteRegistry::new();
    registry.add_route(entry(Method::GET, "/user/:id", "user"));
    let m = registry
        .find_route(&Method::GET, "/user/42", Some("text/html"))
        .expect("route should match");
    assert_eq!(m.pattern, "/user/:id");
    assert_eq!(m.path, "/user/42");
    assert_eq!(m.accept_type.as_deref(), Some("text/html"));
}

#[test]
fn clear_empties_the_table() {
    let registry = RouteRegistry::new();
    registry.add_route(entry(Method::GET, "/hello", "x"));
    assert_eq!(registry.len(), 1);
    registry.clear();
    assert!(registry.is_empty());
    assert!(registry.find_route(&Method::GET, "/hello", None).is_none());
}
