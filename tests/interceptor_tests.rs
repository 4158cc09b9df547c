//! Tests for interceptor registration filters and chain resolution
//!
//! # Test Coverage
//!
//! - Phase, method, and accept-type filtering
//! - Include/exclude pattern interaction (exclusion always wins)
//! - Match-all registrations (empty include set)
//! - Registration-order preservation in the resolved chain

use http::Method;
use shunt::{InterceptorRegistration, InterceptorRegistry, Phase};

mod common;

fn tagged(tag: &'static str) -> InterceptorRegistration {
    // The tag rides along as a response header so tests can see which
    // registrations fired and in which order.
    InterceptorRegistration::new().execute(move |_req, res| {
        let seen = res.header("x-seen").unwrap_or("").to_string();
        res.set_header("x-seen", format!("{seen}{tag},"));
        Ok(())
    })
}

fn chain_patterns(
    registry: &InterceptorRegistry,
    phase: Phase,
    method: Method,
    path: &str,
    accept: Option<&str>,
) -> Vec<String> {
    registry
        .find_interceptors(phase, &method, path, accept)
        .into_iter()
        .map(|m| m.pattern)
        .collect()
}

#[test]
fn empty_filters_match_everything() {
    common::init_tracing();
    let registry = InterceptorRegistry::new();
    registry.register(tagged("a"));

    for phase in [Phase::Before, Phase::After] {
        for method in [Method::GET, Method::POST, Method::DELETE] {
            let chain = chain_patterns(&registry, phase, method, "/anything/at/all", None);
            assert_eq!(chain, vec!["*".to_string()]);
        }
    }
}

#[test]
fn phase_filter_excludes_other_phase() {
    common::init_tracing();
    let registry = InterceptorRegistry::new();
    registry.register(tagged("before-only").before());

    assert_eq!(
        chain_patterns(&registry, Phase::Before, Method::GET, "/x", None).len(),
        1
    );
    assert!(chain_patterns(&registry, Phase::After, Method::GET, "/x", None).is_empty());
}

#[test]
fn method_filter_excludes_other_methods() {
    common::init_tracing();
    let registry = InterceptorRegistry::new();
    registry.register(tagged("get-only").method(Method::GET));

    assert_eq!(
        chain_patterns(&registry, Phase::Before, Method::GET, "/x", None).len(),
        1
    );
    assert!(chain_patterns(&registry, Phase::Before, Method::POST, "/x", None).is_empty());
}

#[test]
fn accept_filter_negotiates_against_request_header() {
    common::init_tracing();
    let registry = InterceptorRegistry::new();
    registry.register(tagged("json-only").accepting(["application/json"]));

    assert_eq!(
        chain_patterns(
            &registry,
            Phase::Before,
            Method::GET,
            "/x",
            Some("application/json")
        )
        .len(),
        1
    );
    assert!(chain_patterns(
        &registry,
        Phase::Before,
        Method::GET,
        "/x",
        Some("text/plain")
    )
    .is_empty());
    // an absent accept header accepts anything
    assert_eq!(
        chain_patterns(&registry, Phase::Before, Method::GET, "/x", None).len(),
        1
    );
}

#[test]
fn include_patterns_match_through_first_fit() {
    common::init_tracing();
    let registry = InterceptorRegistry::new();
    registry.register(tagged("scoped").on(["/admin/*", "/user/:id"]));

    assert_eq!(
        chain_patterns(&registry, Phase::Before, Method::GET, "/admin/panel", None),
        vec!["/admin/*".to_string()]
    );
    assert_eq!(
        chain_patterns(&registry, Phase::Before, Method::GET, "/user/42", None),
        vec!["/user/:id".to_string()]
    );
    assert!(chain_patterns(&registry, Phase::Before, Method::GET, "/other", None).is_empty());
}

#[test]
fn exclusion_always_wins() {
    common::init_tracing();
    let registry = InterceptorRegistry::new();
    // `/bye` is inside the include scope, the exclusion still vetoes it
    registry.register(tagged("guard").on(["/*"]).except(["/bye"]));

    assert_eq!(
        chain_patterns(&registry, Phase::Before, Method::GET, "/hello", None).len(),
        1
    );
    assert!(chain_patterns(&registry, Phase::Before, Method::GET, "/bye", None).is_empty());
}

#[test]
fn exclusion_applies_to_match_all_registrations() {
    common::init_tracing();
    let registry = InterceptorRegistry::new();
    registry.register(tagged("all-but-health").except(["/health"]));

    assert_eq!(
        chain_patterns(&registry, Phase::Before, Method::GET, "/pets", None).len(),
        1
    );
    assert!(chain_patterns(&registry, Phase::Before, Method::GET, "/health", None).is_empty());
}

#[test]
fn chain_preserves_registration_order() {
    common::init_tracing();
    let registry = InterceptorRegistry::new();
    registry.register(tagged("first").on(["/x"]));
    registry.register(tagged("second"));
    registry.register(tagged("third").on(["/x", "/y"]));

    let chain = chain_patterns(&registry, Phase::Before, Method::GET, "/x", None);
    assert_eq!(
        chain,
        vec!["/x".to_string(), "*".to_string(), "/x".to_string()]
    );
}

#[test]
fn clear_empties_the_table() {
    common::init_tracing();
    let registry = InterceptorRegistry::new();
    registry.register(tagged("a"));
    assert_eq!(registry.len(), 1);
    registry.clear();
    assert!(registry.is_empty());
    assert!(chain_patterns(&registry, Phase::Before, Method::GET, "/x", None).is_empty());
}
