//! Path pattern matching - hot path for route and interceptor resolution.
//!
//! Patterns are `/`-separated segment lists. A segment starting with `:` is a
//! named parameter and matches any single segment; a `*` segment matches any
//! single segment, except in final position where it absorbs any remaining
//! depth. Literal segments match by equality.
//!
//! Matching is a pure predicate over two strings, so it is safe to call from
//! any number of concurrent lookups.

use smallvec::SmallVec;
use std::sync::Arc;

/// Maximum number of bound path parameters before heap allocation.
/// Most REST-style patterns carry no more than a handful of `:name` segments.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter storage for the hot path.
///
/// Parameter names come from the registered pattern and are shared as
/// `Arc<str>`; values are per-request data sliced out of the URL.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Split a pattern or path into its non-empty segments.
///
/// Empty segments are discarded, so `/foo/` yields one segment and `/` none.
fn segments(s: &str) -> Vec<&str> {
    s.split('/').filter(|part| !part.is_empty()).collect()
}

/// Test whether `pattern` structurally matches the concrete `path`.
///
/// Rules, applied in order:
///
/// 1. Unless the pattern ends in `*`, a trailing slash on exactly one of the
///    two strings forces a mismatch.
/// 2. Literal equality matches.
/// 3. With equal segment counts, every position must hold one of: final
///    pattern segment is a trailing `*`; pattern segment is a `:param`;
///    segments are equal; pattern segment is `*`.
/// 4. With unequal segment counts, only a pattern ending in a trailing `*`
///    can still match, and only when the path is the longer of the two. A
///    path exactly one segment short but ending in `/` is padded with two
///    empty segments first, which compensates for the trailing slash being
///    invisible to the segment split.
///
/// `/*` therefore matches any depth below the root, `/files/*` requires at
/// least one segment below `/files`, and a `:param` in a non-final position
/// still requires exact segment-count agreement.
///
/// # Example
///
/// ```
/// use shunt::matcher::matches;
///
/// assert!(matches("/user/:id", "/user/42"));
/// assert!(!matches("/user/:id", "/user/42/edit"));
/// assert!(matches("/files/*", "/files/a/b/c"));
/// ```
#[must_use]
pub fn matches(pattern: &str, path: &str) -> bool {
    if !pattern.ends_with('*')
        && ((path.ends_with('/') && !pattern.ends_with('/'))
            || (pattern.ends_with('/') && !path.ends_with('/')))
    {
        // One and not both ends with slash
        return false;
    }
    if pattern == path {
        return true;
    }

    let pattern_parts = segments(pattern);
    let mut path_parts = segments(path);

    if pattern_parts.len() == path_parts.len() {
        for (i, pattern_part) in pattern_parts.iter().enumerate() {
            if i == pattern_parts.len() - 1 && *pattern_part == "*" && pattern.ends_with('*') {
                // wildcard match
                return true;
            }
            if !pattern_part.starts_with(':')
                && *pattern_part != path_parts[i]
                && *pattern_part != "*"
            {
                return false;
            }
        }
        // All parts matched
        true
    } else {
        // Segment counts differ, only a trailing wildcard can absorb the rest
        if pattern.ends_with('*') {
            if path_parts.len() == pattern_parts.len() - 1 && path.ends_with('/') {
                // The trailing slash vanished in the split, restore its weight
                path_parts.push("");
                path_parts.push("");
            }

            if pattern_parts.len() < path_parts.len() {
                for (i, pattern_part) in pattern_parts.iter().enumerate() {
                    if *pattern_part == "*" && i == pattern_parts.len() - 1 && pattern.ends_with('*')
                    {
                        return true;
                    }
                    if !pattern_part.starts_with(':')
                        && *pattern_part != path_parts[i]
                        && *pattern_part != "*"
                    {
                        return false;
                    }
                }
                return true;
            }
        }
        false
    }
}

/// Bind the `:name` segments of `pattern` positionally against `path`.
///
/// Only parameter segments bind; literals and wildcards bind nothing. The
/// caller is expected to have established the structural match first, so a
/// path shorter than the pattern simply binds fewer parameters.
#[must_use]
pub fn extract_params(pattern: &str, path: &str) -> ParamVec {
    let mut params = ParamVec::new();
    for (pattern_part, path_part) in segments(pattern).iter().zip(segments(path).iter()) {
        if let Some(name) = pattern_part.strip_prefix(':') {
            params.push((Arc::from(name), (*path_part).to_string()));
        }
    }
    params
}
