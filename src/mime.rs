//! Media type negotiation against an `Accept` header.
//!
//! Implements the classic mimeparse weighting: each header entry is parsed
//! into (type, subtype, parameters, quality); a candidate's fit against an
//! entry scores 100 for an exact type, 10 for an exact subtype, and one point
//! per agreeing parameter, so `text/html` outranks `text/*` outranks `*/*`.
//! Across candidates the highest (quality, specificity) wins, with earlier
//! candidates winning ties.

/// Wildcard media range accepted by every candidate.
pub const ANY_MIME_TYPE: &str = "*/*";

/// One parsed entry of an `Accept` header (or one candidate type).
#[derive(Debug, Clone, PartialEq)]
struct MediaRange {
    main_type: String,
    sub_type: String,
    /// Parameters other than `q`, e.g. `level=1` in `text/html;level=1`.
    params: Vec<(String, String)>,
    quality: f32,
}

/// Parse a single media range such as `application/xhtml;q=0.5`.
///
/// A bare `*` reads as `*/*`. A missing, malformed, or out-of-range `q`
/// defaults to 1.
fn parse_media_range(range: &str) -> MediaRange {
    let mut parts = range.split(';');
    let full_type = parts.next().unwrap_or("").trim();
    // "*" is shorthand for "*/*" in some sloppy clients
    let full_type = if full_type == "*" { ANY_MIME_TYPE } else { full_type };

    let (main_type, sub_type) = match full_type.split_once('/') {
        Some((t, s)) => (t.trim(), s.trim()),
        None => (full_type, ""),
    };

    let mut quality = 1.0f32;
    let mut params = Vec::new();
    for param in parts {
        let (name, value) = match param.split_once('=') {
            Some((n, v)) => (n.trim(), v.trim()),
            None => continue,
        };
        if name == "q" {
            match value.parse::<f32>() {
                Ok(q) if (0.0..=1.0).contains(&q) => quality = q,
                _ => quality = 1.0,
            }
        } else {
            params.push((name.to_string(), value.to_string()));
        }
    }

    MediaRange {
        main_type: main_type.to_string(),
        sub_type: sub_type.to_string(),
        params,
        quality,
    }
}

fn type_compatible(target: &str, range: &str) -> bool {
    target == range || range == "*" || target == "*"
}

/// Score `candidate` against every parsed header entry.
///
/// Returns the (specificity, quality) of the most specific compatible entry,
/// or `None` when no entry is compatible.
fn fitness_and_quality(candidate: &MediaRange, ranges: &[MediaRange]) -> Option<(i32, f32)> {
    let mut best: Option<(i32, f32)> = None;
    for range in ranges {
        if !type_compatible(&candidate.main_type, &range.main_type)
            || !type_compatible(&candidate.sub_type, &range.sub_type)
        {
            continue;
        }
        let param_matches = candidate
            .params
            .iter()
            .filter(|p| range.params.contains(p))
            .count() as i32;
        let mut fitness = if range.main_type == candidate.main_type { 100 } else { 0 };
        fitness += if range.sub_type == candidate.sub_type { 10 } else { 0 };
        fitness += param_matches;

        if best.map_or(true, |(f, _)| fitness > f) {
            best = Some((fitness, range.quality));
        }
    }
    best
}

/// Pick the best candidate media type for a client's `Accept` header.
///
/// An absent or blank header accepts anything. Candidates are compared by
/// (quality, specificity) of their best compatible header entry; on a tie
/// the earlier candidate wins, which is what lets registration order break
/// ties between routes that both negotiate successfully.
///
/// Returns `None` when no candidate is compatible with the header.
#[must_use]
pub fn best_match<'a, I>(candidates: I, accept: Option<&str>) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let header = match accept {
        Some(h) if !h.trim().is_empty() => h,
        _ => ANY_MIME_TYPE,
    };
    let ranges: Vec<MediaRange> = header
        .split(',')
        .filter(|r| !r.trim().is_empty())
        .map(parse_media_range)
        .collect();

    let mut winner: Option<(f32, i32, &str)> = None;
    for candidate in candidates {
        let parsed = parse_media_range(candidate);
        if let Some((fitness, quality)) = fitness_and_quality(&parsed, &ranges) {
            if quality == 0.0 {
                continue;
            }
            let better = match winner {
                None => true,
                Some((best_q, best_f, _)) => {
                    quality > best_q || (quality == best_q && fitness > best_f)
                }
            };
            if better {
                winner = Some((quality, fitness, candidate));
            }
        }
    }
    winner.map(|(_, _, c)| c.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_type_beats_wildcards() {
        let best = best_match(
            ["text/html", "application/json"],
            Some("application/json, text/*;q=0.5"),
        );
        assert_eq!(best.as_deref(), Some("application/json"));
    }

    #[test]
    fn wildcard_header_prefers_first_candidate() {
        let best = best_match(["text/html", "application/json"], Some("*/*"));
        assert_eq!(best.as_deref(), Some("text/html"));
    }

    #[test]
    fn absent_header_accepts_anything() {
        assert_eq!(
            best_match(["application/json"], None).as_deref(),
            Some("application/json")
        );
        assert_eq!(
            best_match(["application/json"], Some("  ")).as_deref(),
            Some("application/json")
        );
    }

    #[test]
    fn incompatible_header_yields_none() {
        assert_eq!(best_match(["text/html", "application/json"], Some("text/plain")), None);
    }

    #[test]
    fn quality_orders_compatible_candidates() {
        let best = best_match(
            ["text/html", "application/json"],
            Some("text/html;q=0.3, application/json;q=0.9"),
        );
        assert_eq!(best.as_deref(), Some("application/json"));
    }

    #[test]
    fn malformed_quality_defaults_to_one() {
        let best = best_match(["text/html"], Some("text/html;q=oops"));
        assert_eq!(best.as_deref(), Some("text/html"));
        let best = best_match(["text/html"], Some("text/html;q=7"));
        assert_eq!(best.as_deref(), Some("text/html"));
    }

    #[test]
    fn zero_quality_is_not_acceptable() {
        assert_eq!(best_match(["text/html"], Some("text/html;q=0")), None);
    }

    #[test]
    fn bare_star_reads_as_any() {
        assert_eq!(best_match(["text/html"], Some("*")).as_deref(), Some("text/html"));
    }

    #[test]
    fn subtype_wildcard_matches_within_type() {
        assert_eq!(
            best_match(["application/json", "text/html"], Some("text/*")).as_deref(),
            Some("text/html")
        );
    }

    #[test]
    fn params_raise_specificity() {
        let best = best_match(
            ["text/html", "text/html;level=1"],
            Some("text/html;level=1;q=0.7, text/html;q=0.7"),
        );
        assert_eq!(best.as_deref(), Some("text/html;level=1"));
    }
}
