use sacred_numbers::{RemarkableNumber, RemarkableSet};
use serde::{Deserialize, Serialize};

/// One remarkable number close enough to a query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Name of the remarkable number
    pub name: String,

    /// The query, as an absolute value
    pub value: f64,

    pub remarkable_value: f64,
    pub remarkable_complexity: f64,

    /// Relative distance, see [`relative_delta`]
    pub delta: f64,

    /// `log2(tolerance / (delta * complexity_factor))`
    pub relevance: f64,

    pub complexity_factor: f64,
}

/// Relative distance between a query and a remarkable value.
///
/// The denominator is the smaller of the two: `(x - r) / r` when `x >= r`,
/// `(r - x) / x` otherwise.
#[must_use]
pub fn relative_delta(query: f64, remarkable: f64) -> f64 {
    if query == remarkable {
        0.0
    } else if query >= remarkable {
        (query - remarkable) / remarkable
    } else {
        (remarkable - query) / query
    }
}

#[must_use]
pub fn within_tolerance(delta: f64, tolerance: f64) -> bool {
    delta <= tolerance
}

/// Halvings of `delta` left before leaving the tolerance, discounted by the
/// complexity factor. Exact hits count as `f64::EPSILON` away.
#[must_use]
pub fn relevance(tolerance: f64, delta: f64, complexity_factor: f64) -> f64 {
    (tolerance / (delta.max(f64::EPSILON) * complexity_factor)).log2()
}

/// Score `value` against one remarkable number.
///
/// Kept while the relevance is not negative, so a plain number sitting
/// exactly on the tolerance boundary still matches with relevance 0.
#[must_use]
pub fn score(number: &RemarkableNumber, value: f64, tolerance: f64) -> Option<MatchResult> {
    let delta = relative_delta(value, number.value);
    if !within_tolerance(delta, tolerance) {
        return None;
    }
    let relevance = relevance(tolerance, delta, number.complexity_factor);
    if relevance < 0.0 {
        return None;
    }
    Some(MatchResult {
        name: number.name.clone(),
        value,
        remarkable_value: number.value,
        remarkable_complexity: number.complexity,
        delta,
        relevance,
        complexity_factor: number.complexity_factor,
    })
}

/// Every remarkable number within the set's tolerance of `|value|` whose
/// relevance is not negative, most relevant first. Ties keep ascending
/// remarkable value.
///
/// An empty list means no correlation; non-finite queries always get one.
#[must_use]
pub fn check_number(set: &RemarkableSet, value: f64) -> Vec<MatchResult> {
    let value = value.abs();
    if !value.is_finite() {
        return Vec::new();
    }
    let tolerance = set.tolerance();

    // Anything inside the tolerance lies in [x / (1 + δ), x * (1 + δ)]
    let numbers = set.numbers();
    let slack = 1.0 + 1e-9;
    let low = value / (1.0 + tolerance) / slack;
    let high = value * (1.0 + tolerance) * slack;
    let start = numbers.partition_point(|number| number.value < low);
    let end = numbers.partition_point(|number| number.value <= high);

    let mut matches: Vec<MatchResult> = numbers[start..end.max(start)]
        .iter()
        .filter_map(|number| score(number, value, tolerance))
        .collect();

    matches.sort_by(|a, b| b.relevance.total_cmp(&a.relevance));
    matches
}
