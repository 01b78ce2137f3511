//! Domain-specific assertion macros for delicious harnesses.
//!
//! These add context-rich failure messages that make it clear which ordering
//! or shape rule a result list broke.

/// Assert that text-search hits are ordered by non-increasing score.
///
/// ```rust
/// assert_descending_scores!(results);
/// ```
#[macro_export]
macro_rules! assert_descending_scores {
    ($results:expr) => {{
        let results: &[delicious_core::SearchResult] = &$results;
        let scores: Vec<f64> = results
            .iter()
            .map(|r| r.score.expect("text search hits carry a score"))
            .collect();
        for pair in scores.windows(2) {
            if pair[0] < pair[1] {
                panic!(
                    "assert_descending_scores! failed:\n  scores: {:?}\n  slugs:  {:?}",
                    scores,
                    results.iter().map(|r| &r.slug).collect::<Vec<_>>()
                );
            }
        }
    }};
}

/// Assert that proximity hits are ordered nearest first from `origin`.
#[macro_export]
macro_rules! assert_nearest_first {
    ($stores:expr, $origin:expr) => {{
        let stores: &[delicious_core::NearbyStore] = &$stores;
        let origin: delicious_core::GeoPoint = $origin;
        let distances: Vec<f64> = stores
            .iter()
            .map(|s| delicious_core::search::haversine_meters(origin, s.location.point()))
            .collect();
        for pair in distances.windows(2) {
            if pair[0] > pair[1] {
                panic!(
                    "assert_nearest_first! failed:\n  distances: {:?}\n  slugs:     {:?}",
                    distances,
                    stores.iter().map(|s| &s.slug).collect::<Vec<_>>()
                );
            }
        }
    }};
}

/// Assert that a JSON object has exactly the given keys.
///
/// ```rust
/// assert_keys!(value, ["slug", "name"]);
/// ```
#[macro_export]
macro_rules! assert_keys {
    ($value:expr, [$($key:expr),* $(,)?]) => {{
        let value: &serde_json::Value = &$value;
        let mut actual: Vec<&str> = value
            .as_object()
            .unwrap_or_else(|| panic!("assert_keys! failed: not an object: {}", value))
            .keys()
            .map(String::as_str)
            .collect();
        actual.sort_unstable();
        let mut expected: Vec<&str> = vec![$($key),*];
        expected.sort_unstable();
        if actual != expected {
            panic!(
                "assert_keys! failed:\n  expected: {:?}\n  actual:   {:?}",
                expected, actual
            );
        }
    }};
}
