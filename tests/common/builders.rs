//! Test builders: ergonomic constructors for store drafts and search hits.
//!
//! These builders are designed for readability in test assertions, not for
//! production use.

use delicious_core::{types::GeoPoint, Location, SearchResult, StoreDraft};

/// Metres covered by one degree of longitude along the equator, for the
/// earth radius the proximity search uses.
pub const METERS_PER_DEGREE: f64 = 6_378_100.0 * std::f64::consts::PI / 180.0;

// ---------------------------------------------------------------------------
// StoreDraftBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`StoreDraft`] fixtures.
///
/// # Example
///
/// ```rust
/// let draft = StoreDraftBuilder::new("Coffee Pourhouse")
///     .description("pour overs")
///     .tag("Wifi")
///     .meters_east(2_500.0)
///     .build();
/// ```
pub struct StoreDraftBuilder {
    name: String,
    description: String,
    tags: Vec<String>,
    point: GeoPoint,
    address: String,
}

impl StoreDraftBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            tags: Vec::new(),
            point: GeoPoint::new(0.0, 0.0),
            address: "1 Test Street".to_string(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn at(mut self, lng: f64, lat: f64) -> Self {
        self.point = GeoPoint::new(lng, lat);
        self
    }

    /// Place the store on the equator, `meters` east of (0, 0).
    pub fn meters_east(self, meters: f64) -> Self {
        self.at(meters / METERS_PER_DEGREE, 0.0)
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn build(self) -> StoreDraft {
        StoreDraft {
            name: self.name,
            description: self.description,
            tags: self.tags,
            location: Location::new(self.point, self.address),
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience constructors
// ---------------------------------------------------------------------------

/// A text-search hit as the server would return it.
pub fn hit(slug: &str, name: &str) -> SearchResult {
    SearchResult {
        slug: slug.to_string(),
        name: name.to_string(),
        description: None,
        score: Some(1.0),
    }
}

/// `n` hits named `{prefix} 0`, `{prefix} 1`, ...
pub fn hits(prefix: &str, n: usize) -> Vec<SearchResult> {
    (0..n)
        .map(|i| hit(&format!("{}-{i}", prefix.to_lowercase()), &format!("{prefix} {i}")))
        .collect()
}

/// Seven drafts that all match "coffee", each with a distinct score: the
/// `k`-th mentions the term `k` times in its description.
pub fn coffee_drafts() -> Vec<StoreDraft> {
    (1..=7)
        .map(|k| {
            let mentions = vec!["coffee"; k].join(" ");
            StoreDraftBuilder::new(format!("Shop {k}"))
                .description(format!("{mentions} and some plain filler words here"))
                .build()
        })
        .collect()
}
