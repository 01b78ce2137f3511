//! Search query builders: full-text relevance and geo proximity.
//!
//! The server never hands raw request parameters to the data store. It first
//! builds one of two typed queries:
//!
//! - [`TextQuery`]: free text split into index terms, ranked by relevance over
//!   `name` and `description`, capped at [`TEXT_SEARCH_LIMIT`] hits.
//! - [`GeoQuery`]: a validated point plus a radius of
//!   [`MAX_DISTANCE_METERS`], nearest first, capped at [`NEAR_LIMIT`] hits.
//!
//! Both shapes carry their own matching semantics ([`TextQuery::score`],
//! [`GeoQuery::distance_to`]) so every [`StoreRepository`](crate::store::StoreRepository)
//! ranks the same way.

use crate::types::GeoPoint;
use std::cmp::Ordering;
use thiserror::Error;

/// Maximum number of hits returned by a text search.
pub const TEXT_SEARCH_LIMIT: usize = 5;
/// Maximum number of hits returned by a proximity search.
pub const NEAR_LIMIT: usize = 10;
/// Radius of a proximity search.
pub const MAX_DISTANCE_METERS: u32 = 10_000;

/// Spherical earth radius used for distances, in metres.
const EARTH_RADIUS_METERS: f64 = 6_378_100.0;

/// Fields covered by the text index, with their weights.
const TEXT_INDEX_WEIGHTS: &[(TextField, f64)] = &[(TextField::Name, 1.0), (TextField::Description, 1.0)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Name,
    Description,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a proximity query could not be built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error("missing coordinate `{0}`")]
    Missing(&'static str),
    #[error("coordinate `{axis}` is not a finite number: {value:?}")]
    NotANumber { axis: &'static str, value: String },
    #[error("coordinate `{axis}` is out of range: {value}")]
    OutOfRange { axis: &'static str, value: f64 },
}

// ---------------------------------------------------------------------------
// Text search
// ---------------------------------------------------------------------------

/// A relevance-ranked full-text query.
#[derive(Debug, Clone, PartialEq)]
pub struct TextQuery {
    raw: String,
    terms: Vec<String>,
    pub limit: usize,
}

impl TextQuery {
    /// Build a query from user input.
    ///
    /// Returns `None` for blank input: no search is performed at all.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.trim().is_empty() {
            return None;
        }
        let mut terms = tokenize(raw);
        terms.sort();
        terms.dedup();
        Some(Self {
            raw: raw.to_string(),
            terms,
            limit: TEXT_SEARCH_LIMIT,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Distinct index terms, sorted.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Relevance of a document, or `None` when no term matches.
    ///
    /// Each indexed field contributes, per matching term,
    /// `weight * freq * (0.5 * freq / field_tokens + 0.5)`, so repeated terms
    /// and short fields rank higher.
    pub fn score(&self, name: &str, description: &str) -> Option<f64> {
        let mut total = 0.0;
        let mut matched = false;

        for (field, weight) in TEXT_INDEX_WEIGHTS {
            let text = match field {
                TextField::Name => name,
                TextField::Description => description,
            };
            let tokens = tokenize(text);
            if tokens.is_empty() {
                continue;
            }
            let len = tokens.len() as f64;
            for term in &self.terms {
                let freq = tokens.iter().filter(|t| *t == term).count() as f64;
                if freq > 0.0 {
                    matched = true;
                    total += weight * freq * (0.5 * freq / len + 0.5);
                }
            }
        }

        matched.then_some(total)
    }
}

/// Split text into lowercase ASCII index terms.
///
/// Non-ASCII text is transliterated first, so "Café" and "cafe" index the
/// same way.
pub fn tokenize(text: &str) -> Vec<String> {
    deunicode::deunicode(text)
        .to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// A document paired with its ranking key.
#[derive(Debug, Clone)]
pub struct Ranked<T> {
    pub key: f64,
    pub tie_break: String,
    pub item: T,
}

/// Sort hits by descending score and keep the best `limit`.
///
/// Equal scores fall back to `tie_break` ascending so output is deterministic.
pub fn top_by_score<T>(mut hits: Vec<Ranked<T>>, limit: usize) -> Vec<Ranked<T>> {
    hits.sort_by(|a, b| {
        b.key
            .total_cmp(&a.key)
            .then_with(|| a.tie_break.cmp(&b.tie_break))
    });
    hits.truncate(limit);
    hits
}

/// Sort hits by ascending distance and keep the nearest `limit`.
pub fn nearest_first<T>(mut hits: Vec<Ranked<T>>, limit: usize) -> Vec<Ranked<T>> {
    hits.sort_by(|a, b| match a.key.total_cmp(&b.key) {
        Ordering::Equal => a.tie_break.cmp(&b.tie_break),
        other => other,
    });
    hits.truncate(limit);
    hits
}

// ---------------------------------------------------------------------------
// Proximity search
// ---------------------------------------------------------------------------

/// A radius-bounded proximity query around a validated point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoQuery {
    pub origin: GeoPoint,
    pub max_distance_meters: u32,
    pub limit: usize,
}

impl GeoQuery {
    pub fn new(origin: GeoPoint) -> Self {
        Self {
            origin,
            max_distance_meters: MAX_DISTANCE_METERS,
            limit: NEAR_LIMIT,
        }
    }

    /// Build a query from raw `lng` / `lat` request parameters.
    ///
    /// Fails closed: anything that is not a finite, in-range coordinate pair
    /// is rejected instead of being forwarded to the data store.
    pub fn parse(lng: Option<&str>, lat: Option<&str>) -> Result<Self, QueryError> {
        let lng = parse_axis("lng", lng, 180.0)?;
        let lat = parse_axis("lat", lat, 90.0)?;
        Ok(Self::new(GeoPoint::new(lng, lat)))
    }

    /// Distance from the origin in metres, or `None` when outside the radius.
    pub fn distance_to(&self, point: GeoPoint) -> Option<f64> {
        let d = haversine_meters(self.origin, point);
        (d <= self.max_distance_meters as f64).then_some(d)
    }
}

fn parse_axis(axis: &'static str, raw: Option<&str>, bound: f64) -> Result<f64, QueryError> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty()).ok_or(QueryError::Missing(axis))?;
    let value: f64 = raw
        .parse()
        .ok()
        .filter(|v: &f64| v.is_finite())
        .ok_or_else(|| QueryError::NotANumber {
            axis,
            value: raw.to_string(),
        })?;
    if value.abs() > bound {
        return Err(QueryError::OutOfRange { axis, value });
    }
    Ok(value)
}

/// Great-circle distance between two points, in metres.
pub fn haversine_meters(a: GeoPoint, b: GeoPoint) -> f64 {
    let (lat1, lat2) = (a.lat.to_radians(), b.lat.to_radians());
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_METERS * h.sqrt().min(1.0).asin()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
