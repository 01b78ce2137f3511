//! Domain records shared by the server and the typeahead client.
//!
//! [`Store`] is the persistent record. [`SearchResult`] and [`NearbyStore`]
//! are the transient projections returned by the two search endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A longitude/latitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lng: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Both coordinates are finite and inside the WGS84 ranges.
    pub fn is_valid(&self) -> bool {
        self.lng.is_finite()
            && self.lat.is_finite()
            && (-180.0..=180.0).contains(&self.lng)
            && (-90.0..=90.0).contains(&self.lat)
    }
}

/// GeoJSON-style point with a street address.
///
/// Serialises as `{"type":"Point","coordinates":[lng,lat],"address":"…"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(rename = "type", default = "point_kind")]
    pub kind: String,
    /// `[lng, lat]`, in that order.
    pub coordinates: [f64; 2],
    #[serde(default)]
    pub address: String,
}

fn point_kind() -> String {
    "Point".to_string()
}

impl Location {
    pub fn new(point: GeoPoint, address: impl Into<String>) -> Self {
        Self {
            kind: point_kind(),
            coordinates: [point.lng, point.lat],
            address: address.into(),
        }
    }

    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.coordinates[0], self.coordinates[1])
    }
}

/// A store listed in the directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub id: Uuid,
    pub name: String,
    /// URL-safe, unique identifier derived from `name`.
    pub slug: String,
    pub description: String,
    pub tags: Vec<String>,
    pub created: DateTime<Utc>,
    pub location: Location,
    /// Filename of the resized photo under the uploads directory.
    pub photo: Option<String>,
    /// Id of the user who created the store.
    pub author: Uuid,
}

/// User-supplied fields for creating or updating a [`Store`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub location: Location,
}

impl StoreDraft {
    /// Check the fields the directory cannot do without.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Please enter a store name!".to_string());
        }
        if !self.location.point().is_valid() {
            return Err("You must supply coordinates!".to_string());
        }
        if self.location.address.trim().is_empty() {
            return Err("You must supply an address!".to_string());
        }
        Ok(())
    }
}

/// One hit of the full-text search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub slug: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Relevance weight; higher is more relevant. Only set by text search.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl SearchResult {
    pub fn from_store(store: &Store, score: Option<f64>) -> Self {
        Self {
            slug: store.slug.clone(),
            name: store.name.clone(),
            description: Some(store.description.clone()).filter(|d| !d.is_empty()),
            score,
        }
    }
}

/// Reduced projection returned by the proximity endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyStore {
    pub slug: String,
    pub name: String,
    pub description: String,
    pub location: Location,
    pub photo: Option<String>,
}

impl From<&Store> for NearbyStore {
    fn from(store: &Store) -> Self {
        Self {
            slug: store.slug.clone(),
            name: store.name.clone(),
            description: store.description.clone(),
            location: store.location.clone(),
            photo: store.photo.clone(),
        }
    }
}

/// A tag and the number of stores carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}
