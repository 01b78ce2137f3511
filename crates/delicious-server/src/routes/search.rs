//! Read-only query endpoints behind the typeahead and the map.
//!
//! Both endpoints answer malformed input with an empty list. A blank `q`
//! never reaches the repository, and coordinates that are missing, not
//! numbers, or out of range are logged and dropped.

use axum::{
    extract::{Query, State},
    Json,
};
use delicious_core::{
    search::{GeoQuery, TextQuery},
    NearbyStore, SearchResult,
};
use serde::Deserialize;

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NearParams {
    pub lng: Option<String>,
    pub lat: Option<String>,
}

/// `GET /api/search?q=`
pub async fn search_stores(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SearchResult>>, ApiError> {
    let Some(query) = params.q.as_deref().and_then(TextQuery::parse) else {
        tracing::debug!("search: blank query");
        return Ok(Json(Vec::new()));
    };

    let results = state.stores.text_search(&query).await?;
    tracing::debug!(q = query.raw(), hits = results.len(), "search: text");
    Ok(Json(results))
}

/// `GET /api/stores/near?lng=&lat=`
pub async fn map_stores(
    State(state): State<AppState>,
    Query(params): Query<NearParams>,
) -> Result<Json<Vec<NearbyStore>>, ApiError> {
    let query = match GeoQuery::parse(params.lng.as_deref(), params.lat.as_deref()) {
        Ok(query) => query,
        Err(e) => {
            tracing::warn!(error = %e, "search: rejected proximity query");
            return Ok(Json(Vec::new()));
        }
    };

    let stores = state.stores.near(&query).await?;
    tracing::debug!(
        lng = query.origin.lng,
        lat = query.origin.lat,
        hits = stores.len(),
        "search: near"
    );
    Ok(Json(stores))
}
