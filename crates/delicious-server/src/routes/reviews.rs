use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use delicious_core::reviews::{Review, ReviewDraft, TOP_STORES_LIMIT, TOP_STORES_MIN_REVIEWS};
use serde::Serialize;
use uuid::Uuid;

use crate::{auth::CurrentUser, error::ApiError, state::AppState};

/// One row of the top stores page.
#[derive(Debug, Serialize)]
pub struct TopStore {
    pub slug: String,
    pub name: String,
    pub photo: Option<String>,
    pub average_rating: f64,
    pub review_count: usize,
}

/// `POST /reviews/{id}`: review the store with `id`.
pub async fn add_review(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(draft): Json<ReviewDraft>,
) -> Result<(StatusCode, Json<Review>), ApiError> {
    if state.stores.by_id(id).await?.is_none() {
        return Err(ApiError::NotFound(format!("store {id} not found")));
    }
    let review = state.reviews.add(draft, id, user.id).await?;
    tracing::info!(store = %id, author = %user.id, rating = review.rating, "reviews: added");
    Ok((StatusCode::CREATED, Json(review)))
}

/// `GET /top`: best average rating first, among stores with enough reviews.
pub async fn top_stores(State(state): State<AppState>) -> Result<Json<Vec<TopStore>>, ApiError> {
    let ratings = state
        .reviews
        .top_rated(TOP_STORES_MIN_REVIEWS, TOP_STORES_LIMIT)
        .await?;
    let ids: Vec<Uuid> = ratings.iter().map(|r| r.store).collect();
    let stores = state.stores.by_ids(&ids).await?;

    let top = ratings
        .iter()
        .filter_map(|rating| {
            let store = stores.iter().find(|s| s.id == rating.store)?;
            Some(TopStore {
                slug: store.slug.clone(),
                name: store.name.clone(),
                photo: store.photo.clone(),
                average_rating: rating.average,
                review_count: rating.count,
            })
        })
        .collect();
    Ok(Json(top))
}
