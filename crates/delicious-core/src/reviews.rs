//! Store reviews and the ratings aggregate behind the top stores page.

use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Stores need this many reviews before they can rank.
pub const TOP_STORES_MIN_REVIEWS: usize = 2;
pub const TOP_STORES_LIMIT: usize = 10;

#[derive(Debug, Error, PartialEq)]
pub enum ReviewError {
    #[error("{0}")]
    Invalid(String),
}

/// Review form as submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewDraft {
    pub text: String,
    /// 1 to 5 stars.
    pub rating: u8,
}

impl ReviewDraft {
    pub fn validate(&self) -> Result<(), String> {
        if self.text.trim().is_empty() {
            return Err("Your review must have text!".to_string());
        }
        if !(1..=5).contains(&self.rating) {
            return Err("Rating must be between 1 and 5!".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub store: Uuid,
    pub author: Uuid,
    pub text: String,
    pub rating: u8,
    pub created: DateTime<Utc>,
}

/// Average rating of one store.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StoreRating {
    pub store: Uuid,
    pub average: f64,
    pub count: usize,
}

pub trait ReviewRepository: Send + Sync {
    fn add(&self, draft: ReviewDraft, store: Uuid, author: Uuid) -> BoxFuture<'_, Result<Review, ReviewError>>;

    /// Reviews of `store`, newest first.
    fn for_store(&self, store: Uuid) -> BoxFuture<'_, Result<Vec<Review>, ReviewError>>;

    /// Stores with at least `min_reviews` reviews, best average first, at
    /// most `limit`.
    fn top_rated(&self, min_reviews: usize, limit: usize) -> BoxFuture<'_, Result<Vec<StoreRating>, ReviewError>>;
}

#[derive(Debug, Default)]
pub struct MemoryReviews {
    reviews: RwLock<Vec<Review>>,
}

impl MemoryReviews {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReviewRepository for MemoryReviews {
    fn add(&self, draft: ReviewDraft, store: Uuid, author: Uuid) -> BoxFuture<'_, Result<Review, ReviewError>> {
        async move {
            draft.validate().map_err(ReviewError::Invalid)?;
            let review = Review {
                id: Uuid::new_v4(),
                store,
                author,
                text: draft.text.trim().to_string(),
                rating: draft.rating,
                created: Utc::now(),
            };
            tracing::debug!(%store, rating = review.rating, "review: added");
            self.reviews.write().await.push(review.clone());
            Ok(review)
        }
        .boxed()
    }

    fn for_store(&self, store: Uuid) -> BoxFuture<'_, Result<Vec<Review>, ReviewError>> {
        async move {
            let mut out: Vec<Review> = self
                .reviews
                .read()
                .await
                .iter()
                .filter(|r| r.store == store)
                .cloned()
                .collect();
            out.reverse();
            Ok(out)
        }
        .boxed()
    }

    fn top_rated(&self, min_reviews: usize, limit: usize) -> BoxFuture<'_, Result<Vec<StoreRating>, ReviewError>> {
        async move {
            let mut sums: HashMap<Uuid, (u32, usize)> = HashMap::new();
            for review in self.reviews.read().await.iter() {
                let entry = sums.entry(review.store).or_default();
                entry.0 += u32::from(review.rating);
                entry.1 += 1;
            }
            let mut ratings: Vec<StoreRating> = sums
                .into_iter()
                .filter(|(_, (_, count))| *count >= min_reviews)
                .map(|(store, (sum, count))| StoreRating {
                    store,
                    average: f64::from(sum) / count as f64,
                    count,
                })
                .collect();
            ratings.sort_by(|a, b| {
                b.average
                    .total_cmp(&a.average)
                    .then_with(|| b.count.cmp(&a.count))
                    .then_with(|| a.store.cmp(&b.store))
            });
            ratings.truncate(limit);
            Ok(ratings)
        }
        .boxed()
    }
}
