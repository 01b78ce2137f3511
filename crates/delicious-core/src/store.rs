//! Store repository: the document-store collaborator for [`Store`] records.
//!
//! [`StoreRepository`] is the seam the server talks to. It covers plain CRUD,
//! tag aggregation and the two search shapes built in [`crate::search`].
//! [`MemoryStore`] is the in-process implementation used by the binary and the
//! test harnesses; it keeps records in insertion order behind a
//! `tokio::sync::RwLock`.

use crate::{
    search::{nearest_first, top_by_score, GeoQuery, Ranked, TextQuery},
    types::{Location, NearbyStore, SearchResult, Store, StoreDraft, TagCount},
};
use chrono::Utc;
use futures::future::{BoxFuture, FutureExt};
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("store {0} not found")]
    NotFound(Uuid),
    #[error("{0}")]
    Invalid(String),
}

/// Data-store operations on [`Store`] records.
///
/// Futures are boxed so the trait stays object safe and handlers can hold an
/// `Arc<dyn StoreRepository>`.
pub trait StoreRepository: Send + Sync {
    /// Validate and persist a new store, assigning id, slug and timestamp.
    fn create(&self, draft: StoreDraft, author: Uuid) -> BoxFuture<'_, Result<Store, StoreError>>;

    /// Replace the editable fields of an existing store. The slug is
    /// regenerated when the name changes.
    fn update(&self, id: Uuid, draft: StoreDraft) -> BoxFuture<'_, Result<Store, StoreError>>;

    /// Record the stored photo filename on a store.
    fn set_photo(&self, id: Uuid, photo: String) -> BoxFuture<'_, Result<Store, StoreError>>;

    fn by_id(&self, id: Uuid) -> BoxFuture<'_, Result<Option<Store>, StoreError>>;

    fn by_slug<'a>(&'a self, slug: &'a str) -> BoxFuture<'a, Result<Option<Store>, StoreError>>;

    /// Every store, oldest first.
    fn all(&self) -> BoxFuture<'_, Result<Vec<Store>, StoreError>>;

    /// Stores whose id is in `ids`, oldest first.
    fn by_ids<'a>(&'a self, ids: &'a [Uuid]) -> BoxFuture<'a, Result<Vec<Store>, StoreError>>;

    /// Stores carrying `tag`, or every tagged store when `tag` is `None`.
    fn by_tag<'a>(&'a self, tag: Option<&'a str>) -> BoxFuture<'a, Result<Vec<Store>, StoreError>>;

    /// Tags with their store counts, most used first.
    fn tags(&self) -> BoxFuture<'_, Result<Vec<TagCount>, StoreError>>;

    /// Full-text search, best match first, at most `query.limit` hits.
    fn text_search<'a>(
        &'a self,
        query: &'a TextQuery,
    ) -> BoxFuture<'a, Result<Vec<SearchResult>, StoreError>>;

    /// Proximity search, nearest first, at most `query.limit` hits.
    fn near<'a>(&'a self, query: &'a GeoQuery) -> BoxFuture<'a, Result<Vec<NearbyStore>, StoreError>>;
}

// ---------------------------------------------------------------------------
// Slugs
// ---------------------------------------------------------------------------

/// Turn a store name into a URL-safe slug: transliterated, lowercase,
/// dash-separated.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in deunicode::deunicode(name).to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        slug.push_str("store");
    }
    slug
}

/// Pick a slug for `name` that does not collide with `taken`.
///
/// Collisions get the lowest free numeric suffix: `cafe`, `cafe-2`, `cafe-3`, …
fn unique_slug<'a>(name: &str, taken: impl Iterator<Item = &'a str>) -> String {
    let base = slugify(name);
    let taken: HashSet<&str> = taken.collect();
    if !taken.contains(base.as_str()) {
        return base;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{base}-{n}");
        if !taken.contains(candidate.as_str()) {
            return candidate;
        }
        n += 1;
    }
}

fn normalise_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_string();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

// ---------------------------------------------------------------------------
// In-memory implementation
// ---------------------------------------------------------------------------

/// In-process [`StoreRepository`] keeping records in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    stores: RwLock<Vec<Store>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert fully-formed records as-is (fixtures and seed data).
    pub async fn extend(&self, stores: impl IntoIterator<Item = Store>) {
        self.stores.write().await.extend(stores);
    }

    pub async fn len(&self) -> usize {
        self.stores.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.stores.read().await.is_empty()
    }
}

impl StoreRepository for MemoryStore {
    fn create(&self, draft: StoreDraft, author: Uuid) -> BoxFuture<'_, Result<Store, StoreError>> {
        async move {
            draft.validate().map_err(StoreError::Invalid)?;
            let mut stores = self.stores.write().await;
            let slug = unique_slug(&draft.name, stores.iter().map(|s| s.slug.as_str()));
            let store = Store {
                id: Uuid::new_v4(),
                name: draft.name.trim().to_string(),
                slug,
                description: draft.description.trim().to_string(),
                tags: normalise_tags(draft.tags),
                created: Utc::now(),
                location: Location {
                    kind: "Point".to_string(),
                    ..draft.location
                },
                photo: None,
                author,
            };
            tracing::debug!(id = %store.id, slug = %store.slug, "store: created");
            stores.push(store.clone());
            Ok(store)
        }
        .boxed()
    }

    fn update(&self, id: Uuid, draft: StoreDraft) -> BoxFuture<'_, Result<Store, StoreError>> {
        async move {
            draft.validate().map_err(StoreError::Invalid)?;
            let mut stores = self.stores.write().await;
            let idx = stores
                .iter()
                .position(|s| s.id == id)
                .ok_or(StoreError::NotFound(id))?;

            let name = draft.name.trim().to_string();
            if stores[idx].name != name {
                let slug = unique_slug(
                    &name,
                    stores.iter().filter(|s| s.id != id).map(|s| s.slug.as_str()),
                );
                stores[idx].slug = slug;
            }

            let store = &mut stores[idx];
            store.name = name;
            store.description = draft.description.trim().to_string();
            store.tags = normalise_tags(draft.tags);
            store.location = draft.location;
            store.location.kind = "Point".to_string();
            tracing::debug!(id = %store.id, slug = %store.slug, "store: updated");
            Ok(store.clone())
        }
        .boxed()
    }

    fn set_photo(&self, id: Uuid, photo: String) -> BoxFuture<'_, Result<Store, StoreError>> {
        async move {
            let mut stores = self.stores.write().await;
            let store = stores
                .iter_mut()
                .find(|s| s.id == id)
                .ok_or(StoreError::NotFound(id))?;
            store.photo = Some(photo);
            Ok(store.clone())
        }
        .boxed()
    }

    fn by_id(&self, id: Uuid) -> BoxFuture<'_, Result<Option<Store>, StoreError>> {
        async move { Ok(self.stores.read().await.iter().find(|s| s.id == id).cloned()) }.boxed()
    }

    fn by_slug<'a>(&'a self, slug: &'a str) -> BoxFuture<'a, Result<Option<Store>, StoreError>> {
        async move { Ok(self.stores.read().await.iter().find(|s| s.slug == slug).cloned()) }.boxed()
    }

    fn all(&self) -> BoxFuture<'_, Result<Vec<Store>, StoreError>> {
        async move { Ok(self.stores.read().await.clone()) }.boxed()
    }

    fn by_ids<'a>(&'a self, ids: &'a [Uuid]) -> BoxFuture<'a, Result<Vec<Store>, StoreError>> {
        async move {
            Ok(self
                .stores
                .read()
                .await
                .iter()
                .filter(|s| ids.contains(&s.id))
                .cloned()
                .collect())
        }
        .boxed()
    }

    fn by_tag<'a>(&'a self, tag: Option<&'a str>) -> BoxFuture<'a, Result<Vec<Store>, StoreError>> {
        async move {
            Ok(self
                .stores
                .read()
                .await
                .iter()
                .filter(|s| match tag {
                    Some(tag) => s.tags.iter().any(|t| t == tag),
                    None => !s.tags.is_empty(),
                })
                .cloned()
                .collect())
        }
        .boxed()
    }

    fn tags(&self) -> BoxFuture<'_, Result<Vec<TagCount>, StoreError>> {
        async move {
            let mut counts: HashMap<String, usize> = HashMap::new();
            for store in self.stores.read().await.iter() {
                for tag in &store.tags {
                    *counts.entry(tag.clone()).or_default() += 1;
                }
            }
            let mut tags: Vec<TagCount> = counts
                .into_iter()
                .map(|(tag, count)| TagCount { tag, count })
                .collect();
            tags.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
            Ok(tags)
        }
        .boxed()
    }

    fn text_search<'a>(
        &'a self,
        query: &'a TextQuery,
    ) -> BoxFuture<'a, Result<Vec<SearchResult>, StoreError>> {
        async move {
            let stores = self.stores.read().await;
            let hits = stores
                .iter()
                .filter_map(|s| {
                    query.score(&s.name, &s.description).map(|key| Ranked {
                        key,
                        tie_break: s.name.clone(),
                        item: s,
                    })
                })
                .collect();
            let results: Vec<SearchResult> = top_by_score(hits, query.limit)
                .into_iter()
                .map(|r| SearchResult::from_store(r.item, Some(r.key)))
                .collect();
            tracing::debug!(query = %query.raw(), hits = results.len(), "store: text search");
            Ok(results)
        }
        .boxed()
    }

    fn near<'a>(&'a self, query: &'a GeoQuery) -> BoxFuture<'a, Result<Vec<NearbyStore>, StoreError>> {
        async move {
            let stores = self.stores.read().await;
            let hits = stores
                .iter()
                .filter_map(|s| {
                    query.distance_to(s.location.point()).map(|key| Ranked {
                        key,
                        tie_break: s.slug.clone(),
                        item: s,
                    })
                })
                .collect();
            let results: Vec<NearbyStore> = nearest_first(hits, query.limit)
                .into_iter()
                .map(|r| NearbyStore::from(r.item))
                .collect();
            tracing::debug!(
                lng = query.origin.lng,
                lat = query.origin.lat,
                hits = results.len(),
                "store: proximity search"
            );
            Ok(results)
        }
        .boxed()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
