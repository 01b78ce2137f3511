use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use delicious_core::{reviews::Review, Store, StoreDraft, TagCount};
use serde::Serialize;
use uuid::Uuid;

use crate::{auth::CurrentUser, error::ApiError, state::AppState};

/// Multipart field carrying an uploaded photo.
pub const PHOTO_FIELD: &str = "photo";

/// A store page: the record plus its reviews, newest first.
#[derive(Debug, Serialize)]
pub struct StoreDetail {
    #[serde(flatten)]
    pub store: Store,
    pub reviews: Vec<Review>,
}

#[derive(Debug, Serialize)]
pub struct TagPage {
    pub tag: Option<String>,
    pub tags: Vec<TagCount>,
    pub stores: Vec<Store>,
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

pub async fn list_stores(State(state): State<AppState>) -> Result<Json<Vec<Store>>, ApiError> {
    Ok(Json(state.stores.all().await?))
}

pub async fn store_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<StoreDetail>, ApiError> {
    let store = state
        .stores
        .by_slug(&slug)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("no store at /store/{slug}")))?;
    let reviews = state.reviews.for_store(store.id).await?;
    Ok(Json(StoreDetail { store, reviews }))
}

pub async fn all_tags(State(state): State<AppState>) -> Result<Json<TagPage>, ApiError> {
    tag_page(&state, None).await.map(Json)
}

pub async fn stores_by_tag(
    State(state): State<AppState>,
    Path(tag): Path<String>,
) -> Result<Json<TagPage>, ApiError> {
    tag_page(&state, Some(tag)).await.map(Json)
}

async fn tag_page(state: &AppState, tag: Option<String>) -> Result<TagPage, ApiError> {
    let (tags, stores) = tokio::join!(state.stores.tags(), state.stores.by_tag(tag.as_deref()));
    Ok(TagPage {
        tag,
        tags: tags?,
        stores: stores?,
    })
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

pub async fn create_store(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(draft): Json<StoreDraft>,
) -> Result<(StatusCode, Json<Store>), ApiError> {
    let store = state.stores.create(draft, user.id).await?;
    tracing::info!(slug = %store.slug, author = %user.id, "stores: created");
    Ok((StatusCode::CREATED, Json(store)))
}

pub async fn edit_store(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Store>, ApiError> {
    owned_store(&state, id, &user).await.map(Json)
}

pub async fn update_store(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(draft): Json<StoreDraft>,
) -> Result<Json<Store>, ApiError> {
    owned_store(&state, id, &user).await?;
    let store = state.stores.update(id, draft).await?;
    tracing::info!(slug = %store.slug, "stores: updated");
    Ok(Json(store))
}

pub async fn upload_photo(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<Store>, ApiError> {
    owned_store(&state, id, &user).await?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(PHOTO_FIELD) {
            continue;
        }
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        let filename = state.photos.accept(&content_type, bytes).await?;
        let store = state.stores.set_photo(id, filename).await?;
        return Ok(Json(store));
    }

    Err(ApiError::BadRequest(format!("expected a `{PHOTO_FIELD}` field")))
}

/// The store with `id`, provided `user` wrote it.
async fn owned_store(state: &AppState, id: Uuid, user: &CurrentUser) -> Result<Store, ApiError> {
    let store = state
        .stores
        .by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("store {id} not found")))?;

    if store.author != user.id {
        tracing::warn!(store = %id, user = %user.id, "stores: edit by non-owner");
        return Err(ApiError::NotOwner);
    }
    Ok(store)
}
