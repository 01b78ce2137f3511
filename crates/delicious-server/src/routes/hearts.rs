use axum::{
    extract::{Path, State},
    Json,
};
use delicious_core::{accounts::User, Store};
use uuid::Uuid;

use crate::{auth::CurrentUser, error::ApiError, state::AppState};

/// `POST /api/stores/{id}/heart`: toggle the store in the user's hearts.
pub async fn heart_store(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError> {
    if state.stores.by_id(id).await?.is_none() {
        return Err(ApiError::NotFound(format!("store {id} not found")));
    }
    let updated = state.users.toggle_heart(user.id, id).await?;
    tracing::debug!(
        user = %user.id,
        store = %id,
        hearted = updated.has_hearted(id),
        "hearts: toggled"
    );
    Ok(Json(updated))
}

/// `GET /hearts`: the stores the user has hearted.
pub async fn hearted_stores(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<Store>>, ApiError> {
    let account = state
        .users
        .by_id(user.id)
        .await?
        .ok_or(ApiError::Unauthenticated)?;
    Ok(Json(state.stores.by_ids(&account.hearts).await?))
}
