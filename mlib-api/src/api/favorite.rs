//! Favorite endpoints: `/api/favorite`
//!
//! In `derived` mode favorites are the most recently created songs and
//! add/remove only confirm the song exists, so a client's additions don't
//! survive a reload. `persisted` mode stores the relation.

use axum::{
    extract::{Path, State},
    Json,
};
use mlib_common::db::{favorites, songs};
use mlib_common::{FavoritesMode, Song};
use tracing::debug;

use super::music::find_song;
use super::MessageResponse;
use crate::error::{ApiContext, ApiResult};
use crate::AppState;

/// GET /api/favorite
pub async fn list_favorites(State(state): State<AppState>) -> ApiResult<Json<Vec<Song>>> {
    let result = match state.favorites_mode {
        FavoritesMode::Derived => songs::recent(&state.db, state.favorites_limit).await,
        FavoritesMode::Persisted => favorites::list_songs(&state.db, state.favorites_limit).await,
    };

    let favorites = result.api_context("Error fetching favorites")?;
    Ok(Json(favorites))
}

/// POST /api/favorite/:id
pub async fn add_favorite(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Song>> {
    let context = "Error adding to favorites";
    let song = find_song(&state, &id, context).await?;

    if state.favorites_mode == FavoritesMode::Persisted {
        favorites::add(&state.db, song.id).await.api_context(context)?;
        debug!(id = %song.id, "Added favorite");
    }

    Ok(Json(song))
}

/// DELETE /api/favorite/:id
pub async fn remove_favorite(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let context = "Error removing from favorites";
    let song = find_song(&state, &id, context).await?;

    if state.favorites_mode == FavoritesMode::Persisted {
        let existed = favorites::remove(&state.db, song.id)
            .await
            .api_context(context)?;
        debug!(id = %song.id, existed, "Removed favorite");
    }

    Ok(Json(MessageResponse::new("Removed from favorites")))
}
