//! Song endpoints: `/api/music`
//!
//! Store writes come first; binaries are only deleted once the record
//! change that stops referencing them has committed. A failed store write
//! removes the binary written for it.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use mlib_common::db::songs;
use mlib_common::{uuid_utils, NewSong, Song};
use tracing::{info, warn};

use super::MessageResponse;
use crate::error::{ApiContext, ApiError, ApiResult};
use crate::upload::read_song_form;
use crate::AppState;

/// Look up a song by its path id; malformed ids are simply not found
pub(crate) async fn find_song(state: &AppState, raw_id: &str, context: &str) -> ApiResult<Song> {
    let id = uuid_utils::parse_id(raw_id).ok_or_else(ApiError::song_not_found)?;

    songs::get(&state.db, id)
        .await
        .api_context(context)?
        .ok_or_else(ApiError::song_not_found)
}

fn required(value: Option<String>, name: &str) -> ApiResult<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest(format!("{} is required", name)))
}

/// GET /api/music
///
/// All songs, newest first.
pub async fn list_songs(State(state): State<AppState>) -> ApiResult<Json<Vec<Song>>> {
    let songs = songs::list(&state.db)
        .await
        .api_context("Error fetching songs")?;
    Ok(Json(songs))
}

/// GET /api/music/:id
pub async fn get_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Song>> {
    find_song(&state, &id, "Error fetching song").await.map(Json)
}

/// POST /api/music
///
/// Multipart upload: metadata fields plus a required `audioFile`.
pub async fn create_song(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<(StatusCode, Json<Song>)> {
    let form = read_song_form(multipart?, state.max_upload_bytes).await?;
    let (fields, audio) = form.into_parts();

    let audio = audio.ok_or_else(|| ApiError::BadRequest("No audio file uploaded".to_string()))?;
    let title = required(fields.title, "Title")?;
    let artist = required(fields.artist, "Artist")?;

    let file_url = state
        .storage
        .store(&audio.original_name, &audio.bytes)
        .await
        .map_err(|e| ApiError::internal("Error creating song", e))?;

    let new_song = NewSong {
        title,
        artist,
        album: fields.album.unwrap_or_default(),
        genre: fields.genre.unwrap_or_default(),
        duration: fields.duration.unwrap_or(0.0),
        file_url: file_url.clone(),
        cover_url: fields.cover_url.unwrap_or_default(),
    };

    match songs::insert(&state.db, new_song).await {
        Ok(song) => {
            info!(id = %song.id, title = %song.title, file_url = %song.file_url, "Created song");
            Ok((StatusCode::CREATED, Json(song)))
        }
        Err(e) => {
            state.storage.remove(&file_url).await;
            Err(e).api_context("Error creating song")
        }
    }
}

/// PUT /api/music/:id
///
/// Fields present in the form overwrite stored values; absent fields are
/// kept. A new `audioFile` replaces the stored binary.
pub async fn update_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<Song>> {
    // Unknown ids are 404 whatever the body looks like
    let existing = find_song(&state, &id, "Error updating song").await?;

    let form = read_song_form(multipart?, state.max_upload_bytes).await?;
    let (mut update, audio) = form.into_parts();

    if let Some(audio) = audio {
        let file_url = state
            .storage
            .store(&audio.original_name, &audio.bytes)
            .await
            .map_err(|e| ApiError::internal("Error updating song", e))?;
        update.file_url = Some(file_url);
    }

    let updated = match songs::update(&state.db, existing.id, &update).await {
        Ok(Some(song)) => song,
        other => {
            // Record never took the new binary
            if let Some(new_url) = &update.file_url {
                state.storage.remove(new_url).await;
            }
            return match other {
                Ok(_) => Err(ApiError::song_not_found()),
                Err(e) => Err(e).api_context("Error updating song"),
            };
        }
    };

    if updated.file_url != existing.file_url && !state.storage.remove(&existing.file_url).await {
        warn!(id = %updated.id, "Previous binary {} was not removed", existing.file_url);
    }

    info!(id = %updated.id, "Updated song");
    Ok(Json(updated))
}

/// DELETE /api/music/:id
///
/// Removes the record, then its binary (best-effort).
pub async fn delete_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let song = find_song(&state, &id, "Error deleting song").await?;

    let removed = songs::delete(&state.db, song.id)
        .await
        .api_context("Error deleting song")?;
    if !removed {
        return Err(ApiError::song_not_found());
    }

    if !state.storage.remove(&song.file_url).await {
        warn!(id = %song.id, "Binary {} was not removed", song.file_url);
    }

    info!(id = %song.id, title = %song.title, "Deleted song");
    Ok(Json(MessageResponse::new("Song deleted successfully")))
}
