//! Song record queries
//!
//! Listing order is `created_at DESC`; rows created within the same
//! timestamp fall back to reverse insertion order.

use crate::models::SongRow;
use crate::{time, uuid_utils, Error, NewSong, Result, Song, SongUpdate};
use sqlx::SqlitePool;
use uuid::Uuid;

const SONG_COLUMNS: &str =
    "id, title, artist, album, genre, duration, file_url, cover_url, created_at";

fn rows_to_songs(rows: Vec<SongRow>) -> Result<Vec<Song>> {
    rows.into_iter().map(Song::try_from).collect()
}

/// All songs, newest first
pub async fn list(pool: &SqlitePool) -> Result<Vec<Song>> {
    let rows: Vec<SongRow> = sqlx::query_as(&format!(
        "SELECT {} FROM songs ORDER BY created_at DESC, rowid DESC",
        SONG_COLUMNS
    ))
    .fetch_all(pool)
    .await?;

    rows_to_songs(rows)
}

/// The `limit` newest songs
pub async fn recent(pool: &SqlitePool, limit: i64) -> Result<Vec<Song>> {
    let rows: Vec<SongRow> = sqlx::query_as(&format!(
        "SELECT {} FROM songs ORDER BY created_at DESC, rowid DESC LIMIT ?",
        SONG_COLUMNS
    ))
    .bind(limit.max(0))
    .fetch_all(pool)
    .await?;

    rows_to_songs(rows)
}

pub async fn get(pool: &SqlitePool, id: Uuid) -> Result<Option<Song>> {
    let row: Option<SongRow> =
        sqlx::query_as(&format!("SELECT {} FROM songs WHERE id = ?", SONG_COLUMNS))
            .bind(id.to_string())
            .fetch_optional(pool)
            .await?;

    row.map(Song::try_from).transpose()
}

pub async fn count(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM songs")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Insert a new song, assigning its id and creation time
pub async fn insert(pool: &SqlitePool, new: NewSong) -> Result<Song> {
    if new.title.trim().is_empty() {
        return Err(Error::InvalidInput("title is required".to_string()));
    }
    if new.artist.trim().is_empty() {
        return Err(Error::InvalidInput("artist is required".to_string()));
    }
    if new.file_url.is_empty() {
        return Err(Error::InvalidInput("fileUrl is required".to_string()));
    }

    let song = Song {
        id: uuid_utils::generate(),
        title: new.title,
        artist: new.artist,
        album: new.album,
        genre: new.genre,
        duration: new.duration,
        file_url: new.file_url,
        cover_url: new.cover_url,
        created_at: time::now(),
    };

    sqlx::query(&format!(
        "INSERT INTO songs ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        SONG_COLUMNS
    ))
    .bind(song.id.to_string())
    .bind(&song.title)
    .bind(&song.artist)
    .bind(&song.album)
    .bind(&song.genre)
    .bind(song.duration)
    .bind(&song.file_url)
    .bind(&song.cover_url)
    .bind(song.created_at)
    .execute(pool)
    .await?;

    Ok(song)
}

/// Apply `update` to the song; `Ok(None)` when no such song exists
pub async fn update(pool: &SqlitePool, id: Uuid, update: &SongUpdate) -> Result<Option<Song>> {
    for (name, value) in [("title", &update.title), ("artist", &update.artist)] {
        if matches!(value, Some(v) if v.trim().is_empty()) {
            return Err(Error::InvalidInput(format!("{} must not be empty", name)));
        }
    }

    // NULL binds keep the stored value
    let row: Option<SongRow> = sqlx::query_as(&format!(
        r#"
        UPDATE songs SET
            title = COALESCE(?, title),
            artist = COALESCE(?, artist),
            album = COALESCE(?, album),
            genre = COALESCE(?, genre),
            duration = COALESCE(?, duration),
            cover_url = COALESCE(?, cover_url),
            file_url = COALESCE(?, file_url)
        WHERE id = ?
        RETURNING {}
        "#,
        SONG_COLUMNS
    ))
    .bind(update.title.as_deref())
    .bind(update.artist.as_deref())
    .bind(update.album.as_deref())
    .bind(update.genre.as_deref())
    .bind(update.duration)
    .bind(update.cover_url.as_deref())
    .bind(update.file_url.as_deref())
    .bind(id.to_string())
    .fetch_optional(pool)
    .await?;

    row.map(Song::try_from).transpose()
}

/// Delete the song; returns whether a record was removed
pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM songs WHERE id = ?")
        .bind(id.to_string())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
