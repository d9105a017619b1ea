//! Persisted favorites (song id + time favorited)

use crate::models::SongRow;
use crate::{time, Favorite, Result, Song};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Mark a song as favorite
///
/// Idempotent: favoriting twice keeps the original `added_at`. The song must
/// exist (enforced by the foreign key).
pub async fn add(pool: &SqlitePool, song_id: Uuid) -> Result<Favorite> {
    sqlx::query("INSERT INTO favorites (song_id, added_at) VALUES (?, ?) ON CONFLICT(song_id) DO NOTHING")
        .bind(song_id.to_string())
        .bind(time::now())
        .execute(pool)
        .await?;

    let added_at: DateTime<Utc> =
        sqlx::query_scalar("SELECT added_at FROM favorites WHERE song_id = ?")
            .bind(song_id.to_string())
            .fetch_one(pool)
            .await?;

    Ok(Favorite { song_id, added_at })
}

/// Remove a favorite; returns whether one existed
pub async fn remove(pool: &SqlitePool, song_id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM favorites WHERE song_id = ?")
        .bind(song_id.to_string())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Favorited songs, most recently favorited first
pub async fn list_songs(pool: &SqlitePool, limit: i64) -> Result<Vec<Song>> {
    let rows: Vec<SongRow> = sqlx::query_as(
        r#"
        SELECT s.id, s.title, s.artist, s.album, s.genre, s.duration,
               s.file_url, s.cover_url, s.created_at
        FROM favorites f
        JOIN songs s ON s.id = f.song_id
        ORDER BY f.added_at DESC, f.rowid DESC
        LIMIT ?
        "#,
    )
    .bind(limit.max(0))
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(Song::try_from).collect()
}
