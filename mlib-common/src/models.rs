//! Data model: songs and favorites
//!
//! JSON field names are camelCase to match what browser clients expect
//! (`fileUrl`, `createdAt`, ...). Store rows use snake_case columns and are
//! converted through [`SongRow`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// A song record: metadata describing one uploaded track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: Uuid,
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub album: String,
    #[serde(default)]
    pub genre: String,
    /// Length in seconds (0 when unknown)
    #[serde(default)]
    pub duration: f64,
    /// Public path of the stored binary, e.g. `/uploads/audioFile-...mp3`
    pub file_url: String,
    #[serde(default)]
    pub cover_url: String,
    pub created_at: DateTime<Utc>,
}

/// Fields of a song about to be created
///
/// `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone, Default)]
pub struct NewSong {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
    pub duration: f64,
    pub file_url: String,
    pub cover_url: String,
}

/// Changes to apply to an existing song
///
/// `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SongUpdate {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub duration: Option<f64>,
    pub cover_url: Option<String>,
    pub file_url: Option<String>,
}

/// A persisted favorite: song id plus the time it was favorited
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub song_id: Uuid,
    pub added_at: DateTime<Utc>,
}

/// Raw `songs` row as stored in SQLite
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct SongRow {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
    pub duration: f64,
    pub file_url: String,
    pub cover_url: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<SongRow> for Song {
    type Error = Error;

    fn try_from(row: SongRow) -> Result<Self> {
        let id = Uuid::parse_str(&row.id)
            .map_err(|e| Error::Internal(format!("Corrupt song id '{}': {}", row.id, e)))?;

        Ok(Song {
            id,
            title: row.title,
            artist: row.artist,
            album: row.album,
            genre: row.genre,
            duration: row.duration,
            file_url: row.file_url,
            cover_url: row.cover_url,
            created_at: row.created_at,
        })
    }
}
