//! Multipart song form parsing
//!
//! Reads the `title`, `artist`, `album`, `genre`, `duration`, `coverUrl`
//! and `audioFile` parts. The media type and size of the audio part are
//! checked while the stream is read, so a rejected upload never reaches disk
//! or the store.

use axum::extract::Multipart;
use mlib_common::SongUpdate;
use tracing::debug;

use crate::error::{ApiError, ApiResult};

pub const AUDIO_FIELD: &str = "audioFile";

/// An accepted audio part, held in memory until the form is complete
#[derive(Debug)]
pub struct AudioUpload {
    pub original_name: String,
    pub bytes: Vec<u8>,
}

/// Text fields and optional audio of a create/update request
///
/// A field is `Some` only if the request contained it.
#[derive(Debug, Default)]
pub struct SongForm {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub duration: Option<f64>,
    pub cover_url: Option<String>,
    pub audio: Option<AudioUpload>,
}

impl SongForm {
    /// Split into metadata changes and the audio part
    pub fn into_parts(self) -> (SongUpdate, Option<AudioUpload>) {
        let update = SongUpdate {
            title: self.title,
            artist: self.artist,
            album: self.album,
            genre: self.genre,
            duration: self.duration,
            cover_url: self.cover_url,
            file_url: None,
        };
        (update, self.audio)
    }
}

/// Consume the multipart stream into a [`SongForm`]
pub async fn read_song_form(mut multipart: Multipart, max_file_bytes: u64) -> ApiResult<SongForm> {
    let mut form = SongForm::default();
    let mut seen_audio = false;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            AUDIO_FIELD => {
                if seen_audio {
                    return Err(ApiError::BadRequest(format!(
                        "Only one '{}' part is allowed",
                        AUDIO_FIELD
                    )));
                }
                seen_audio = true;
                form.audio = read_audio(field, max_file_bytes).await?;
            }
            "title" => form.title = Some(field.text().await?),
            "artist" => form.artist = Some(field.text().await?),
            "album" => form.album = Some(field.text().await?),
            "genre" => form.genre = Some(field.text().await?),
            "coverUrl" => form.cover_url = Some(field.text().await?),
            "duration" => form.duration = parse_duration(&field.text().await?)?,
            other => debug!("Ignoring multipart field '{}'", other),
        }
    }

    Ok(form)
}

async fn read_audio(
    mut field: axum::extract::multipart::Field<'_>,
    max_file_bytes: u64,
) -> ApiResult<Option<AudioUpload>> {
    let original_name = field.file_name().unwrap_or_default().to_string();
    let content_type = field.content_type().unwrap_or_default().to_string();

    // Browsers send an unnamed, empty part when no file was chosen; a part
    // without a filename is never treated as a file
    if original_name.is_empty() {
        return Ok(None);
    }

    if !is_audio_media_type(&content_type) {
        return Err(ApiError::BadRequest(
            "Not an audio file! Please upload only audio files.".to_string(),
        ));
    }

    let mut bytes = Vec::new();
    while let Some(chunk) = field.chunk().await? {
        if (bytes.len() + chunk.len()) as u64 > max_file_bytes {
            return Err(ApiError::PayloadTooLarge(format!(
                "File too large (limit {} bytes)",
                max_file_bytes
            )));
        }
        bytes.extend_from_slice(&chunk);
    }

    if bytes.is_empty() {
        return Err(ApiError::BadRequest("Uploaded audio file is empty".to_string()));
    }

    debug!(
        "Accepted {} ({}, {} bytes)",
        original_name,
        content_type,
        bytes.len()
    );
    Ok(Some(AudioUpload {
        original_name,
        bytes,
    }))
}

fn is_audio_media_type(content_type: &str) -> bool {
    content_type
        .trim()
        .to_ascii_lowercase()
        .starts_with("audio/")
}

/// Empty means "not given"; anything else must be a non-negative number
fn parse_duration(raw: &str) -> ApiResult<Option<f64>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    match raw.parse::<f64>() {
        Ok(seconds) if seconds.is_finite() && seconds >= 0.0 => Ok(Some(seconds)),
        _ => Err(ApiError::BadRequest(format!("Invalid duration: {}", raw))),
    }
}
