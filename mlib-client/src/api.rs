//! HTTP client for the music library API

use mlib_common::Song;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use uuid::Uuid;

use crate::error::{ClientError, Result};
use crate::state::UploadForm;

const USER_AGENT: &str = concat!("mlib-client/", env!("CARGO_PKG_VERSION"));

/// `{"message": "..."}` bodies (errors and confirmations)
#[derive(Debug, Deserialize)]
struct MessageBody {
    message: String,
}

/// Metadata edits for `PUT /api/music/:id`; `None` fields are not sent
#[derive(Debug, Clone, Default)]
pub struct SongEdit {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub file: Option<std::path::PathBuf>,
}

pub struct LibraryClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl LibraryClient {
    /// `base_url` is the server root, e.g. `http://localhost:5000`
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of a song's audio binary
    pub fn file_url(&self, file_url: &str) -> String {
        if file_url.starts_with("http://") || file_url.starts_with("https://") {
            file_url.to_string()
        } else {
            format!("{}{}", self.base_url, file_url)
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Download a song's audio binary
    pub async fn fetch_audio(&self, file_url: &str) -> Result<Vec<u8>> {
        let response = self.http_client.get(self.file_url(file_url)).send().await?;
        Ok(check(response).await?.bytes().await?.to_vec())
    }

    pub async fn list_songs(&self) -> Result<Vec<Song>> {
        let response = self.http_client.get(self.url("/api/music")).send().await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn get_song(&self, id: Uuid) -> Result<Song> {
        let response = self
            .http_client
            .get(self.url(&format!("/api/music/{}", id)))
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    /// Upload a new song; the form must already be valid
    pub async fn upload_song(&self, form: &UploadForm) -> Result<Song> {
        form.validate().map_err(ClientError::Validation)?;
        let file = form
            .file
            .as_deref()
            .ok_or_else(|| ClientError::Validation("Please select an audio file".to_string()))?;

        let multipart = Form::new()
            .text("title", form.title.clone())
            .text("artist", form.artist.clone())
            .text("album", form.album.clone())
            .text("genre", form.genre.clone())
            .part("audioFile", audio_part(file).await?);

        tracing::debug!(title = %form.title, file = %file.display(), "Uploading song");

        let response = self
            .http_client
            .post(self.url("/api/music"))
            .multipart(multipart)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn update_song(&self, id: Uuid, edit: &SongEdit) -> Result<Song> {
        let mut multipart = Form::new();
        for (name, value) in [
            ("title", &edit.title),
            ("artist", &edit.artist),
            ("album", &edit.album),
            ("genre", &edit.genre),
        ] {
            if let Some(value) = value {
                multipart = multipart.text(name, value.clone());
            }
        }
        if let Some(file) = &edit.file {
            multipart = multipart.part("audioFile", audio_part(file).await?);
        }

        let response = self
            .http_client
            .put(self.url(&format!("/api/music/{}", id)))
            .multipart(multipart)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    /// Returns the server's confirmation message
    pub async fn delete_song(&self, id: Uuid) -> Result<String> {
        let response = self
            .http_client
            .delete(self.url(&format!("/api/music/{}", id)))
            .send()
            .await?;
        let body: MessageBody = check(response).await?.json().await?;
        Ok(body.message)
    }

    pub async fn list_favorites(&self) -> Result<Vec<Song>> {
        let response = self.http_client.get(self.url("/api/favorite")).send().await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn add_favorite(&self, id: Uuid) -> Result<Song> {
        let response = self
            .http_client
            .post(self.url(&format!("/api/favorite/{}", id)))
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn remove_favorite(&self, id: Uuid) -> Result<String> {
        let response = self
            .http_client
            .delete(self.url(&format!("/api/favorite/{}", id)))
            .send()
            .await?;
        let body: MessageBody = check(response).await?.json().await?;
        Ok(body.message)
    }
}

/// Turn non-success responses into [`ClientError::Api`]
async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<MessageBody>(&text)
        .map(|body| body.message)
        .unwrap_or(text);

    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

async fn audio_part(path: &Path) -> Result<Part> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "audio".to_string());

    Ok(Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(media_type_for(path))?)
}

/// Media type declared for an upload, from the file extension
///
/// Unknown extensions are sent as `application/octet-stream`, which the
/// server rejects.
pub fn media_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "mp3" => "audio/mpeg",
        "ogg" | "oga" | "opus" => "audio/ogg",
        "flac" => "audio/flac",
        "wav" => "audio/wav",
        "m4a" | "mp4" => "audio/mp4",
        "aac" => "audio/aac",
        "webm" => "audio/webm",
        _ => "application/octet-stream",
    }
}
