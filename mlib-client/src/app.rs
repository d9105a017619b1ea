//! Runs the client: feeds messages through [`update`] and performs the
//! resulting effects against the API and the audio element.

use std::collections::VecDeque;
use tracing::{debug, warn};

use crate::api::LibraryClient;
use crate::player::AudioElement;
use crate::state::{update, Effect, Model, Msg};

pub struct App<A: AudioElement> {
    model: Model,
    client: LibraryClient,
    audio: A,
}

impl<A: AudioElement> App<A> {
    pub fn new(client: LibraryClient, audio: A) -> Self {
        Self {
            model: Model::default(),
            client,
            audio,
        }
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// Initial load of songs and favorites
    pub async fn mount(&mut self) {
        self.dispatch(Msg::Mounted).await;
    }

    /// Apply `msg` and every message produced by its effects
    pub async fn dispatch(&mut self, msg: Msg) {
        let mut queue = VecDeque::from([msg]);
        while let Some(msg) = queue.pop_front() {
            let effects = update(&mut self.model, msg);
            queue.extend(self.run_effects(effects).await);
        }
    }

    /// Report the end of playback to the model, if it happened
    pub async fn poll_ended(&mut self) -> bool {
        if self.model.player.playing && self.audio.has_ended() {
            self.dispatch(Msg::PlaybackEnded).await;
            true
        } else {
            false
        }
    }

    async fn run_effects(&mut self, effects: Vec<Effect>) -> Vec<Msg> {
        let mut replies = Vec::new();
        let mut fetch_songs = false;
        let mut fetch_favorites = false;

        for effect in effects {
            match effect {
                Effect::FetchSongs => fetch_songs = true,
                Effect::FetchFavorites => fetch_favorites = true,
                other => replies.extend(self.run_effect(other).await),
            }
        }

        if fetch_songs || fetch_favorites {
            let client = &self.client;
            let (songs, favorites) = tokio::join!(
                async {
                    if fetch_songs {
                        Some(client.list_songs().await)
                    } else {
                        None
                    }
                },
                async {
                    if fetch_favorites {
                        Some(client.list_favorites().await)
                    } else {
                        None
                    }
                },
            );
            if let Some(songs) = songs {
                replies.push(Msg::SongsLoaded(songs.map_err(|e| e.to_string())));
            }
            if let Some(favorites) = favorites {
                replies.push(Msg::FavoritesLoaded(favorites.map_err(|e| e.to_string())));
            }
        }

        replies
    }

    async fn run_effect(&mut self, effect: Effect) -> Option<Msg> {
        debug!(?effect, "Running effect");
        match effect {
            Effect::FetchSongs => Some(Msg::SongsLoaded(
                self.client.list_songs().await.map_err(|e| e.to_string()),
            )),
            Effect::FetchFavorites => Some(Msg::FavoritesLoaded(
                self.client.list_favorites().await.map_err(|e| e.to_string()),
            )),
            Effect::Load(file_url) => {
                let loaded = match self.client.fetch_audio(&file_url).await {
                    Ok(bytes) => self.audio.load(&file_url, bytes),
                    Err(e) => Err(std::io::Error::new(std::io::ErrorKind::Other, e)),
                };
                if loaded.is_err() {
                    // The previous song must not resume on the following Play
                    let _ = self.audio.stop();
                }
                audio_result(loaded, "load")
            }
            Effect::Play => {
                audio_result(self.audio.play(), "play")
            }
            Effect::Pause => {
                audio_result(self.audio.pause(), "pause")
            }
            Effect::Stop => {
                audio_result(self.audio.stop(), "stop")
            }
            Effect::AddFavorite(id) => Some(Msg::FavoriteAdded(
                self.client.add_favorite(id).await.map_err(|e| e.to_string()),
            )),
            Effect::RemoveFavorite(id) => Some(Msg::FavoriteRemoved(
                id,
                self.client
                    .remove_favorite(id)
                    .await
                    .map(|_| ())
                    .map_err(|e| e.to_string()),
            )),
            Effect::DeleteSong(id) => Some(Msg::Deleted(
                id,
                self.client
                    .delete_song(id)
                    .await
                    .map(|_| ())
                    .map_err(|e| e.to_string()),
            )),
            Effect::Upload(form) => Some(Msg::Uploaded(
                self.client.upload_song(&form).await.map_err(|e| e.to_string()),
            )),
        }
    }
}

/// A failed audio command leaves nothing playing
fn audio_result(result: std::io::Result<()>, action: &str) -> Option<Msg> {
    match result {
        Ok(()) => None,
        Err(e) => {
            warn!("Audio {} failed: {}", action, e);
            Some(Msg::PlaybackEnded)
        }
    }
}
