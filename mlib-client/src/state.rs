//! Client view state
//!
//! All client state lives in one [`Model`]. User input and API results are
//! [`Msg`]s; [`update`] applies a message and returns the [`Effect`]s (API
//! calls, audio commands) the runtime must perform. Effect results come back
//! as further messages.

use mlib_common::Song;
use std::path::PathBuf;
use tracing::{error, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Library,
    Favorites,
    Upload,
}

/// The single audio element's state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Player {
    pub current: Option<Song>,
    pub playing: bool,
}

impl Player {
    pub fn is_current(&self, id: Uuid) -> bool {
        self.current.as_ref().map(|song| song.id) == Some(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Artist,
    Album,
    Genre,
}

/// Upload form contents
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadForm {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
    pub file: Option<PathBuf>,
}

impl UploadForm {
    /// Title, artist and an audio file are required
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Title is required".to_string());
        }
        if self.artist.trim().is_empty() {
            return Err("Artist is required".to_string());
        }
        if self.file.is_none() {
            return Err("Please select an audio file".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub view: View,
    pub songs: Vec<Song>,
    pub favorites: Vec<Song>,
    pub loading: bool,
    pub player: Player,
    pub form: UploadForm,
    /// Form validation message shown to the user
    pub alert: Option<String>,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            view: View::default(),
            songs: Vec::new(),
            favorites: Vec::new(),
            // Nothing fetched yet
            loading: true,
            player: Player::default(),
            form: UploadForm::default(),
            alert: None,
        }
    }
}

impl Model {
    /// Songs listed by the active view
    pub fn visible(&self) -> &[Song] {
        match self.view {
            View::Favorites => &self.favorites,
            View::Library | View::Upload => &self.songs,
        }
    }
}

/// Inputs to [`update`]
///
/// API outcomes carry errors as display strings; the model only logs them.
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Initial load (or refresh): fetch songs and favorites
    Mounted,
    SongsLoaded(Result<Vec<Song>, String>),
    FavoritesLoaded(Result<Vec<Song>, String>),
    ShowView(View),
    /// Play a song, or toggle play/pause if it is already current
    Select(Song),
    PlaybackEnded,
    AddFavorite(Song),
    FavoriteAdded(Result<Song, String>),
    RemoveFavorite(Uuid),
    FavoriteRemoved(Uuid, Result<(), String>),
    Delete(Uuid),
    Deleted(Uuid, Result<(), String>),
    EditForm(FormField, String),
    ChooseFile(PathBuf),
    Submit,
    Uploaded(Result<Song, String>),
}

/// Work requested by [`update`]
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchSongs,
    FetchFavorites,
    /// Point the audio element at a song's `fileUrl`
    Load(String),
    Play,
    Pause,
    Stop,
    AddFavorite(Uuid),
    RemoveFavorite(Uuid),
    DeleteSong(Uuid),
    Upload(UploadForm),
}

/// Apply `msg` to `model`, returning the effects to run
pub fn update(model: &mut Model, msg: Msg) -> Vec<Effect> {
    match msg {
        Msg::Mounted => {
            model.loading = true;
            vec![Effect::FetchSongs, Effect::FetchFavorites]
        }

        Msg::SongsLoaded(result) => {
            model.songs = result.unwrap_or_else(|e| {
                error!("Error fetching songs: {}", e);
                Vec::new()
            });
            model.loading = false;
            vec![]
        }

        Msg::FavoritesLoaded(result) => {
            model.favorites = result.unwrap_or_else(|e| {
                error!("Error fetching favorites: {}", e);
                Vec::new()
            });
            vec![]
        }

        Msg::ShowView(view) => {
            model.view = view;
            model.alert = None;
            vec![]
        }

        Msg::Select(song) => {
            if model.player.is_current(song.id) {
                model.player.playing = !model.player.playing;
                if model.player.playing {
                    vec![Effect::Play]
                } else {
                    vec![Effect::Pause]
                }
            } else {
                let file_url = song.file_url.clone();
                model.player = Player {
                    current: Some(song),
                    playing: true,
                };
                vec![Effect::Load(file_url), Effect::Play]
            }
        }

        Msg::PlaybackEnded => {
            model.player.playing = false;
            vec![]
        }

        Msg::AddFavorite(song) => vec![Effect::AddFavorite(song.id)],

        Msg::FavoriteAdded(Ok(song)) => {
            if !model.favorites.iter().any(|fav| fav.id == song.id) {
                model.favorites.push(song);
            }
            vec![]
        }

        Msg::FavoriteAdded(Err(e)) => {
            error!("Error adding to favorites: {}", e);
            vec![]
        }

        Msg::RemoveFavorite(id) => vec![Effect::RemoveFavorite(id)],

        Msg::FavoriteRemoved(id, Ok(())) => {
            model.favorites.retain(|fav| fav.id != id);
            vec![]
        }

        Msg::FavoriteRemoved(_, Err(e)) => {
            error!("Error removing from favorites: {}", e);
            vec![]
        }

        Msg::Delete(id) => vec![Effect::DeleteSong(id)],

        Msg::Deleted(id, Ok(())) => {
            model.songs.retain(|song| song.id != id);
            model.favorites.retain(|song| song.id != id);
            if model.player.is_current(id) {
                model.player = Player::default();
                vec![Effect::Stop]
            } else {
                vec![]
            }
        }

        Msg::Deleted(_, Err(e)) => {
            error!("Error deleting song: {}", e);
            vec![]
        }

        Msg::EditForm(field, value) => {
            let slot = match field {
                FormField::Title => &mut model.form.title,
                FormField::Artist => &mut model.form.artist,
                FormField::Album => &mut model.form.album,
                FormField::Genre => &mut model.form.genre,
            };
            *slot = value;
            vec![]
        }

        Msg::ChooseFile(path) => {
            model.form.file = Some(path);
            vec![]
        }

        Msg::Submit => match model.form.validate() {
            Ok(()) => {
                model.alert = None;
                model.loading = true;
                vec![Effect::Upload(model.form.clone())]
            }
            Err(message) => {
                warn!("Upload form incomplete: {}", message);
                model.alert = Some(message);
                vec![]
            }
        },

        Msg::Uploaded(Ok(song)) => {
            model.songs.insert(0, song);
            model.form = UploadForm::default();
            model.loading = false;
            model.view = View::Library;
            vec![]
        }

        Msg::Uploaded(Err(e)) => {
            error!("Error uploading song: {}", e);
            model.loading = false;
            vec![]
        }
    }
}
