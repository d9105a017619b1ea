//! HTTP API handlers for mlib-api

pub mod favorite;
pub mod health;
pub mod music;
pub mod ui;

use serde::{Deserialize, Serialize};

pub use favorite::{add_favorite, list_favorites, remove_favorite};
pub use health::health_routes;
pub use music::{create_song, delete_song, get_song, list_songs, update_song};
pub use ui::serve_index;

/// `{"message": "..."}` confirmation body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
