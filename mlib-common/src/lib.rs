//! # Music Library Common Library
//!
//! Shared code for the music library API server and client:
//! - Song / Favorite data model
//! - Document store access (SQLite via sqlx)
//! - Configuration loading
//! - Error type and small utilities

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod time;
pub mod uuid_utils;

pub use error::{Error, Result};
pub use config::FavoritesMode;
pub use models::{Favorite, NewSong, Song, SongUpdate};
