//! mlib-client library - terminal client for the music library API
//!
//! - [`api`]: typed HTTP client for `/api/music` and `/api/favorite`
//! - [`state`]: the single view-state model and its `update` function
//! - [`app`]: runs effects produced by `update` against the API and player
//! - [`player`]: the audio element abstraction
//! - [`render`] / [`shell`]: text rendering and command parsing

pub mod api;
pub mod app;
pub mod error;
pub mod player;
pub mod render;
pub mod shell;
pub mod state;

pub use api::LibraryClient;
pub use app::App;
pub use error::{ClientError, Result};
pub use state::{update, Effect, Model, Msg, View};
