//! mlib-api library - music library HTTP API
//!
//! Song CRUD and favorites over JSON, audio uploads to local disk, static
//! serving of uploaded binaries and of the browser client.

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use mlib_common::{config::ServerConfig, FavoritesMode};
use sqlx::SqlitePool;
use std::path::Path;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod api;
pub mod config;
pub mod error;
pub mod storage;
pub mod upload;

pub use error::{ApiError, ApiResult};
pub use storage::FileStorage;

/// Room for the text parts of a multipart body on top of the file cap
const FORM_OVERHEAD_BYTES: u64 = 1024 * 1024;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Document store connection pool
    pub db: SqlitePool,
    /// Uploaded binaries
    pub storage: FileStorage,
    /// Largest accepted audio file
    pub max_upload_bytes: u64,
    pub favorites_mode: FavoritesMode,
    /// Most entries returned by `GET /api/favorite`
    pub favorites_limit: i64,
}

impl AppState {
    pub fn new(db: SqlitePool, storage: FileStorage, config: &ServerConfig) -> Self {
        Self {
            db,
            storage,
            max_upload_bytes: config.max_upload_bytes,
            favorites_mode: config.favorites_mode,
            favorites_limit: config.favorites_limit,
        }
    }
}

/// Build application router
///
/// `client_dir` holds the built browser client; when it has no `index.html`
/// the embedded fallback page is served at `/` instead.
pub fn build_router(state: AppState, client_dir: &Path) -> Router {
    use axum::routing::post;

    let body_limit = (state.max_upload_bytes + FORM_OVERHEAD_BYTES) as usize;

    let songs = Router::new()
        .route("/api/music", get(api::list_songs).post(api::create_song))
        .route(
            "/api/music/:id",
            get(api::get_song)
                .put(api::update_song)
                .delete(api::delete_song),
        )
        .layer(DefaultBodyLimit::max(body_limit));

    let favorites = Router::new()
        .route("/api/favorite", get(api::list_favorites))
        .route(
            "/api/favorite/:id",
            post(api::add_favorite).delete(api::remove_favorite),
        );

    let router = Router::new()
        .merge(songs)
        .merge(favorites)
        .merge(api::health_routes())
        .nest_service(storage::PUBLIC_PREFIX, ServeDir::new(state.storage.root()));

    let index = client_dir.join("index.html");
    let router = if index.is_file() {
        info!("Serving client bundle from {}", client_dir.display());
        router.fallback_service(ServeDir::new(client_dir).fallback(ServeFile::new(index)))
    } else {
        info!(
            "No client bundle at {}, serving built-in page",
            client_dir.display()
        );
        router.route("/", get(api::serve_index))
    };

    router
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
