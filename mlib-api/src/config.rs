//! Command-line / environment configuration for mlib-api
//!
//! Anything not given here falls back to the TOML file, then to compiled
//! defaults (see `mlib_common::config`).

use clap::Parser;
use mlib_common::config::{ConfigOverrides, DEFAULT_CONFIG_FILE};
use mlib_common::FavoritesMode;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "mlib-api")]
#[command(about = "Music library API server")]
#[command(version)]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// Document store connection string, e.g. sqlite://music.db
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Directory for uploaded audio files
    #[arg(long, env = "MLIB_UPLOAD_DIR")]
    pub upload_dir: Option<PathBuf>,

    /// Directory holding the built browser client
    #[arg(long, env = "MLIB_CLIENT_DIR")]
    pub client_dir: Option<PathBuf>,

    /// Favorites behaviour: derived (most recent songs) or persisted
    #[arg(long, env = "MLIB_FAVORITES_MODE")]
    pub favorites_mode: Option<FavoritesMode>,

    /// TOML configuration file
    #[arg(short, long, env = "MLIB_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,
}

impl Args {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            port: self.port,
            database_url: self.database_url.clone(),
            upload_dir: self.upload_dir.clone(),
            client_dir: self.client_dir.clone(),
            favorites_mode: self.favorites_mode,
        }
    }
}
