//! Configuration loading
//!
//! Settings are resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! Tiers 1 and 2 are parsed by the binaries (clap with `env`) and handed in
//! as [`ConfigOverrides`]; this module merges them with the TOML file.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default TOML file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "mlib.toml";

/// Upload size cap: 10 MiB
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Number of songs returned by the favorites listing
pub const DEFAULT_FAVORITES_LIMIT: i64 = 5;

/// How `/api/favorite` behaves
///
/// `Derived` reproduces the historical behaviour: favorites are simply the
/// most recently created songs and add/remove only confirm the song exists.
/// `Persisted` stores an explicit favorite relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FavoritesMode {
    #[default]
    Derived,
    Persisted,
}

impl FromStr for FavoritesMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "derived" => Ok(FavoritesMode::Derived),
            "persisted" => Ok(FavoritesMode::Persisted),
            other => Err(Error::Config(format!(
                "Unknown favorites mode '{}' (expected 'derived' or 'persisted')",
                other
            ))),
        }
    }
}

impl fmt::Display for FavoritesMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FavoritesMode::Derived => write!(f, "derived"),
            FavoritesMode::Persisted => write!(f, "persisted"),
        }
    }
}

/// Configuration file contents (`mlib.toml`)
///
/// Every field is optional in the file; missing ones fall back to the
/// compiled defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    /// sqlx connection string for the document store
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Directory holding uploaded binaries
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    /// Directory holding the built browser client
    #[serde(default = "default_client_dir")]
    pub client_dir: PathBuf,

    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,

    #[serde(default)]
    pub favorites: FavoritesConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// `[favorites]` table
#[derive(Debug, Clone, Deserialize)]
pub struct FavoritesConfig {
    #[serde(default)]
    pub mode: FavoritesMode,

    #[serde(default = "default_favorites_limit")]
    pub limit: i64,
}

/// `[logging]` table
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_port() -> u16 {
    5000
}

fn default_database_url() -> String {
    "sqlite://music.db".to_string()
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_client_dir() -> PathBuf {
    PathBuf::from("client/build")
}

fn default_max_upload_bytes() -> u64 {
    DEFAULT_MAX_UPLOAD_BYTES
}

fn default_favorites_limit() -> i64 {
    DEFAULT_FAVORITES_LIMIT
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            database_url: default_database_url(),
            upload_dir: default_upload_dir(),
            client_dir: default_client_dir(),
            max_upload_bytes: default_max_upload_bytes(),
            favorites: FavoritesConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for FavoritesConfig {
    fn default() -> Self {
        Self {
            mode: FavoritesMode::default(),
            limit: default_favorites_limit(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Load the TOML config file
///
/// A missing file is not an error: `None` is returned so the caller falls
/// back to defaults. A file that exists but doesn't parse is an error.
///
/// Called before logging is initialized, so it doesn't log; callers report
/// the outcome once the subscriber is up.
pub fn load_toml_config(path: &Path) -> Result<Option<TomlConfig>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;

    Ok(Some(config))
}

/// Values taken from the command line or environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub port: Option<u16>,
    pub database_url: Option<String>,
    pub upload_dir: Option<PathBuf>,
    pub client_dir: Option<PathBuf>,
    pub favorites_mode: Option<FavoritesMode>,
}

/// Fully resolved API server configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
    pub database_url: String,
    pub upload_dir: PathBuf,
    pub client_dir: PathBuf,
    pub max_upload_bytes: u64,
    pub favorites_mode: FavoritesMode,
    pub favorites_limit: i64,
    pub log_level: String,
}

impl ServerConfig {
    /// Merge overrides over the TOML file (or defaults) and validate
    pub fn resolve(overrides: ConfigOverrides, file: Option<TomlConfig>) -> Result<Self> {
        let config = Self::merge(overrides, file.unwrap_or_default());
        config.validate()?;
        Ok(config)
    }

    fn merge(overrides: ConfigOverrides, file: TomlConfig) -> Self {
        Self {
            port: overrides.port.unwrap_or(file.port),
            database_url: overrides.database_url.unwrap_or(file.database_url),
            upload_dir: overrides.upload_dir.unwrap_or(file.upload_dir),
            client_dir: overrides.client_dir.unwrap_or(file.client_dir),
            max_upload_bytes: file.max_upload_bytes,
            favorites_mode: overrides.favorites_mode.unwrap_or(file.favorites.mode),
            favorites_limit: file.favorites.limit,
            log_level: file.logging.level,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.database_url.trim().is_empty() {
            return Err(Error::Config("database_url must not be empty".to_string()));
        }
        if self.max_upload_bytes == 0 {
            return Err(Error::Config("max_upload_bytes must be positive".to_string()));
        }
        if self.favorites_limit <= 0 {
            return Err(Error::Config("favorites.limit must be positive".to_string()));
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::merge(ConfigOverrides::default(), TomlConfig::default())
    }
}
