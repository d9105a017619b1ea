//! Configuration resolution tests
//!
//! Covers priority order (overrides > TOML > defaults), graceful handling of
//! a missing TOML file, and validation.

use mlib_common::config::{
    load_toml_config, ConfigOverrides, ServerConfig, DEFAULT_FAVORITES_LIMIT,
    DEFAULT_MAX_UPLOAD_BYTES,
};
use mlib_common::{Error, FavoritesMode};
use std::path::PathBuf;

fn write_toml(dir: &tempfile::TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("mlib.toml");
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_defaults() {
    let config = ServerConfig::resolve(ConfigOverrides::default(), None).unwrap();
    assert_eq!(config.port, 5000);
    assert_eq!(config.upload_dir, PathBuf::from("uploads"));
    assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
    assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
    assert_eq!(config.favorites_mode, FavoritesMode::Derived);
    assert_eq!(config.favorites_limit, DEFAULT_FAVORITES_LIMIT);
    assert_eq!(config, ServerConfig::default());
}

#[test]
fn test_missing_toml_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_toml_config(&dir.path().join("absent.toml")).unwrap();
    assert!(result.is_none());
}

#[test]
fn test_partial_toml_uses_defaults_for_rest() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_toml(
        &dir,
        r#"
        port = 8080

        [favorites]
        mode = "persisted"
        "#,
    );

    let file = load_toml_config(&path).unwrap().expect("File should load");
    let config = ServerConfig::resolve(ConfigOverrides::default(), Some(file)).unwrap();

    assert_eq!(config.port, 8080);
    assert_eq!(config.favorites_mode, FavoritesMode::Persisted);
    assert_eq!(config.favorites_limit, DEFAULT_FAVORITES_LIMIT);
    assert_eq!(config.database_url, "sqlite://music.db");
    assert_eq!(config.log_level, "info");
}

#[test]
fn test_overrides_beat_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_toml(
        &dir,
        r#"
        port = 8080
        database_url = "sqlite://from-file.db"
        upload_dir = "/srv/file-uploads"
        "#,
    );
    let file = load_toml_config(&path).unwrap();

    let overrides = ConfigOverrides {
        port: Some(9000),
        database_url: Some("sqlite://from-env.db".to_string()),
        ..Default::default()
    };
    let config = ServerConfig::resolve(overrides, file).unwrap();

    assert_eq!(config.port, 9000);
    assert_eq!(config.database_url, "sqlite://from-env.db");
    assert_eq!(config.upload_dir, PathBuf::from("/srv/file-uploads"));
}

#[test]
fn test_malformed_toml_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_toml(&dir, "port = \"not a number\"");
    assert!(matches!(load_toml_config(&path), Err(Error::Config(_))));
}

#[test]
fn test_validation_rejects_bad_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_toml(
        &dir,
        r#"
        [favorites]
        limit = 0
        "#,
    );
    let file = load_toml_config(&path).unwrap();
    assert!(matches!(
        ServerConfig::resolve(ConfigOverrides::default(), file),
        Err(Error::Config(_))
    ));

    let overrides = ConfigOverrides {
        database_url: Some("   ".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        ServerConfig::resolve(overrides, None),
        Err(Error::Config(_))
    ));
}

#[test]
fn test_favorites_mode_parse() {
    assert_eq!("derived".parse::<FavoritesMode>().unwrap(), FavoritesMode::Derived);
    assert_eq!("Persisted".parse::<FavoritesMode>().unwrap(), FavoritesMode::Persisted);
    assert!("both".parse::<FavoritesMode>().is_err());
    assert_eq!(FavoritesMode::Persisted.to_string(), "persisted");
}
