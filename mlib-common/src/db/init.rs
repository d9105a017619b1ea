//! Database initialization
//!
//! Opens (creating if needed) the store named by the connection string and
//! creates the schema. Safe to call on every startup.

use crate::{Error, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| Error::Config(format!("Invalid database URL '{}': {}", database_url, e)))?
        .create_if_missing(true)
        // Pragmas set here apply to every pooled connection, not just the first
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_millis(5000));

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    info!("Opened document store: {}", database_url);

    create_songs_table(&pool).await?;
    create_favorites_table(&pool).await?;

    Ok(pool)
}

async fn create_songs_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS songs (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            artist TEXT NOT NULL,
            album TEXT NOT NULL DEFAULT '',
            genre TEXT NOT NULL DEFAULT '',
            duration REAL NOT NULL DEFAULT 0,
            file_url TEXT NOT NULL,
            cover_url TEXT NOT NULL DEFAULT '',
            created_at TIMESTAMP NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_songs_created_at ON songs(created_at)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_favorites_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS favorites (
            song_id TEXT PRIMARY KEY REFERENCES songs(id) ON DELETE CASCADE,
            added_at TIMESTAMP NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
