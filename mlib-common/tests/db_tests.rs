//! Store tests for song and favorite queries
//!
//! Each test opens a fresh SQLite file inside a temp directory.

use mlib_common::db::{favorites, init_database, songs};
use mlib_common::{Error, NewSong, SongUpdate};
use sqlx::SqlitePool;
use tempfile::TempDir;
use uuid::Uuid;

async fn setup_db() -> (TempDir, SqlitePool) {
    let dir = tempfile::tempdir().expect("Should create temp dir");
    let url = format!("sqlite://{}", dir.path().join("test.db").display());
    let pool = init_database(&url).await.expect("Should init database");
    (dir, pool)
}

fn new_song(title: &str) -> NewSong {
    NewSong {
        title: title.to_string(),
        artist: "Artist".to_string(),
        file_url: format!("/uploads/{}.mp3", title),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_init_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("twice.db").display());

    let first = init_database(&url).await;
    assert!(first.is_ok(), "First init failed: {:?}", first.err());
    let second = init_database(&url).await;
    assert!(second.is_ok(), "Second init failed: {:?}", second.err());
}

#[tokio::test]
async fn test_list_empty() {
    let (_dir, pool) = setup_db().await;
    let all = songs::list(&pool).await.unwrap();
    assert!(all.is_empty());
}

#[tokio::test]
async fn test_insert_assigns_id_and_defaults() {
    let (_dir, pool) = setup_db().await;

    let song = songs::insert(&pool, new_song("A")).await.unwrap();
    assert!(!song.id.is_nil());
    assert_eq!(song.album, "");
    assert_eq!(song.duration, 0.0);

    let fetched = songs::get(&pool, song.id).await.unwrap().expect("Song should exist");
    assert_eq!(fetched.id, song.id);
    assert_eq!(fetched.title, "A");
    assert_eq!(fetched.file_url, "/uploads/A.mp3");
}

#[tokio::test]
async fn test_insert_requires_title_and_artist() {
    let (_dir, pool) = setup_db().await;

    let mut missing_title = new_song("x");
    missing_title.title = "  ".to_string();
    assert!(matches!(
        songs::insert(&pool, missing_title).await,
        Err(Error::InvalidInput(_))
    ));

    let mut missing_artist = new_song("y");
    missing_artist.artist = String::new();
    assert!(matches!(
        songs::insert(&pool, missing_artist).await,
        Err(Error::InvalidInput(_))
    ));

    assert_eq!(songs::count(&pool).await.unwrap(), 0);
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let (_dir, pool) = setup_db().await;

    for title in ["first", "second", "third"] {
        songs::insert(&pool, new_song(title)).await.unwrap();
    }

    let titles: Vec<String> = songs::list(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.title)
        .collect();
    assert_eq!(titles, vec!["third", "second", "first"]);
}

#[tokio::test]
async fn test_recent_limits_results() {
    let (_dir, pool) = setup_db().await;

    for i in 0..12 {
        songs::insert(&pool, new_song(&format!("song{}", i))).await.unwrap();
    }

    let recent = songs::recent(&pool, 5).await.unwrap();
    assert_eq!(recent.len(), 5);
    assert_eq!(recent[0].title, "song11");
    assert_eq!(recent[4].title, "song7");
}

#[tokio::test]
async fn test_get_unknown_is_none() {
    let (_dir, pool) = setup_db().await;
    assert!(songs::get(&pool, Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_keeps_absent_fields() {
    let (_dir, pool) = setup_db().await;

    let mut original = new_song("A");
    original.album = "Album".to_string();
    original.genre = "Rock".to_string();
    let song = songs::insert(&pool, original).await.unwrap();

    let update = SongUpdate {
        title: Some("A2".to_string()),
        genre: Some(String::new()),
        ..Default::default()
    };
    let updated = songs::update(&pool, song.id, &update).await.unwrap().unwrap();

    assert_eq!(updated.title, "A2");
    assert_eq!(updated.artist, "Artist");
    assert_eq!(updated.album, "Album");
    assert_eq!(updated.genre, "");
    assert_eq!(updated.file_url, song.file_url);
    assert_eq!(updated.created_at, song.created_at);
}

#[tokio::test]
async fn test_update_rejects_empty_title() {
    let (_dir, pool) = setup_db().await;
    let song = songs::insert(&pool, new_song("A")).await.unwrap();

    let update = SongUpdate {
        title: Some(String::new()),
        ..Default::default()
    };
    assert!(matches!(
        songs::update(&pool, song.id, &update).await,
        Err(Error::InvalidInput(_))
    ));
}

#[tokio::test]
async fn test_update_unknown_is_none() {
    let (_dir, pool) = setup_db().await;
    let update = SongUpdate {
        title: Some("x".to_string()),
        ..Default::default()
    };
    assert!(songs::update(&pool, Uuid::new_v4(), &update).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete() {
    let (_dir, pool) = setup_db().await;
    let song = songs::insert(&pool, new_song("A")).await.unwrap();

    assert!(songs::delete(&pool, song.id).await.unwrap());
    assert!(!songs::delete(&pool, song.id).await.unwrap());
    assert!(songs::get(&pool, song.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_favorites_add_is_idempotent() {
    let (_dir, pool) = setup_db().await;
    let song = songs::insert(&pool, new_song("A")).await.unwrap();

    let first = favorites::add(&pool, song.id).await.unwrap();
    let second = favorites::add(&pool, song.id).await.unwrap();
    assert_eq!(first, second);

    let favs = favorites::list_songs(&pool, 5).await.unwrap();
    assert_eq!(favs.len(), 1);
    assert_eq!(favs[0].id, song.id);
}

#[tokio::test]
async fn test_favorites_order_and_remove() {
    let (_dir, pool) = setup_db().await;
    let a = songs::insert(&pool, new_song("A")).await.unwrap();
    let b = songs::insert(&pool, new_song("B")).await.unwrap();

    favorites::add(&pool, b.id).await.unwrap();
    favorites::add(&pool, a.id).await.unwrap();

    let ids: Vec<Uuid> = favorites::list_songs(&pool, 5)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(ids, vec![a.id, b.id]);

    assert!(favorites::remove(&pool, a.id).await.unwrap());
    assert!(!favorites::remove(&pool, a.id).await.unwrap());
    assert_eq!(favorites::list_songs(&pool, 5).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_favorite_of_unknown_song_fails() {
    let (_dir, pool) = setup_db().await;
    let result = favorites::add(&pool, Uuid::new_v4()).await;
    assert!(matches!(result, Err(Error::Database(_))));
}

#[tokio::test]
async fn test_deleting_song_removes_favorite() {
    let (_dir, pool) = setup_db().await;
    let song = songs::insert(&pool, new_song("A")).await.unwrap();
    favorites::add(&pool, song.id).await.unwrap();

    songs::delete(&pool, song.id).await.unwrap();
    assert!(favorites::list_songs(&pool, 5).await.unwrap().is_empty());
    assert!(!favorites::remove(&pool, song.id).await.unwrap());
}
