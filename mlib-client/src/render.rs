//! Plain-text rendering of the model

use mlib_common::Song;
use std::fmt::Write;

use crate::state::{Model, View};

/// Render the active view, the player bar and any alert
pub fn render(model: &Model) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", tabs(model.view));

    match model.view {
        View::Library | View::Favorites => render_list(&mut out, model),
        View::Upload => render_form(&mut out, model),
    }

    if let Some(song) = &model.player.current {
        let state = if model.player.playing { "Playing" } else { "Paused" };
        let _ = writeln!(out, "\n{}: {} - {}", state, song.title, song.artist);
    }

    if let Some(alert) = &model.alert {
        let _ = writeln!(out, "\n! {}", alert);
    }

    out
}

fn tabs(view: View) -> String {
    [
        (View::Library, "Library"),
        (View::Favorites, "Favorites"),
        (View::Upload, "Upload"),
    ]
    .iter()
    .map(|(tab, label)| {
        if *tab == view {
            format!("[{}]", label)
        } else {
            format!(" {} ", label)
        }
    })
    .collect::<Vec<_>>()
    .join(" ")
}

fn render_list(out: &mut String, model: &Model) {
    if model.loading {
        let _ = writeln!(out, "Loading...");
        return;
    }

    let songs = model.visible();
    if songs.is_empty() {
        let empty = match model.view {
            View::Favorites => "No favorite songs yet",
            _ => "No songs in the library",
        };
        let _ = writeln!(out, "{}", empty);
        return;
    }

    for (index, song) in songs.iter().enumerate() {
        let marker = if model.player.is_current(song.id) {
            if model.player.playing {
                '>'
            } else {
                '='
            }
        } else {
            ' '
        };
        let star = if model.favorites.iter().any(|fav| fav.id == song.id) {
            '*'
        } else {
            ' '
        };
        let _ = writeln!(out, "{}{}{:>3}. {}", marker, star, index + 1, describe(song));
    }
}

fn describe(song: &Song) -> String {
    let mut line = format!("{} - {}", song.title, song.artist);
    if !song.album.is_empty() {
        let _ = write!(line, " [{}]", song.album);
    }
    if !song.genre.is_empty() {
        let _ = write!(line, " ({})", song.genre);
    }
    if song.duration > 0.0 {
        let total = song.duration.round() as u64;
        let _ = write!(line, " {}:{:02}", total / 60, total % 60);
    }
    line
}

fn render_form(out: &mut String, model: &Model) {
    let form = &model.form;
    let file = form
        .file
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_default();

    for (label, value) in [
        ("Title", form.title.as_str()),
        ("Artist", form.artist.as_str()),
        ("Album", form.album.as_str()),
        ("Genre", form.genre.as_str()),
        ("File", file.as_str()),
    ] {
        let _ = writeln!(out, "{:>7}: {}", label, value);
    }

    if model.loading {
        let _ = writeln!(out, "Uploading...");
    }
}
