//! Line commands for the terminal client

use std::path::PathBuf;

use crate::state::{FormField, Model, Msg, View};

pub const HELP: &str = "\
Commands:
  library | list | l     show all songs
  favorites | f          show favorites
  upload | u             show the upload form
  play N                 play/pause song N of the current list
  fav N / unfav N        add or remove song N from favorites
  delete N               delete song N
  set FIELD VALUE        fill the upload form (title, artist, album, genre)
  file PATH              choose the audio file to upload
  submit                 upload the form
  refresh                reload songs and favorites
  help                   show this text
  quit | q               exit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Show(View),
    Play(usize),
    Favorite(usize),
    Unfavorite(usize),
    Delete(usize),
    Set(FormField, String),
    File(PathBuf),
    Submit,
    Refresh,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "library" | "list" | "l" => Command::Show(View::Library),
        "favorites" | "f" => Command::Show(View::Favorites),
        "upload" | "u" => Command::Show(View::Upload),
        "play" | "p" => Command::Play(position(word, rest)?),
        "fav" => Command::Favorite(position(word, rest)?),
        "unfav" => Command::Unfavorite(position(word, rest)?),
        "delete" | "rm" => Command::Delete(position(word, rest)?),
        "set" => {
            let (field, value) = rest
                .split_once(char::is_whitespace)
                .map(|(field, value)| (field, value.trim()))
                .unwrap_or((rest, ""));
            let field = match field.to_ascii_lowercase().as_str() {
                "title" => FormField::Title,
                "artist" => FormField::Artist,
                "album" => FormField::Album,
                "genre" => FormField::Genre,
                other => return Err(format!("Unknown form field '{}'", other)),
            };
            Command::Set(field, value.to_string())
        }
        "file" => {
            if rest.is_empty() {
                return Err("file: missing path".to_string());
            }
            Command::File(PathBuf::from(rest))
        }
        "submit" => Command::Submit,
        "refresh" | "r" => Command::Refresh,
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        "" => return Err("Empty command".to_string()),
        other => return Err(format!("Unknown command '{}' (try 'help')", other)),
    };
    Ok(command)
}

/// 1-based list position argument
fn position(word: &str, rest: &str) -> Result<usize, String> {
    match rest.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("{}: expected a song number", word)),
    }
}

/// Translate a command into a message for the model
///
/// `Help` and `Quit` are handled by the caller and yield `None`.
pub fn to_msg(model: &Model, command: Command) -> Result<Option<Msg>, String> {
    let msg = match command {
        Command::Show(view) => Msg::ShowView(view),
        Command::Play(n) => Msg::Select(song_at(model, n)?.clone()),
        Command::Favorite(n) => Msg::AddFavorite(song_at(model, n)?.clone()),
        Command::Unfavorite(n) => Msg::RemoveFavorite(song_at(model, n)?.id),
        Command::Delete(n) => Msg::Delete(song_at(model, n)?.id),
        Command::Set(field, value) => Msg::EditForm(field, value),
        Command::File(path) => Msg::ChooseFile(path),
        Command::Submit => Msg::Submit,
        Command::Refresh => Msg::Mounted,
        Command::Help | Command::Quit => return Ok(None),
    };
    Ok(Some(msg))
}

fn song_at(model: &Model, n: usize) -> Result<&mlib_common::Song, String> {
    n.checked_sub(1)
        .and_then(|index| model.visible().get(index))
        .ok_or_else(|| format!("No song number {} in this list", n))
}
