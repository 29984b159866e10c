//! Directory listing and game discovery for console folders.

use std::ffi::OsString;
use std::path::Path;

use romdb_core::{Console, Game, IdSequence, split_extension};

/// List the regular files directly inside `dir`, sorted by name.
///
/// Subdirectories are ignored; symlinks count when they resolve to a file.
pub fn list_regular_files(dir: &Path) -> std::io::Result<Vec<OsString>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.path().is_file() {
            names.push(entry.file_name());
        }
    }
    names.sort();
    Ok(names)
}

/// Build the game list for one console from its normalized filenames.
///
/// Filenames are sorted first, so identifier assignment
/// does not depend on directory enumeration order. Each name is split at
/// its rightmost dot; names whose extension the console does not accept
/// are ignored and consume no identifier.
pub fn discover_games(console: Console, filenames: &[String], ids: &mut IdSequence) -> Vec<Game> {
    let mut sorted: Vec<&str> = filenames.iter().map(String::as_str).collect();
    sorted.sort_unstable();

    let mut games = Vec::new();
    for filename in sorted {
        let Some((stem, ext)) = split_extension(filename) else {
            continue;
        };
        let extension = format!(".{}", ext);
        if !console.accepts_extension(&extension) {
            log::trace!("{}: ignoring {}", console.short_name(), filename);
            continue;
        }
        games.push(Game {
            id: ids.next_id(),
            name: stem.to_string(),
            filename: filename.to_string(),
            extension,
        });
    }
    games
}

#[cfg(test)]
#[path = "tests/scanner_tests.rs"]
mod tests;
