//! Row-level writes performed by a rebuild.

use romdb_core::{Console, Game};
use rusqlite::{Connection, params};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Failed to insert {table} row for game {id}: {source}")]
    Insert {
        table: &'static str,
        id: u32,
        #[source]
        source: rusqlite::Error,
    },
}

/// `tbl_path` key that every `tbl_video` row points at.
pub const STICK_PATH_ID: i64 = 1;

/// Placeholder written to `tbl_game.hard`.
pub const DEFAULT_DIFFICULTY: i64 = 0;

/// Per-locale title tables as `(table, id column, title column)`.
const TITLE_TABLES: &[(&str, &str, &str)] = &[
    ("tbl_en", "en_id", "en_title"),
    ("tbl_ko", "ko_id", "ko_title"),
    ("tbl_match", "ID", "zh_match"),
    ("tbl_tw", "tw_id", "tw_title"),
    ("tbl_zh", "zh_id", "zh_title"),
];

// ── Clearing ────────────────────────────────────────────────────────────────

/// Delete every row from each table. Returns the number of rows removed.
pub fn clear_tables(conn: &Connection, tables: &[&str]) -> Result<usize, OperationError> {
    let mut removed = 0;
    for table in tables {
        removed += conn.execute(&format!("DELETE FROM \"{}\"", table), [])?;
    }
    Ok(removed)
}

// ── Game rows ───────────────────────────────────────────────────────────────

/// Write every row describing one game.
///
/// The game's identifier is used as the key of each title table, as the
/// `video_id`, and as every foreign key column of `tbl_game`.
/// `stick_dir` is the console folder on the stick, stored in `timer`.
pub fn insert_game(
    conn: &Connection,
    console: Console,
    game: &Game,
    stick_dir: &str,
) -> Result<(), OperationError> {
    let id = game.id.0;
    let insert_err = |table: &'static str| {
        move |source: rusqlite::Error| OperationError::Insert { table, id, source }
    };

    for &(table, id_col, title_col) in TITLE_TABLES {
        let sql = format!(
            "INSERT INTO {} ({}, {}) VALUES (?1, ?2)",
            table, id_col, title_col
        );
        conn.prepare_cached(&sql)?
            .execute(params![id, game.name])
            .map_err(insert_err(table))?;
    }

    conn.prepare_cached("INSERT INTO tbl_video (video_id, path_id) VALUES (?1, ?2)")?
        .execute(params![id, STICK_PATH_ID])
        .map_err(insert_err("tbl_video"))?;

    conn.prepare_cached(
        "INSERT INTO tbl_game (gameid, game, suffix, zh_id, en_id, ko_id, video_id,
             class_type, game_type, hard, timer)
         VALUES (?1, ?2, ?3, ?1, ?1, ?1, ?1, ?4, ?5, ?6, ?7)",
    )?
    .execute(params![
        id,
        game.name,
        game.extension,
        console.class_type(),
        console.game_type(),
        DEFAULT_DIFFICULTY,
        stick_dir,
    ])
    .map_err(insert_err("tbl_game"))?;

    Ok(())
}

// ── Aggregate rows ──────────────────────────────────────────────────────────

/// Register the stick games root under [`STICK_PATH_ID`].
pub fn insert_path_registry(conn: &Connection, stick_root: &str) -> Result<(), OperationError> {
    conn.execute(
        "INSERT INTO tbl_path (path_id, path) VALUES (?1, ?2)",
        params![STICK_PATH_ID, stick_root],
    )?;
    Ok(())
}

/// Number of rows in the primary locale table.
pub fn count_titles(conn: &Connection) -> Result<i64, OperationError> {
    let count = conn.query_row("SELECT COUNT(*) FROM tbl_en", [], |row| row.get(0))?;
    Ok(count)
}

/// Write the catalog total.
///
/// The frontend reads a single row from `tbl_total`, and existing catalogs
/// key that row by the total itself, so `ID` mirrors `total`.
pub fn insert_total(conn: &Connection, total: i64) -> Result<(), OperationError> {
    conn.execute(
        "INSERT INTO tbl_total (ID, total) VALUES (?1, ?2)",
        params![total, total],
    )?;
    Ok(())
}
