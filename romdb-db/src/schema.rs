//! Table layout of the frontend's two SQLite files and connection helpers.
//!
//! The rebuild never creates or alters tables in an existing database.
//! `create_database` only exists to provision empty files for fresh
//! installs and tests.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Database file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Database {} already exists", .0.display())]
    AlreadyExists(PathBuf),
    #[error("{database} database is missing table '{table}'")]
    MissingTable {
        database: CatalogDb,
        table: &'static str,
    },
}

/// Tables cleared and repopulated in the games database.
pub const GAMES_TABLES: &[&str] = &[
    "tbl_en",
    "tbl_game",
    "tbl_ko",
    "tbl_match",
    "tbl_path",
    "tbl_total",
    "tbl_tw",
    "tbl_video",
    "tbl_zh",
];

/// Tables cleared in the common database.
pub const COMMON_TABLES: &[&str] = &["GameInfo", "History"];

/// Which of the two database files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogDb {
    Games,
    Common,
}

impl CatalogDb {
    pub fn tables(&self) -> &'static [&'static str] {
        match self {
            Self::Games => GAMES_TABLES,
            Self::Common => COMMON_TABLES,
        }
    }

    fn schema_sql(&self) -> &'static str {
        match self {
            Self::Games => GAMES_SCHEMA_SQL,
            Self::Common => COMMON_SCHEMA_SQL,
        }
    }
}

impl std::fmt::Display for CatalogDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Games => write!(f, "games"),
            Self::Common => write!(f, "common"),
        }
    }
}

/// Open an existing database file for writing. Never creates the file.
pub fn open_database(path: &Path) -> Result<Connection, SchemaError> {
    if !path.is_file() {
        return Err(SchemaError::NotFound(path.to_path_buf()));
    }
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    Ok(conn)
}

/// Check that every table `db` is expected to hold exists.
pub fn verify_tables(conn: &Connection, db: CatalogDb) -> Result<(), SchemaError> {
    let mut stmt =
        conn.prepare("SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1)")?;
    for &table in db.tables() {
        let exists: bool = stmt.query_row([table], |row| row.get(0))?;
        if !exists {
            return Err(SchemaError::MissingTable {
                database: db,
                table,
            });
        }
    }
    Ok(())
}

/// Create a new database file holding the expected tables.
pub fn create_database(path: &Path, db: CatalogDb) -> Result<Connection, SchemaError> {
    if path.exists() {
        return Err(SchemaError::AlreadyExists(path.to_path_buf()));
    }
    let conn = Connection::open(path)?;
    create_schema(&conn, db)?;
    Ok(conn)
}

/// Create the expected tables if they don't exist. Idempotent.
pub fn create_schema(conn: &Connection, db: CatalogDb) -> Result<(), SchemaError> {
    conn.execute_batch(db.schema_sql())?;
    Ok(())
}

/// Open an in-memory database with the expected tables. Useful for testing.
pub fn open_memory(db: CatalogDb) -> Result<Connection, SchemaError> {
    let conn = Connection::open_in_memory()?;
    create_schema(&conn, db)?;
    Ok(conn)
}

const GAMES_SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS tbl_en (
    en_id INTEGER PRIMARY KEY,
    en_title TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS tbl_ko (
    ko_id INTEGER PRIMARY KEY,
    ko_title TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS tbl_tw (
    tw_id INTEGER PRIMARY KEY,
    tw_title TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS tbl_zh (
    zh_id INTEGER PRIMARY KEY,
    zh_title TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS tbl_match (
    ID INTEGER PRIMARY KEY,
    zh_match TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS tbl_path (
    path_id INTEGER PRIMARY KEY,
    path TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS tbl_video (
    video_id INTEGER PRIMARY KEY,
    path_id INTEGER NOT NULL
);
CREATE TABLE IF NOT EXISTS tbl_game (
    gameid INTEGER PRIMARY KEY,
    game TEXT NOT NULL,
    suffix TEXT NOT NULL,
    zh_id INTEGER,
    en_id INTEGER,
    ko_id INTEGER,
    video_id INTEGER,
    class_type INTEGER NOT NULL,
    game_type INTEGER NOT NULL,
    hard INTEGER NOT NULL DEFAULT 0,
    timer TEXT
);
CREATE TABLE IF NOT EXISTS tbl_total (
    ID INTEGER PRIMARY KEY,
    total INTEGER NOT NULL
);
"#;

const COMMON_SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS GameInfo (
    id INTEGER PRIMARY KEY,
    gameid INTEGER NOT NULL,
    info TEXT
);
CREATE TABLE IF NOT EXISTS History (
    id INTEGER PRIMARY KEY,
    gameid INTEGER NOT NULL,
    played_at TEXT
);
"#;
