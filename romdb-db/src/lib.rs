//! SQLite persistence for the frontend's games and common databases.
//!
//! Provides table verification, clearing, and the row writes a rebuild
//! performs, backed by SQLite (via rusqlite with bundled feature).

pub mod operations;
pub mod schema;

pub use operations::{
    DEFAULT_DIFFICULTY, OperationError, STICK_PATH_ID, clear_tables, count_titles, insert_game,
    insert_path_registry, insert_total,
};
pub use schema::{
    COMMON_TABLES, CatalogDb, GAMES_TABLES, SchemaError, create_database, create_schema,
    open_database, open_memory, verify_tables,
};
