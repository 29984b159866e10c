use thiserror::Error;

use romdb_db::SchemaError;
use romdb_lib::SettingsError;
use romdb_rebuild::RebuildError;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Settings could not be resolved
    #[error("Config error: {0}")]
    Settings(#[from] SettingsError),

    /// Database could not be opened or created
    #[error("Database error: {0}")]
    Database(#[from] SchemaError),

    /// Rebuild aborted
    #[error("Rebuild failed: {0}")]
    Rebuild(#[from] RebuildError),
}
