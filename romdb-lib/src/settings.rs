//! Path and database settings for a rebuild.
//!
//! Each value is resolved through a priority chain:
//!
//! 1. CLI override
//! 2. Process environment (a `.env` file in the working directory is
//!    loaded first and never overrides variables that are already set)
//! 3. `[paths]` table in `~/.config/romdb/settings.toml`

use std::path::{Path, PathBuf};

use romdb_core::Console;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Missing setting '{}'. Set {} or add {} to [paths] in {}", .field.key(), .field.env_var(), .field.key(), settings_path().display())]
    Missing { field: Field },
    #[error("Cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid settings file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// A configurable value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    GamesPath,
    StickGamesPath,
    DbPath,
    DbBackupPath,
    DbCommonName,
    DbGamesName,
}

const ALL_FIELDS: &[Field] = &[
    Field::GamesPath,
    Field::StickGamesPath,
    Field::DbPath,
    Field::DbBackupPath,
    Field::DbCommonName,
    Field::DbGamesName,
];

impl Field {
    pub fn env_var(&self) -> &'static str {
        match self {
            Self::GamesPath => "GAMES_PATH",
            Self::StickGamesPath => "STICK_GAMES_PATH",
            Self::DbPath => "DB_PATH",
            Self::DbBackupPath => "DB_BACKUP_PATH",
            Self::DbCommonName => "DB_COMMON_NAME",
            Self::DbGamesName => "DB_GAMES_NAME",
        }
    }

    /// Key inside the `[paths]` table of the settings file.
    pub fn key(&self) -> &'static str {
        match self {
            Self::GamesPath => "games_path",
            Self::StickGamesPath => "stick_games_path",
            Self::DbPath => "db_path",
            Self::DbBackupPath => "db_backup_path",
            Self::DbCommonName => "db_common_name",
            Self::DbGamesName => "db_games_name",
        }
    }

    pub fn all() -> &'static [Field] {
        ALL_FIELDS
    }
}

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    Cli,
    Env(&'static str),
    File,
    Missing,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "command line"),
            Self::Env(var) => write!(f, "env {}", var),
            Self::File => write!(f, "settings file"),
            Self::Missing => write!(f, "not set"),
        }
    }
}

/// Values supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub games_path: Option<PathBuf>,
    pub stick_games_path: Option<PathBuf>,
    pub db_path: Option<PathBuf>,
    pub db_backup_path: Option<PathBuf>,
    pub db_common_name: Option<String>,
    pub db_games_name: Option<String>,
}

impl SettingsOverrides {
    fn get(&self, field: Field) -> Option<String> {
        let path = |p: &Option<PathBuf>| p.as_ref().map(|p| p.to_string_lossy().into_owned());
        match field {
            Field::GamesPath => path(&self.games_path),
            Field::StickGamesPath => path(&self.stick_games_path),
            Field::DbPath => path(&self.db_path),
            Field::DbBackupPath => path(&self.db_backup_path),
            Field::DbCommonName => self.db_common_name.clone(),
            Field::DbGamesName => self.db_games_name.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    paths: Option<PathsTable>,
}

/// The `[paths]` table of `settings.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsTable {
    pub games_path: Option<String>,
    pub stick_games_path: Option<String>,
    pub db_path: Option<String>,
    pub db_backup_path: Option<String>,
    pub db_common_name: Option<String>,
    pub db_games_name: Option<String>,
}

impl PathsTable {
    fn get(&self, field: Field) -> Option<String> {
        match field {
            Field::GamesPath => self.games_path.clone(),
            Field::StickGamesPath => self.stick_games_path.clone(),
            Field::DbPath => self.db_path.clone(),
            Field::DbBackupPath => self.db_backup_path.clone(),
            Field::DbCommonName => self.db_common_name.clone(),
            Field::DbGamesName => self.db_games_name.clone(),
        }
    }
}

/// One resolved value, for display.
#[derive(Debug, Clone)]
pub struct SettingReport {
    pub field: Field,
    pub source: ValueSource,
    pub value: Option<String>,
}

/// Fully resolved settings for a rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Root scanned and renamed, one subdirectory per console.
    pub games_path: PathBuf,
    /// Root recorded in the database as the runtime read location.
    pub stick_games_path: PathBuf,
    pub db_path: PathBuf,
    pub db_backup_path: PathBuf,
    pub db_common_name: String,
    pub db_games_name: String,
}

/// Canonical path to the settings file: `~/.config/romdb/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("romdb").join("settings.toml")
}

/// Read the `[paths]` table from a settings file.
///
/// A missing file is not an error and yields `None`.
pub fn load_paths_table(path: &Path) -> Result<Option<PathsTable>, SettingsError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(SettingsError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    let file: SettingsFile = toml::from_str(&contents).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(file.paths)
}

fn resolve_field(
    field: Field,
    overrides: &SettingsOverrides,
    env: &dyn Fn(&str) -> Option<String>,
    file: Option<&PathsTable>,
) -> (Option<String>, ValueSource) {
    let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

    if let Some(v) = non_empty(overrides.get(field)) {
        return (Some(v), ValueSource::Cli);
    }
    if let Some(v) = non_empty(env(field.env_var())) {
        return (Some(v), ValueSource::Env(field.env_var()));
    }
    if let Some(v) = non_empty(file.and_then(|f| f.get(field))) {
        return (Some(v), ValueSource::File);
    }
    (None, ValueSource::Missing)
}

/// Report every field with its resolved value and source.
pub fn describe(
    overrides: &SettingsOverrides,
    env: &dyn Fn(&str) -> Option<String>,
    file: Option<&PathsTable>,
) -> Vec<SettingReport> {
    Field::all()
        .iter()
        .map(|&field| {
            let (value, source) = resolve_field(field, overrides, env, file);
            SettingReport {
                field,
                source,
                value,
            }
        })
        .collect()
}

/// Load `.env` from the working directory into the process environment.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => log::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => log::warn!("Ignoring unreadable .env file: {}", e),
    }
}

/// Environment lookup backed by the process environment.
pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

impl Settings {
    /// Resolve settings from CLI overrides, the environment and the
    /// settings file at [`settings_path`].
    pub fn load(overrides: &SettingsOverrides) -> Result<Self, SettingsError> {
        load_dotenv();
        let file = load_paths_table(&settings_path())?;
        Self::resolve(overrides, &process_env, file.as_ref())
    }

    /// Resolve settings from explicit sources.
    pub fn resolve(
        overrides: &SettingsOverrides,
        env: &dyn Fn(&str) -> Option<String>,
        file: Option<&PathsTable>,
    ) -> Result<Self, SettingsError> {
        let get = |field: Field| {
            resolve_field(field, overrides, env, file)
                .0
                .ok_or(SettingsError::Missing { field })
        };

        Ok(Self {
            games_path: PathBuf::from(get(Field::GamesPath)?),
            stick_games_path: PathBuf::from(get(Field::StickGamesPath)?),
            db_path: PathBuf::from(get(Field::DbPath)?),
            db_backup_path: PathBuf::from(get(Field::DbBackupPath)?),
            db_common_name: get(Field::DbCommonName)?,
            db_games_name: get(Field::DbGamesName)?,
        })
    }

    pub fn common_db_path(&self) -> PathBuf {
        self.db_path.join(&self.db_common_name)
    }

    pub fn games_db_path(&self) -> PathBuf {
        self.db_path.join(&self.db_games_name)
    }

    pub fn common_backup_path(&self) -> PathBuf {
        self.db_backup_path.join(&self.db_common_name)
    }

    pub fn games_backup_path(&self) -> PathBuf {
        self.db_backup_path.join(&self.db_games_name)
    }

    /// Folder scanned and renamed for `console`.
    pub fn console_dir(&self, console: Console) -> PathBuf {
        self.games_path.join(console.scan_dir())
    }

    /// Folder the frontend reads `console` games from at runtime.
    pub fn stick_console_dir(&self, console: Console) -> PathBuf {
        self.stick_games_path.join(console.scan_dir())
    }
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
