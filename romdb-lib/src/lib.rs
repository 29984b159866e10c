//! Filesystem side of a catalog rebuild: settings, database backups,
//! filename normalization and game discovery.

pub mod backup;
pub mod normalize;
pub mod scanner;
pub mod settings;

pub use backup::{BackupEntry, BackupError, BackupSet};
pub use normalize::{
    NormalizeError, NormalizePlan, NormalizeSummary, RenameAction, SkipReason, SkippedFile,
    execute_normalization, normalize_filename, normalize_stem, plan_normalization,
};
pub use scanner::{discover_games, list_regular_files};
pub use settings::{Field, Settings, SettingsError, SettingsOverrides, ValueSource};
