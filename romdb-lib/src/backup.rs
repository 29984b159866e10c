//! Pre-rebuild snapshots of the two database files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::settings::Settings;

#[derive(Debug, Error)]
pub enum BackupError {
    #[error("Database file not found: {}", .0.display())]
    MissingSource(PathBuf),
    #[error("Backup destination {} is the database file itself", .0.display())]
    SameFile(PathBuf),
    #[error("Failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Backup {} is incomplete: {copied} of {expected} bytes", path.display())]
    Incomplete {
        path: PathBuf,
        copied: u64,
        expected: u64,
    },
}

/// One database file and where its snapshot goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupEntry {
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// The database files to snapshot before a rebuild.
#[derive(Debug, Clone)]
pub struct BackupSet {
    pub backup_dir: PathBuf,
    pub entries: Vec<BackupEntry>,
}

impl BackupSet {
    /// Common and games databases, backed up into the configured backup directory.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            backup_dir: settings.db_backup_path.clone(),
            entries: vec![
                BackupEntry {
                    source: settings.common_db_path(),
                    destination: settings.common_backup_path(),
                },
                BackupEntry {
                    source: settings.games_db_path(),
                    destination: settings.games_backup_path(),
                },
            ],
        }
    }

    /// Replace any previous backups with fresh copies of every source.
    ///
    /// All sources are checked before anything is deleted, so a missing
    /// database leaves old backups in place. Returns the bytes copied.
    pub fn run(&self) -> Result<u64, BackupError> {
        for entry in &self.entries {
            if !entry.source.is_file() {
                return Err(BackupError::MissingSource(entry.source.clone()));
            }
        }

        fs::create_dir_all(&self.backup_dir).map_err(|source| BackupError::Io {
            action: "create backup directory",
            path: self.backup_dir.clone(),
            source,
        })?;

        for entry in &self.entries {
            if same_file(&entry.source, &entry.destination) {
                return Err(BackupError::SameFile(entry.destination.clone()));
            }
        }

        let mut total = 0;
        for entry in &self.entries {
            total += backup_one(entry)?;
            log::debug!(
                "Backed up {} -> {}",
                entry.source.display(),
                entry.destination.display()
            );
        }
        Ok(total)
    }
}

fn backup_one(entry: &BackupEntry) -> Result<u64, BackupError> {
    match fs::remove_file(&entry.destination) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(BackupError::Io {
                action: "remove old backup",
                path: entry.destination.clone(),
                source,
            });
        }
    }

    let expected = fs::metadata(&entry.source)
        .map_err(|source| BackupError::Io {
            action: "read",
            path: entry.source.clone(),
            source,
        })?
        .len();
    let copied = fs::copy(&entry.source, &entry.destination).map_err(|source| BackupError::Io {
        action: "copy",
        path: entry.source.clone(),
        source,
    })?;

    if copied != expected {
        return Err(BackupError::Incomplete {
            path: entry.destination.clone(),
            copied,
            expected,
        });
    }
    Ok(copied)
}

/// True when both paths resolve to the same file on disk.
fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
#[path = "tests/backup_tests.rs"]
mod tests;
