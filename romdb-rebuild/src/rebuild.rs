//! Full catalog rebuild: preflight, backup, clear, repopulate.
//!
//! Order of operations:
//! 1. Plan normalization for every console folder and check both
//!    databases. Nothing on disk changes until all of this succeeds.
//! 2. Snapshot both database files.
//! 3. Open one transaction per database and clear its tables.
//! 4. Per console: rename files, discover games, insert their rows.
//! 5. Write the path registry and total rows, then commit.
//!
//! Any error after step 3 drops the transactions, which rolls both
//! databases back. Renames already performed stay on disk.

use std::path::{Path, PathBuf};

use romdb_core::{Console, Game, IdSequence};
use romdb_db::{
    COMMON_TABLES, CatalogDb, GAMES_TABLES, OperationError, SchemaError, clear_tables,
    count_titles, insert_game, insert_path_registry, insert_total, open_database, verify_tables,
};
use romdb_lib::{
    BackupError, BackupSet, NormalizeError, NormalizePlan, Settings, discover_games,
    execute_normalization, plan_normalization,
};
use rusqlite::Connection;
use thiserror::Error;

use crate::progress::RebuildProgress;

#[derive(Debug, Error)]
pub enum RebuildError {
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
    #[error("Backup failed: {0}")]
    Backup(#[from] BackupError),
    #[error("Database error: {0}")]
    Schema(#[from] SchemaError),
    #[error("Database error: {0}")]
    Db(#[from] OperationError),
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),
}

/// Options controlling a rebuild.
#[derive(Debug, Clone, Default)]
pub struct RebuildOptions {
    /// Plan renames and identifiers without touching disk or databases.
    pub dry_run: bool,
}

/// Outcome for one console.
#[derive(Debug, Clone)]
pub struct ConsoleSummary {
    pub console: Console,
    pub renamed: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub games: Vec<Game>,
}

/// Outcome of a whole rebuild.
#[derive(Debug, Clone, Default)]
pub struct RebuildSummary {
    pub consoles: Vec<ConsoleSummary>,
    /// Value written to `tbl_total` (identifiers issued, for dry runs).
    pub total_games: i64,
    pub rows_cleared: usize,
    pub backup_bytes: u64,
    pub dry_run: bool,
}

/// Everything checked before the first destructive step.
struct Preflight {
    plans: Vec<(Console, NormalizePlan, String)>,
    stick_root: String,
    games: Connection,
    common: Connection,
}

/// Rebuild the catalog for every console in taxonomy order.
pub fn rebuild(
    settings: &Settings,
    options: &RebuildOptions,
    progress: &dyn RebuildProgress,
) -> Result<RebuildSummary, RebuildError> {
    progress.on_phase("Checking console folders and databases");
    let preflight = preflight(settings)?;

    if options.dry_run {
        let summary = dry_run(&preflight.plans, progress);
        progress.on_complete(&summary);
        return Ok(summary);
    }

    progress.on_phase("Backing up databases");
    let backup_bytes = BackupSet::from_settings(settings).run()?;

    let Preflight {
        plans,
        stick_root,
        games,
        common,
    } = preflight;

    let games_tx = games.unchecked_transaction()?;
    let common_tx = common.unchecked_transaction()?;

    progress.on_phase("Clearing catalog tables");
    let rows_cleared =
        clear_tables(&games_tx, GAMES_TABLES)? + clear_tables(&common_tx, COMMON_TABLES)?;
    log::debug!("Cleared {} rows", rows_cleared);

    progress.on_phase("Rebuilding catalog");
    let mut ids = IdSequence::new();
    let mut consoles = Vec::with_capacity(plans.len());
    for (console, plan, stick_dir) in &plans {
        let normalized = execute_normalization(plan)?;
        let games = discover_games(*console, &normalized.filenames, &mut ids);
        for game in &games {
            insert_game(&games_tx, *console, game, stick_dir)?;
        }

        let summary = ConsoleSummary {
            console: *console,
            renamed: normalized.renamed,
            unchanged: normalized.unchanged,
            skipped: normalized.skipped,
            games,
        };
        progress.on_console(&summary);
        consoles.push(summary);
    }

    insert_path_registry(&games_tx, &stick_root)?;
    let total_games = count_titles(&games_tx)?;
    insert_total(&games_tx, total_games)?;

    games_tx.commit()?;
    common_tx.commit()?;

    let summary = RebuildSummary {
        consoles,
        total_games,
        rows_cleared,
        backup_bytes,
        dry_run: false,
    };
    progress.on_complete(&summary);
    Ok(summary)
}

fn preflight(settings: &Settings) -> Result<Preflight, RebuildError> {
    let mut plans = Vec::with_capacity(Console::all().len());
    for &console in Console::all() {
        let plan = plan_normalization(&settings.console_dir(console))?;
        let stick_dir = path_str(&settings.stick_console_dir(console))?;
        plans.push((console, plan, stick_dir));
    }
    let stick_root = path_str(&settings.stick_games_path)?;

    let games = open_database(&settings.games_db_path())?;
    verify_tables(&games, CatalogDb::Games)?;
    let common = open_database(&settings.common_db_path())?;
    verify_tables(&common, CatalogDb::Common)?;

    Ok(Preflight {
        plans,
        stick_root,
        games,
        common,
    })
}

/// Discover games from planned filenames without executing anything.
fn dry_run(
    plans: &[(Console, NormalizePlan, String)],
    progress: &dyn RebuildProgress,
) -> RebuildSummary {
    let mut ids = IdSequence::new();
    let mut consoles = Vec::with_capacity(plans.len());
    for (console, plan, _) in plans {
        for rename in &plan.renames {
            log::info!(
                "  {:?} -> {:?}",
                rename.source.file_name().unwrap_or_default(),
                rename.target.file_name().unwrap_or_default(),
            );
        }
        let games = discover_games(*console, &plan.final_filenames(), &mut ids);
        let summary = ConsoleSummary {
            console: *console,
            renamed: plan.renames.len(),
            unchanged: plan.unchanged.len(),
            skipped: plan.skipped.len(),
            games,
        };
        progress.on_console(&summary);
        consoles.push(summary);
    }

    RebuildSummary {
        consoles,
        total_games: i64::from(ids.issued()),
        rows_cleared: 0,
        backup_bytes: 0,
        dry_run: true,
    }
}

fn path_str(path: &Path) -> Result<String, RebuildError> {
    path.to_str()
        .map(str::to_owned)
        .ok_or_else(|| RebuildError::NonUtf8Path(path.to_path_buf()))
}
