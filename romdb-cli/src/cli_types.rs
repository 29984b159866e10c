//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use romdb_lib::SettingsOverrides;

#[derive(Parser)]
#[command(name = "romdb")]
#[command(about = "Rebuild the game catalog databases from console folders", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub paths: PathArgs,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging and rebuild progress (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    /// Defaults to `rebuild` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Path overrides, taking priority over the environment and settings file.
#[derive(Args, Clone, Default)]
pub(crate) struct PathArgs {
    /// Root containing one folder per console (GAMES_PATH)
    #[arg(long, global = true)]
    pub games_path: Option<PathBuf>,

    /// Root the frontend reads games from at runtime (STICK_GAMES_PATH)
    #[arg(long, global = true)]
    pub stick_path: Option<PathBuf>,

    /// Directory holding both databases (DB_PATH)
    #[arg(long, global = true)]
    pub db_path: Option<PathBuf>,

    /// Directory receiving database snapshots (DB_BACKUP_PATH)
    #[arg(long, global = true)]
    pub backup_path: Option<PathBuf>,
}

impl PathArgs {
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            games_path: self.games_path.clone(),
            stick_games_path: self.stick_path.clone(),
            db_path: self.db_path.clone(),
            db_backup_path: self.backup_path.clone(),
            ..SettingsOverrides::default()
        }
    }
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Back up, normalize filenames and repopulate both databases
    Rebuild {
        /// Show planned renames and identifiers without executing
        #[arg(short = 'n', long)]
        dry_run: bool,
    },

    /// List all supported consoles
    List,

    /// Inspect path and database settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Create empty games and common databases
    Init,
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show resolved settings and their sources
    Show,

    /// Print the settings file path
    Path,
}

#[cfg(test)]
#[path = "tests/cli_types_tests.rs"]
mod tests;
