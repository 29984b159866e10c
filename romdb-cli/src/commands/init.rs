use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use romdb_db::{CatalogDb, create_database};
use romdb_lib::{Settings, SettingsOverrides};

use crate::error::CliError;

/// Create empty games and common databases. Existing files are left alone.
pub(crate) fn run_init(overrides: &SettingsOverrides) -> Result<(), CliError> {
    let settings = Settings::load(overrides)?;
    std::fs::create_dir_all(&settings.db_path)?;

    for (db, path) in [
        (CatalogDb::Games, settings.games_db_path()),
        (CatalogDb::Common, settings.common_db_path()),
    ] {
        if path.exists() {
            log::info!(
                "  {} {} {}",
                db,
                path.display(),
                "(exists, skipped)".if_supports_color(Stdout, |t| t.dimmed()),
            );
            continue;
        }
        create_database(&path, db)?;
        log::info!(
            "  {} {} {}",
            db,
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(created)".if_supports_color(Stdout, |t| t.green()),
        );
    }
    Ok(())
}
