use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use romdb_lib::{Settings, SettingsOverrides};
use romdb_rebuild::{LogProgress, RebuildOptions, RebuildSummary, SilentProgress, rebuild};

use crate::error::CliError;

/// Run a full rebuild, or plan one with `dry_run`.
///
/// A successful rebuild prints nothing unless `verbose` is set. Skipped
/// files are still reported as warnings. Dry runs always print their plan.
pub(crate) fn run_rebuild(
    overrides: &SettingsOverrides,
    dry_run: bool,
    verbose: bool,
) -> Result<(), CliError> {
    let settings = Settings::load(overrides)?;
    let options = RebuildOptions { dry_run };
    if !reports_progress(dry_run, verbose) {
        rebuild(&settings, &options, &SilentProgress)?;
        return Ok(());
    }

    log::info!(
        "Rebuilding catalog from: {}",
        settings
            .games_path
            .display()
            .if_supports_color(Stdout, |t| t.cyan()),
    );
    if dry_run {
        log::info!(
            "{}",
            "Dry run: no files or databases will change".if_supports_color(Stdout, |t| t.yellow()),
        );
    }
    log::info!("");

    let summary = rebuild(&settings, &options, &LogProgress)?;
    print_summary(&settings, &summary);
    Ok(())
}

/// Whether a rebuild prints progress and a summary.
fn reports_progress(dry_run: bool, verbose: bool) -> bool {
    dry_run || verbose
}

fn print_summary(settings: &Settings, summary: &RebuildSummary) {
    let renamed: usize = summary.consoles.iter().map(|c| c.renamed).sum();
    let skipped: usize = summary.consoles.iter().map(|c| c.skipped).sum();

    log::info!("");
    log::info!("{}", "Summary".if_supports_color(Stdout, |t| t.bold()));
    log::info!("  Games:   {}", summary.total_games);
    log::info!("  Renamed: {}", renamed);
    if skipped > 0 {
        log::info!(
            "  Skipped: {}",
            skipped.if_supports_color(Stdout, |t| t.yellow()),
        );
    }

    if summary.dry_run {
        return;
    }
    log::info!("  Cleared: {} rows", summary.rows_cleared);
    log::info!(
        "  Backup:  {} ({} bytes)",
        settings.db_backup_path.display(),
        summary.backup_bytes,
    );
    log::info!(
        "{} Catalog written to {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        settings.db_path.display(),
    );
}

#[cfg(test)]
#[path = "tests/rebuild_tests.rs"]
mod tests;
