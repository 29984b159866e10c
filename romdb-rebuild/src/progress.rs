//! Rebuild progress reporting.

use crate::rebuild::{ConsoleSummary, RebuildSummary};

/// Trait for receiving rebuild progress updates.
pub trait RebuildProgress {
    /// Called when a phase starts (e.g., "Backing up databases").
    fn on_phase(&self, message: &str);

    /// Called after a console's folder is normalized and its games discovered.
    fn on_console(&self, summary: &ConsoleSummary);

    /// Called once the rebuild has committed (or the dry run has finished).
    fn on_complete(&self, summary: &RebuildSummary);
}

/// A no-op progress reporter that discards all updates.
pub struct SilentProgress;

impl RebuildProgress for SilentProgress {
    fn on_phase(&self, _message: &str) {}
    fn on_console(&self, _summary: &ConsoleSummary) {}
    fn on_complete(&self, _summary: &RebuildSummary) {}
}

/// A progress reporter that logs to the `log` crate.
pub struct LogProgress;

impl RebuildProgress for LogProgress {
    fn on_phase(&self, message: &str) {
        log::info!("{}", message);
    }

    fn on_console(&self, summary: &ConsoleSummary) {
        log::info!(
            "  {:<4} {} games ({} renamed, {} skipped)",
            summary.console.display_name(),
            summary.games.len(),
            summary.renamed,
            summary.skipped,
        );
        for game in &summary.games {
            log::debug!("    [{}] {}", game.id, game.filename);
        }
    }

    fn on_complete(&self, summary: &RebuildSummary) {
        if summary.dry_run {
            log::info!("Dry run: {} games would be cataloged", summary.total_games);
        } else {
            log::info!("Catalog rebuilt with {} games", summary.total_games);
        }
    }
}
