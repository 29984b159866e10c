use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use romdb_core::Console;

/// Print every console in the order a rebuild processes them.
pub(crate) fn run_list() {
    log::info!("Supported consoles:");
    log::info!("");

    for console in Console::all() {
        log::info!(
            "  {} [{}]",
            console
                .short_name()
                .if_supports_color(Stdout, |t| t.bold()),
            console
                .display_name()
                .if_supports_color(Stdout, |t| t.cyan()),
        );
        log::info!("    Folder: {}", console.scan_dir());
        log::info!("    Extensions: {}", console.extensions().join(", "));
        log::info!(
            "    Codes: class_type={} game_type={}",
            console.class_type(),
            console.game_type(),
        );
        if !console.aliases().is_empty() {
            log::info!("    Aliases: {}", console.aliases().join(", "));
        }
    }
}
