//! romdb CLI
//!
//! Rebuilds a handheld frontend's game catalog from its console folders.

mod cli_types;
mod commands;
mod error;

use std::fs::File;
use std::io::Write;

use clap::Parser;
use log::LevelFilter;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use cli_types::{Cli, Commands, ConfigAction};
use error::CliError;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logger(&cli) {
        eprintln!("Cannot open log file: {}", e);
        std::process::exit(1);
    }

    let overrides = cli.paths.overrides();
    let result = match cli.command.unwrap_or(Commands::Rebuild { dry_run: false }) {
        Commands::Rebuild { dry_run } => {
            commands::rebuild::run_rebuild(&overrides, dry_run, cli.verbose)
        }
        Commands::List => {
            commands::list::run_list();
            Ok(())
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_config_show(&overrides),
            ConfigAction::Path => {
                commands::config::run_config_path();
                Ok(())
            }
        },
        Commands::Init => commands::init::run_init(&overrides),
    };

    if let Err(e) = result {
        report(&e);
        std::process::exit(1);
    }
}

fn report(e: &CliError) {
    log::error!(
        "{} {}",
        "\u{2718}".if_supports_color(Stderr, |t| t.red()),
        e,
    );
}

/// Install `env_logger` for the global output flags.
///
/// Normal output goes through `log::info!` with a bare format, so the
/// default level is `info`. `RUST_LOG` still applies on top.
fn init_logger(cli: &Cli) -> std::io::Result<()> {
    let level = if cli.quiet {
        LevelFilter::Warn
    } else if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).parse_default_env();

    if cli.verbose {
        builder.format(|buf, record| {
            writeln!(
                buf,
                "{} {:<5} {}",
                buf.timestamp_millis(),
                record.level(),
                record.args()
            )
        });
    } else {
        builder.format(|buf, record| writeln!(buf, "{}", record.args()));
    }

    if let Some(path) = &cli.logfile {
        let file = File::create(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(
            strip_ansi_escapes::Writer::new(file),
        )));
    }

    builder.init();
    Ok(())
}
