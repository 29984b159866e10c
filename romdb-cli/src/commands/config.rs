use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use romdb_lib::SettingsOverrides;
use romdb_lib::settings;

use crate::error::CliError;

/// Show every setting with the value it resolves to and where it came from.
pub(crate) fn run_config_show(overrides: &SettingsOverrides) -> Result<(), CliError> {
    settings::load_dotenv();
    let path = settings::settings_path();
    let file = settings::load_paths_table(&path)?;

    log::info!(
        "{}",
        "romdb Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("");

    let status = if path.exists() {
        format!("{}", "(exists)".if_supports_color(Stdout, |t| t.green()))
    } else {
        format!("{}", "(not found)".if_supports_color(Stdout, |t| t.dimmed()))
    };
    log::info!(
        "  Settings file: {} {}",
        path.display().if_supports_color(Stdout, |t| t.cyan()),
        status,
    );
    log::info!("");

    for report in settings::describe(overrides, &settings::process_env, file.as_ref()) {
        let name = format!("{}:", report.field.key());
        match &report.value {
            Some(value) => log::info!(
                "  {} {} {}",
                name.if_supports_color(Stdout, |t| t.cyan()),
                value,
                format!("({})", report.source).if_supports_color(Stdout, |t| t.dimmed()),
            ),
            None => log::info!(
                "  {} {} {}",
                name.if_supports_color(Stdout, |t| t.cyan()),
                "not set".if_supports_color(Stdout, |t| t.yellow()),
                format!("(set {})", report.field.env_var())
                    .if_supports_color(Stdout, |t| t.dimmed()),
            ),
        }
    }
    Ok(())
}

/// Print the settings file path.
pub(crate) fn run_config_path() {
    println!("{}", settings::settings_path().display());
}
