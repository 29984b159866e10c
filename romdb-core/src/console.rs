use thiserror::Error;

/// Console identifiers for every system the catalog tracks.
///
/// This enum is the single taxonomy table: scan directory, accepted
/// extensions and the two classification codes the frontend groups by
/// all live here, keyed by variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Console {
    Nes,
    MegaDrive,
    Cps,
    Sfc,
    GameBoy,
    GameBoyColor,
    Gba,
    Ps1,
}

/// All console variants in processing order.
///
/// Identifiers are assigned while walking this list, so reordering it
/// changes every `gameid` written by a rebuild.
const ALL_CONSOLES: &[Console] = &[
    Console::Nes,
    Console::MegaDrive,
    Console::Cps,
    Console::Sfc,
    Console::GameBoy,
    Console::GameBoyColor,
    Console::Gba,
    Console::Ps1,
];

impl Console {
    /// Canonical short name used for CLI arguments and log output.
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::Nes => "nes",
            Self::MegaDrive => "md",
            Self::Cps => "cps",
            Self::Sfc => "sfc",
            Self::GameBoy => "gb",
            Self::GameBoyColor => "gbc",
            Self::Gba => "gba",
            Self::Ps1 => "ps1",
        }
    }

    /// Label shown in summaries.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Nes => "NES",
            Self::MegaDrive => "MD",
            Self::Cps => "CPS",
            Self::Sfc => "SFC",
            Self::GameBoy => "GB",
            Self::GameBoyColor => "GBC",
            Self::Gba => "GBA",
            Self::Ps1 => "PS1",
        }
    }

    /// Subdirectory name under both the primary and the stick games root.
    pub fn scan_dir(&self) -> &'static str {
        match self {
            Self::Nes => "fc",
            _ => self.short_name(),
        }
    }

    /// Accepted file extensions, each including the leading dot.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Nes => &[".nes"],
            Self::MegaDrive => &[".bin", ".smd", ".md"],
            Self::Cps => &[".zip"],
            Self::Sfc => &[".smc", ".sfc", ".fig"],
            Self::GameBoy => &[".gb"],
            Self::GameBoyColor => &[".gbc"],
            Self::Gba => &[".gba"],
            Self::Ps1 => &[".iso", ".img"],
        }
    }

    /// Whether `extension` (with leading dot) belongs to this console.
    /// Comparison ignores ASCII case.
    pub fn accepts_extension(&self, extension: &str) -> bool {
        self.extensions()
            .iter()
            .any(|e| e.eq_ignore_ascii_case(extension))
    }

    /// `class_type` column value in the master game table.
    pub fn class_type(&self) -> i64 {
        match self {
            Self::Nes => 1,
            Self::MegaDrive => 5,
            Self::Cps => 0,
            Self::Sfc => 6,
            Self::GameBoy => 2,
            Self::GameBoyColor => 4,
            Self::Gba => 3,
            Self::Ps1 => 4,
        }
    }

    /// `game_type` column value in the master game table.
    ///
    /// The handheld Game Boy family shares a single game type and is
    /// told apart by `class_type`.
    pub fn game_type(&self) -> i64 {
        match self {
            Self::Nes => 1,
            Self::MegaDrive => 5,
            Self::Cps => 0,
            Self::Sfc => 6,
            Self::GameBoy | Self::GameBoyColor | Self::Gba => 7,
            Self::Ps1 => 9,
        }
    }

    /// All accepted names for this console (case-insensitive matching).
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Nes => &["nes", "fc", "famicom"],
            Self::MegaDrive => &["md", "megadrive", "mega drive", "genesis"],
            Self::Cps => &["cps", "arcade"],
            Self::Sfc => &["sfc", "snes", "super famicom"],
            Self::GameBoy => &["gb", "gameboy", "game boy"],
            Self::GameBoyColor => &["gbc", "game boy color"],
            Self::Gba => &["gba", "game boy advance"],
            Self::Ps1 => &["ps1", "psx", "playstation"],
        }
    }

    pub fn all() -> &'static [Console] {
        ALL_CONSOLES
    }
}

impl std::fmt::Display for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Error returned when a string cannot be parsed into a `Console`.
#[derive(Debug, Clone, Error)]
#[error("unknown console: '{0}'")]
pub struct ConsoleParseError(pub String);

impl std::str::FromStr for Console {
    type Err = ConsoleParseError;

    /// Parse a console from its short name, scan directory or any alias.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        ALL_CONSOLES
            .iter()
            .copied()
            .find(|c| c.scan_dir() == lower || c.aliases().contains(&lower.as_str()))
            .ok_or_else(|| ConsoleParseError(s.to_string()))
    }
}

#[cfg(test)]
#[path = "tests/console_tests.rs"]
mod tests;
