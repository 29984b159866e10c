//! Discovered games and the identifier sequence that numbers them.

/// Catalog-wide game identifier.
///
/// The same value is written as `gameid`, every locale table key and
/// `video_id`, so a single game joins across all tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GameId(pub u32);

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic identifier source for one rebuild run.
///
/// Starts at 1 and never reuses a value. One sequence is threaded through
/// every console so identifiers are unique across the whole catalog.
#[derive(Debug, Clone)]
pub struct IdSequence {
    next: u32,
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl IdSequence {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Return the next identifier and advance.
    pub fn next_id(&mut self) -> GameId {
        let id = GameId(self.next);
        self.next += 1;
        id
    }

    /// How many identifiers have been handed out so far.
    pub fn issued(&self) -> u32 {
        self.next - 1
    }
}

/// A ROM file accepted into a console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    pub id: GameId,
    /// Display name: the normalized filename without its extension.
    pub name: String,
    /// Filename on disk after normalization.
    pub filename: String,
    /// Extension including the leading dot (e.g. ".nes").
    pub extension: String,
}

/// Split a filename at its rightmost `.` into `(stem, extension)`.
///
/// The extension is returned without the dot. Returns `None` when the
/// name contains no dot at all. `"a.b.nes"` splits into `("a.b", "nes")`.
pub fn split_extension(filename: &str) -> Option<(&str, &str)> {
    filename
        .rfind('.')
        .map(|pos| (&filename[..pos], &filename[pos + 1..]))
}
