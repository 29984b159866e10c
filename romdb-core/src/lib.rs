//! Console taxonomy and game records shared by every romdb crate.

pub mod console;
pub mod game;

pub use console::{Console, ConsoleParseError};
pub use game::{Game, GameId, IdSequence, split_extension};
