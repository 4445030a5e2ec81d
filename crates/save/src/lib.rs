//! Persistence for blockfall: save slots and the highscore table.
//!
//! Everything is JSON on disk. Errors carry the path they concern.

pub mod highscores;
pub mod record;
pub mod store;

pub use blockfall_core as core;
pub use blockfall_types as types;

pub use highscores::{HighscoreEntry, HighscoreTable, MAX_ENTRIES};
pub use record::{SavedGame, SavedMino, SavedPiece, SAVE_VERSION};
pub use store::SaveStore;

use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds since the Unix epoch; 0 if the clock is before it.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
