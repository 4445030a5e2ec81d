//! Environment configuration for the terminal binary.
//!
//! | variable                  | default            |
//! |---------------------------|--------------------|
//! | `BLOCKFALL_SEED`          | clock-derived      |
//! | `BLOCKFALL_START_LEVEL`   | 0                  |
//! | `BLOCKFALL_START_AT_ZERO` | false              |
//! | `BLOCKFALL_MAX_SWAPS`     | 2                  |
//! | `BLOCKFALL_SEVEN_BAG`     | false              |
//! | `BLOCKFALL_DATA_DIR`      | `./blockfall-data` |
//! | `BLOCKFALL_PLAYER`        | `player`           |
//! | `BLOCKFALL_RESUME`        | unset              |
//! | `BLOCKFALL_LOG`           | `info`             |
//!
//! Unparseable values fall back to the default.

use std::path::PathBuf;

use crate::core::{RandomizerKind, SessionConfig};
use crate::types::{DEFAULT_MAX_SWAPS, MAX_LEVEL};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// `None` means derive one from the clock at startup.
    pub seed: Option<u32>,
    pub starting_level: u8,
    pub start_at_level_zero: bool,
    pub max_swaps: u8,
    pub seven_bag: bool,
    pub data_dir: PathBuf,
    pub player: String,
    /// Save slot to resume instead of starting fresh.
    pub resume_slot: Option<String>,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            seed: None,
            starting_level: 0,
            start_at_level_zero: false,
            max_swaps: DEFAULT_MAX_SWAPS,
            seven_bag: false,
            data_dir: PathBuf::from("./blockfall-data"),
            player: "player".to_string(),
            resume_slot: None,
            log_filter: "info".to_string(),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).and_then(non_empty);

        Self {
            seed: var("BLOCKFALL_SEED").and_then(|s| s.parse().ok()),
            starting_level: var("BLOCKFALL_START_LEVEL")
                .and_then(|s| s.parse::<u8>().ok())
                .filter(|level| *level <= MAX_LEVEL)
                .unwrap_or(defaults.starting_level),
            start_at_level_zero: var("BLOCKFALL_START_AT_ZERO")
                .and_then(|s| parse_flag(&s))
                .unwrap_or(defaults.start_at_level_zero),
            max_swaps: var("BLOCKFALL_MAX_SWAPS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_swaps),
            seven_bag: var("BLOCKFALL_SEVEN_BAG")
                .and_then(|s| parse_flag(&s))
                .unwrap_or(defaults.seven_bag),
            data_dir: var("BLOCKFALL_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            player: var("BLOCKFALL_PLAYER").unwrap_or(defaults.player),
            resume_slot: var("BLOCKFALL_RESUME"),
            log_filter: var("BLOCKFALL_LOG").unwrap_or(defaults.log_filter),
        }
    }

    /// Session rules for a new game with `seed`.
    pub fn session_config(&self, seed: u32) -> SessionConfig {
        SessionConfig {
            starting_level: self.starting_level,
            start_at_level_zero: self.start_at_level_zero,
            max_swaps: self.max_swaps,
            randomizer: if self.seven_bag {
                RandomizerKind::SevenBag
            } else {
                RandomizerKind::Uniform
            },
            ..SessionConfig::with_seed(seed)
        }
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("blockfall.log")
    }

    pub fn highscore_path(&self) -> PathBuf {
        self.data_dir.join("highscores.json")
    }

    pub fn save_dir(&self) -> PathBuf {
        self.data_dir.join("saves")
    }
}
