//! Session configuration.

use crate::rng::RandomizerKind;
use crate::types::{
    DEFAULT_MAX_SWAPS, HOLD_DELAY_MS, HORIZONTAL_REPEAT_MS, MAX_LEVEL, SPEED_BONUS_MAX,
    VERTICAL_REPEAT_MS,
};

/// Rules and timing for one game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Randomizer seed; the same seed replays the same piece sequence.
    pub seed: u32,
    /// Level the session starts at (clamped to 0..=9).
    pub starting_level: u8,
    /// Level follows the line total from zero instead of waiting for it to
    /// pass `starting_level`.
    pub start_at_level_zero: bool,
    /// Hold swaps allowed per piece lifetime.
    pub max_swaps: u8,
    /// Starting speed bonus for each piece.
    pub speed_bonus_max: u32,
    pub horizontal_repeat_ms: u32,
    pub vertical_repeat_ms: u32,
    /// Held-key wait before auto-repeat starts.
    pub hold_delay_ms: u32,
    /// Whether a blocked hold still uses up one of the swaps.
    pub charge_failed_swaps: bool,
    pub randomizer: RandomizerKind,
}

impl SessionConfig {
    pub fn with_seed(seed: u32) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Starting level clamped into range.
    pub fn starting_level(&self) -> u8 {
        self.starting_level.min(MAX_LEVEL)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            starting_level: 0,
            start_at_level_zero: false,
            max_swaps: DEFAULT_MAX_SWAPS,
            speed_bonus_max: SPEED_BONUS_MAX,
            horizontal_repeat_ms: HORIZONTAL_REPEAT_MS,
            vertical_repeat_ms: VERTICAL_REPEAT_MS,
            hold_delay_ms: HOLD_DELAY_MS,
            charge_failed_swaps: false,
            randomizer: RandomizerKind::Uniform,
        }
    }
}
