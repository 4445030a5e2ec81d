//! Scoring module - line-clear points, level progression and gravity
//!
//! Line clears pay `base[N] + level * bonus[N]` for N lines in one lock.
//! Every piece also carries a speed bonus that decays while it is in play and
//! is paid out when it locks.

use crate::types::{
    BASE_FALL_MS, FALL_STEP_PER_LEVEL_MS, LINES_PER_LEVEL, LINE_LEVEL_BONUS, LINE_SCORES,
    MAX_LEVEL, SPEED_BONUS_DECAY, SPEED_BONUS_PERIOD_MS,
};

/// Points for clearing `lines` (1-4) rows in one lock at `level`.
///
/// Anything outside 1..=4 scores nothing.
pub fn line_clear_score(lines: usize, level: u8) -> u32 {
    if lines == 0 || lines > 4 {
        return 0;
    }
    LINE_SCORES[lines] + (level as u32) * LINE_LEVEL_BONUS[lines]
}

/// Level implied by a line total, capped at [`MAX_LEVEL`].
pub fn level_for_lines(total_lines: u32) -> u8 {
    (total_lines / LINES_PER_LEVEL).min(MAX_LEVEL as u32) as u8
}

/// Level after a line clear.
///
/// The level only follows the line total when the game started at level zero
/// or the total has climbed past the chosen starting level, and it never goes
/// down.
pub fn next_level(current: u8, total_lines: u32, starting_level: u8, start_at_zero: bool) -> u8 {
    let earned = level_for_lines(total_lines);
    if start_at_zero || earned > starting_level {
        current.max(earned)
    } else {
        current
    }
}

/// Gravity interval at `level`: 1000ms at level 0 down to 100ms at level 9.
pub fn fall_interval_ms(level: u8) -> u32 {
    let level = level.min(MAX_LEVEL) as u32;
    BASE_FALL_MS - level * FALL_STEP_PER_LEVEL_MS
}

/// Per-piece bonus that loses [`SPEED_BONUS_DECAY`] points every
/// [`SPEED_BONUS_PERIOD_MS`] of play, floored at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedBonus {
    max: u32,
    value: u32,
    elapsed_ms: u32,
}

impl SpeedBonus {
    pub fn new(max: u32) -> Self {
        Self {
            max,
            value: max,
            elapsed_ms: 0,
        }
    }

    pub fn tick(&mut self, elapsed_ms: u32) {
        self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms);
        while self.elapsed_ms >= SPEED_BONUS_PERIOD_MS {
            self.elapsed_ms -= SPEED_BONUS_PERIOD_MS;
            self.value = self.value.saturating_sub(SPEED_BONUS_DECAY);
        }
    }

    /// Back to full value for a new piece.
    pub fn reset(&mut self) {
        *self = Self::new(self.max);
    }

    pub fn value(&self) -> u32 {
        self.value
    }
}
