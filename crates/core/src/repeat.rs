//! Held-input auto-repeat.
//!
//! A press acts on the first tick. While the input stays held, nothing
//! happens until the hold delay has accumulated; after that it acts once every
//! repeat interval. Time is accumulated before it is compared, so each
//! threshold is crossed on the tick *after* the one that reaches it.

/// Two chained countdowns for one input axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatTimer {
    hold_delay_ms: u32,
    repeat_interval_ms: u32,
    moved_immediate: bool,
    wait_ms: u32,
    repeat_ms: u32,
}

impl RepeatTimer {
    pub fn new(hold_delay_ms: u32, repeat_interval_ms: u32) -> Self {
        Self {
            hold_delay_ms,
            repeat_interval_ms,
            moved_immediate: false,
            wait_ms: 0,
            repeat_ms: 0,
        }
    }

    /// Advance while the input is held. Returns true when it should act.
    pub fn step(&mut self, elapsed_ms: u32) -> bool {
        if self.moved_immediate {
            if self.wait_ms < self.hold_delay_ms {
                self.wait_ms = self.wait_ms.saturating_add(elapsed_ms);
                return false;
            }
            if self.repeat_ms < self.repeat_interval_ms {
                self.repeat_ms = self.repeat_ms.saturating_add(elapsed_ms);
                return false;
            }
        } else {
            self.moved_immediate = true;
        }
        self.repeat_ms = 0;
        true
    }

    /// Input released, or a new piece took over.
    pub fn reset(&mut self) {
        self.moved_immediate = false;
        self.wait_ms = 0;
        self.repeat_ms = 0;
    }

    pub fn is_repeating(&self) -> bool {
        self.moved_immediate && self.wait_ms >= self.hold_delay_ms
    }
}
