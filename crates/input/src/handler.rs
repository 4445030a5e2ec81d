//! Press/release tracking for terminal environments.
//!
//! Game sessions do their own auto-repeat, so they only need to know when a
//! repeating input goes down and when it comes back up. Terminals with the
//! keyboard enhancement protocol report releases; the rest only send a stream
//! of presses while a key is held. For those, an input that has not been seen
//! for `release_timeout_ms` is treated as released.

use arrayvec::ArrayVec;
use crossterm::event::KeyEventKind;

use crate::types::GameInput;

/// Edge reported to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Press(GameInput),
    Release(GameInput),
}

// Long enough to bridge the gap between OS key-repeat events, short enough that
// a tap does not turn into a hold.
const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u32 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Held {
    input: GameInput,
    idle_ms: u32,
}

/// Tracks which repeating inputs are held.
#[derive(Debug, Clone)]
pub struct KeyTracker {
    held: ArrayVec<Held, 3>,
    release_timeout_ms: u32,
    saw_release: bool,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self {
            held: ArrayVec::new(),
            release_timeout_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
            saw_release: false,
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.release_timeout_ms = timeout_ms;
        self
    }

    pub fn key_release_timeout_ms(&self) -> u32 {
        self.release_timeout_ms
    }

    pub fn is_held(&self, input: GameInput) -> bool {
        self.held.iter().any(|h| h.input == input)
    }

    /// Feed one key event that maps to `input`.
    ///
    /// One-shot inputs report every press. Repeating inputs report a press
    /// only when they were not already held.
    pub fn handle(&mut self, input: GameInput, kind: KeyEventKind) -> Option<InputEvent> {
        match kind {
            KeyEventKind::Release => {
                self.saw_release = true;
                let idx = self.held.iter().position(|h| h.input == input)?;
                self.held.remove(idx);
                Some(InputEvent::Release(input))
            }
            KeyEventKind::Press | KeyEventKind::Repeat => {
                if !input.is_repeating() {
                    return (kind == KeyEventKind::Press).then_some(InputEvent::Press(input));
                }
                if let Some(held) = self.held.iter_mut().find(|h| h.input == input) {
                    held.idle_ms = 0;
                    return None;
                }
                // Capacity covers every repeating input.
                let _ = self.held.try_push(Held { input, idle_ms: 0 });
                Some(InputEvent::Press(input))
            }
        }
    }

    /// Age held inputs. Returns releases for inputs that went quiet.
    ///
    /// Once a real release event has been seen the terminal is trusted and
    /// nothing times out.
    pub fn update(&mut self, elapsed_ms: u32) -> ArrayVec<InputEvent, 3> {
        let mut released = ArrayVec::new();
        if self.saw_release {
            return released;
        }
        let timeout = self.release_timeout_ms;
        self.held.retain(|held| {
            held.idle_ms = held.idle_ms.saturating_add(elapsed_ms);
            if held.idle_ms > timeout {
                released.push(InputEvent::Release(held.input));
                false
            } else {
                true
            }
        });
        released
    }

    /// Drop every held input, reporting each as released.
    pub fn release_all(&mut self) -> ArrayVec<InputEvent, 3> {
        self.held
            .drain(..)
            .map(|held| InputEvent::Release(held.input))
            .collect()
    }
}

impl Default for KeyTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeating_input_reports_one_press() {
        let mut tracker = KeyTracker::new();
        assert_eq!(
            tracker.handle(GameInput::MoveLeft, KeyEventKind::Press),
            Some(InputEvent::Press(GameInput::MoveLeft))
        );
        assert_eq!(tracker.handle(GameInput::MoveLeft, KeyEventKind::Press), None);
        assert_eq!(tracker.handle(GameInput::MoveLeft, KeyEventKind::Repeat), None);
        assert!(tracker.is_held(GameInput::MoveLeft));
    }

    #[test]
    fn test_one_shot_input_reports_every_press() {
        let mut tracker = KeyTracker::new();
        for _ in 0..3 {
            assert_eq!(
                tracker.handle(GameInput::Rotate, KeyEventKind::Press),
                Some(InputEvent::Press(GameInput::Rotate))
            );
        }
        assert_eq!(tracker.handle(GameInput::Rotate, KeyEventKind::Repeat), None);
        assert!(!tracker.is_held(GameInput::Rotate));
    }

    #[test]
    fn test_auto_release_after_timeout() {
        let mut tracker = KeyTracker::new().with_key_release_timeout_ms(50);
        tracker.handle(GameInput::SoftDrop, KeyEventKind::Press);

        assert!(tracker.update(50).is_empty());
        let released = tracker.update(1);
        assert_eq!(released.as_slice(), &[InputEvent::Release(GameInput::SoftDrop)]);
        assert!(!tracker.is_held(GameInput::SoftDrop));
    }

    #[test]
    fn test_repeat_events_keep_input_held() {
        let mut tracker = KeyTracker::new().with_key_release_timeout_ms(50);
        tracker.handle(GameInput::MoveRight, KeyEventKind::Press);
        for _ in 0..10 {
            assert!(tracker.update(40).is_empty());
            tracker.handle(GameInput::MoveRight, KeyEventKind::Press);
        }
        assert!(tracker.is_held(GameInput::MoveRight));
    }

    #[test]
    fn test_real_release_disables_timeout() {
        let mut tracker = KeyTracker::new().with_key_release_timeout_ms(50);
        tracker.handle(GameInput::MoveLeft, KeyEventKind::Press);
        assert_eq!(
            tracker.handle(GameInput::MoveLeft, KeyEventKind::Release),
            Some(InputEvent::Release(GameInput::MoveLeft))
        );
        tracker.handle(GameInput::MoveLeft, KeyEventKind::Press);
        assert!(tracker.update(10_000).is_empty());
        assert!(tracker.is_held(GameInput::MoveLeft));
    }

    #[test]
    fn test_release_all() {
        let mut tracker = KeyTracker::new();
        tracker.handle(GameInput::MoveLeft, KeyEventKind::Press);
        tracker.handle(GameInput::SoftDrop, KeyEventKind::Press);
        assert_eq!(tracker.release_all().len(), 2);
        assert!(!tracker.is_held(GameInput::MoveLeft));
    }
}
