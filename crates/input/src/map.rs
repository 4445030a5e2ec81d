//! Key bindings from terminal events to game inputs.

use arrayvec::ArrayVec;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::types::GameInput;

/// Keys bound to one command.
pub type KeySet = ArrayVec<KeyCode, 4>;

/// What a key does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Input(GameInput),
    Pause,
    Restart,
    QuickSave,
    Quit,
}

/// Keyboard layout: a few keys per game input plus the front-end commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    inputs: [KeySet; 6],
    pause: KeySet,
    restart: KeySet,
    quick_save: KeySet,
    quit: KeySet,
}

fn slot(input: GameInput) -> usize {
    match input {
        GameInput::MoveLeft => 0,
        GameInput::MoveRight => 1,
        GameInput::SoftDrop => 2,
        GameInput::HardDrop => 3,
        GameInput::Rotate => 4,
        GameInput::Hold => 5,
    }
}

fn keys(codes: &[KeyCode]) -> KeySet {
    codes.iter().copied().take(4).collect()
}

/// Letters match either case.
fn same_key(bound: KeyCode, pressed: KeyCode) -> bool {
    match (bound, pressed) {
        (KeyCode::Char(a), KeyCode::Char(b)) => a.eq_ignore_ascii_case(&b),
        (a, b) => a == b,
    }
}

impl KeyBindings {
    /// No keys bound at all.
    pub fn empty() -> Self {
        Self {
            inputs: Default::default(),
            pause: KeySet::new(),
            restart: KeySet::new(),
            quick_save: KeySet::new(),
            quit: KeySet::new(),
        }
    }

    /// Keys currently bound to `input`.
    pub fn keys_for(&self, input: GameInput) -> &[KeyCode] {
        &self.inputs[slot(input)]
    }

    /// Add `key` to `input`, removing it from any other game input first.
    /// Returns false if `input` already has four keys.
    pub fn bind(&mut self, input: GameInput, key: KeyCode) -> bool {
        for set in self.inputs.iter_mut() {
            set.retain(|k| !same_key(*k, key));
        }
        self.inputs[slot(input)].try_push(key).is_ok()
    }

    /// Replace every key of `input`.
    pub fn rebind(&mut self, input: GameInput, codes: &[KeyCode]) {
        self.inputs[slot(input)] = keys(codes);
    }

    /// Command for a key event, if any.
    ///
    /// Ctrl-C always quits regardless of the layout.
    pub fn command(&self, key: KeyEvent) -> Option<Command> {
        if should_quit(key) {
            return Some(Command::Quit);
        }
        self.input(key.code)
            .map(Command::Input)
            .or_else(|| {
                [
                    (&self.pause, Command::Pause),
                    (&self.restart, Command::Restart),
                    (&self.quick_save, Command::QuickSave),
                    (&self.quit, Command::Quit),
                ]
                .into_iter()
                .find(|(set, _)| set.iter().any(|k| same_key(*k, key.code)))
                .map(|(_, command)| command)
            })
    }

    /// Game input bound to `code`, if any.
    pub fn input(&self, code: KeyCode) -> Option<GameInput> {
        GameInput::ALL
            .into_iter()
            .find(|input| self.keys_for(*input).iter().any(|k| same_key(*k, code)))
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut bindings = Self::empty();
        bindings.rebind(GameInput::MoveLeft, &[KeyCode::Left, KeyCode::Char('a')]);
        bindings.rebind(GameInput::MoveRight, &[KeyCode::Right, KeyCode::Char('d')]);
        bindings.rebind(GameInput::SoftDrop, &[KeyCode::Down, KeyCode::Char('s')]);
        bindings.rebind(GameInput::HardDrop, &[KeyCode::Char(' ')]);
        bindings.rebind(GameInput::Rotate, &[KeyCode::Up, KeyCode::Char('w')]);
        bindings.rebind(GameInput::Hold, &[KeyCode::Char('c')]);
        bindings.pause = keys(&[KeyCode::Char('p'), KeyCode::Esc]);
        bindings.restart = keys(&[KeyCode::Char('r')]);
        bindings.quick_save = keys(&[KeyCode::F(5)]);
        bindings.quit = keys(&[KeyCode::Char('q')]);
        bindings
    }
}

/// Check if key should quit the game no matter the layout.
pub fn should_quit(key: KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd(code: KeyCode) -> Option<Command> {
        KeyBindings::default().command(KeyEvent::from(code))
    }

    #[test]
    fn test_movement_keys() {
        assert_eq!(cmd(KeyCode::Left), Some(Command::Input(GameInput::MoveLeft)));
        assert_eq!(cmd(KeyCode::Right), Some(Command::Input(GameInput::MoveRight)));
        assert_eq!(cmd(KeyCode::Down), Some(Command::Input(GameInput::SoftDrop)));
        assert_eq!(cmd(KeyCode::Char('A')), Some(Command::Input(GameInput::MoveLeft)));
    }

    #[test]
    fn test_action_keys() {
        assert_eq!(cmd(KeyCode::Up), Some(Command::Input(GameInput::Rotate)));
        assert_eq!(cmd(KeyCode::Char(' ')), Some(Command::Input(GameInput::HardDrop)));
        assert_eq!(cmd(KeyCode::Char('c')), Some(Command::Input(GameInput::Hold)));
        assert_eq!(cmd(KeyCode::Char('p')), Some(Command::Pause));
        assert_eq!(cmd(KeyCode::Esc), Some(Command::Pause));
        assert_eq!(cmd(KeyCode::Char('r')), Some(Command::Restart));
        assert_eq!(cmd(KeyCode::F(5)), Some(Command::QuickSave));
        assert_eq!(cmd(KeyCode::Char('x')), None);
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(cmd(KeyCode::Char('q')), Some(Command::Quit));
        let bindings = KeyBindings::default();
        assert_eq!(
            bindings.command(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Command::Quit)
        );
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('c'))));
    }

    #[test]
    fn test_bind_moves_key_between_inputs() {
        let mut bindings = KeyBindings::default();
        assert!(bindings.bind(GameInput::Hold, KeyCode::Up));
        assert_eq!(bindings.input(KeyCode::Up), Some(GameInput::Hold));
        assert_eq!(bindings.keys_for(GameInput::Rotate), &[KeyCode::Char('w')]);
    }

    #[test]
    fn test_empty_layout_only_hard_quits() {
        let bindings = KeyBindings::empty();
        assert_eq!(bindings.command(KeyEvent::from(KeyCode::Left)), None);
        assert_eq!(
            bindings.command(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Command::Quit)
        );
    }
}
