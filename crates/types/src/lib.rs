//! Shared types and constants for the blockfall workspace.
//!
//! Everything here is plain data with no dependencies, usable from the rules
//! engine, the terminal front end and the persistence layer alike.
//!
//! # Coordinates
//!
//! The board is `BOARD_WIDTH` x `BOARD_HEIGHT` cells. `x` grows to the right,
//! `y` grows **upwards**: row 0 is the floor, row `BOARD_HEIGHT - 1` is the
//! skyline. Pieces spawn above the skyline at (`SPAWN_X`, `SPAWN_Y`) and fall
//! into view.
//!
//! # Timing
//!
//! All durations are milliseconds and only enter the engine through
//! `tick(elapsed_ms)`.
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Front-end frame interval |
//! | `BASE_FALL_MS` | 1000 | Gravity interval at level 0 |
//! | `FALL_STEP_PER_LEVEL_MS` | 100 | Gravity speed-up per level |
//! | `HOLD_DELAY_MS` | 200 | Held key wait before auto-repeat |
//! | `HORIZONTAL_REPEAT_MS` | 100 | Auto-repeat interval left/right |
//! | `VERTICAL_REPEAT_MS` | 100 | Auto-repeat interval soft drop |
//! | `SPEED_BONUS_PERIOD_MS` | 1000 | Speed bonus decay period |
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{GameInput, PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! assert_eq!(PieceKind::from_str("t"), Some(PieceKind::T));
//! assert_eq!(Rotation::R0.next(), Rotation::R90);
//! assert_eq!(GameInput::from_str("hardDrop"), Some(GameInput::HardDrop));
//! assert_eq!((BOARD_WIDTH, BOARD_HEIGHT), (10, 20));
//! ```

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 visible rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Spawn anchor column (center of the board)
pub const SPAWN_X: i8 = (BOARD_WIDTH / 2) as i8;

/// Spawn anchor row (first row above the skyline)
pub const SPAWN_Y: i8 = BOARD_HEIGHT as i8;

/// Front-end frame interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Gravity interval at level 0 (one row per second)
pub const BASE_FALL_MS: u32 = 1000;

/// Gravity interval reduction per level
pub const FALL_STEP_PER_LEVEL_MS: u32 = 100;

/// How long a direction must be held before auto-repeat kicks in.
pub const HOLD_DELAY_MS: u32 = 200;

/// Auto-repeat interval for held left/right.
pub const HORIZONTAL_REPEAT_MS: u32 = 100;

/// Auto-repeat interval for held soft drop.
pub const VERTICAL_REPEAT_MS: u32 = 100;

/// Highest reachable level.
pub const MAX_LEVEL: u8 = 9;

/// Lines needed per level.
pub const LINES_PER_LEVEL: u32 = 10;

/// Hold swaps allowed per piece lifetime.
pub const DEFAULT_MAX_SWAPS: u8 = 2;

/// Starting value of the per-piece speed bonus.
pub const SPEED_BONUS_MAX: u32 = 100;

/// Speed bonus lost per decay period.
pub const SPEED_BONUS_DECAY: u32 = 10;

/// Speed bonus decay period.
pub const SPEED_BONUS_PERIOD_MS: u32 = 1000;

/// Base points for clearing N lines in one lock (index = N).
pub const LINE_SCORES: [u32; 5] = [0, 40, 100, 300, 1200];

/// Per-level bonus points for clearing N lines in one lock (index = N).
pub const LINE_LEVEL_BONUS: [u32; 5] = [0, 20, 25, 30, 40];

/// The seven tetromino piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All kinds in draw order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// ```
    /// use blockfall_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
        }
    }

    /// Compact 1-based code used in snapshot grids (0 means empty).
    pub fn code(&self) -> u8 {
        match self {
            PieceKind::I => 1,
            PieceKind::O => 2,
            PieceKind::T => 3,
            PieceKind::S => 4,
            PieceKind::Z => 5,
            PieceKind::J => 6,
            PieceKind::L => 7,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1..=7 => Some(Self::ALL[(code - 1) as usize]),
            _ => None,
        }
    }
}

/// Rotation states, counted in quarter turns counter-clockwise from spawn.
///
/// The cycle goes R0 → R90 → R180 → R270 → R0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    /// Next state (`state + 1 mod 4`).
    ///
    /// ```
    /// use blockfall_types::Rotation;
    ///
    /// assert_eq!(Rotation::R0.next(), Rotation::R90);
    /// assert_eq!(Rotation::R270.next(), Rotation::R0);
    /// ```
    pub fn next(&self) -> Self {
        Self::from_index(self.index() + 1)
    }

    pub fn index(&self) -> u8 {
        match self {
            Rotation::R0 => 0,
            Rotation::R90 => 1,
            Rotation::R180 => 2,
            Rotation::R270 => 3,
        }
    }

    /// Build from a quarter-turn count; wraps modulo 4.
    pub fn from_index(index: u8) -> Self {
        match index % 4 {
            0 => Rotation::R0,
            1 => Rotation::R90,
            2 => Rotation::R180,
            _ => Rotation::R270,
        }
    }
}

/// Player inputs accepted by a game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameInput {
    /// Shift one column left (auto-repeats while held)
    MoveLeft,
    /// Shift one column right (auto-repeats while held)
    MoveRight,
    /// Step one row down (auto-repeats while held)
    SoftDrop,
    /// Drop to the resting position and lock
    HardDrop,
    /// Rotate to the next rotation state
    Rotate,
    /// Swap with the hold slot
    Hold,
}

impl GameInput {
    pub const ALL: [GameInput; 6] = [
        GameInput::MoveLeft,
        GameInput::MoveRight,
        GameInput::SoftDrop,
        GameInput::HardDrop,
        GameInput::Rotate,
        GameInput::Hold,
    ];

    /// Parse from the camelCase name (case-insensitive).
    ///
    /// ```
    /// use blockfall_types::GameInput;
    ///
    /// assert_eq!(GameInput::from_str("moveLeft"), Some(GameInput::MoveLeft));
    /// assert_eq!(GameInput::from_str("ROTATE"), Some(GameInput::Rotate));
    /// assert_eq!(GameInput::from_str("jump"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameInput::MoveLeft),
            "moveright" => Some(GameInput::MoveRight),
            "softdrop" => Some(GameInput::SoftDrop),
            "harddrop" => Some(GameInput::HardDrop),
            "rotate" => Some(GameInput::Rotate),
            "hold" => Some(GameInput::Hold),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameInput::MoveLeft => "moveLeft",
            GameInput::MoveRight => "moveRight",
            GameInput::SoftDrop => "softDrop",
            GameInput::HardDrop => "hardDrop",
            GameInput::Rotate => "rotate",
            GameInput::Hold => "hold",
        }
    }

    /// Inputs that stay active while held (as opposed to one-shot presses).
    pub fn is_repeating(&self) -> bool {
        matches!(
            self,
            GameInput::MoveLeft | GameInput::MoveRight | GameInput::SoftDrop
        )
    }
}

/// Observable outcome emitted by a game session.
///
/// Sessions queue these as they happen; the front end drains them after each
/// tick to drive rendering, audio and persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A new active piece entered play.
    PieceSpawned { kind: PieceKind },
    /// The active piece shifted one cell.
    PieceMoved,
    /// The active piece changed rotation state.
    PieceRotated,
    /// The active piece became part of the static board.
    PieceLocked { kind: PieceKind, hard_drop: bool },
    /// One lock removed this many full rows.
    LinesCleared(u8),
    /// Score after the change.
    ScoreChanged(u32),
    /// Level after the change.
    LevelChanged(u8),
    /// The active piece went to the hold slot.
    PieceHeld { held: PieceKind },
    PauseChanged(bool),
    /// Terminal state; nothing else happens in this session.
    GameOver { score: u32 },
}

/// Lines cleared / score bookkeeping for the most recent lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LockSummary {
    pub lines_cleared: u8,
    pub line_clear_score: u32,
    pub speed_bonus: u32,
    pub topped_out: bool,
}
