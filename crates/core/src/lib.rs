//! Core rules engine - pure, deterministic, and testable
//!
//! This crate holds the board model and every game rule. It does no I/O: no
//! terminal, no files, no clock. Time only enters through
//! [`GameSession::tick`], so the same seed and the same input/tick stream
//! always replay the same game.
//!
//! # Module Structure
//!
//! - [`board`]: 10x20 occupancy grid with per-piece ownership and line clears
//! - [`pieces`]: Tetromino shapes, placement validity and the two-step wall
//!   correction used for rotation
//! - [`ghost`]: Resting-position search shared by the ghost and hard drop
//! - [`rng`]: Uniform piece randomizer (seven-bag and scripted variants)
//! - [`scoring`]: Line-clear points, level progression, gravity, speed bonus
//! - [`repeat`]: Held-input auto-repeat timers
//! - [`config`]: Per-session rules and timing
//! - [`session`]: The spawn, fall, lock, clear, score cycle
//! - [`snapshot`]: Plain copyable view for rendering
//!
//! # Game Rules
//!
//! - **Randomizer**: every piece is an independent uniform draw, so repeats
//!   happen. A seven-bag shuffle is available as an opt-in.
//! - **Rotation**: O never rotates, I/S/Z toggle between two states, T/J/L
//!   cycle through four. A blocked rotation gets one correction back inside the
//!   walls/floor and is abandoned if that still collides.
//! - **Lock**: a piece locks as soon as a downward step fails. No lock delay.
//! - **Hold**: up to two swaps per piece.
//! - **Scoring**: 40/100/300/1200 plus 20/25/30/40 per level for 1-4 lines,
//!   plus a per-piece speed bonus that decays while the piece is in play.
//!
//! # Example
//!
//! ```
//! use blockfall_core::{GameSession, SessionConfig};
//! use blockfall_types::GameInput;
//!
//! let mut game = GameSession::new(SessionConfig::with_seed(12345));
//! game.start();
//!
//! game.press(GameInput::MoveRight);
//! game.release(GameInput::MoveRight);
//! game.press(GameInput::Rotate);
//! game.press(GameInput::HardDrop);
//!
//! // The first lock pays the full speed bonus.
//! assert!(game.score() > 0);
//! assert_eq!(game.pieces_locked(), 1);
//! ```

pub mod board;
pub mod config;
pub mod ghost;
pub mod pieces;
pub mod repeat;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, Occupant, PieceId};
pub use config::SessionConfig;
pub use pieces::{get_shape, is_anchor_in_range, try_rotate, Tetromino};
pub use rng::{PieceQueue, RandomizerKind, SimpleRng};
pub use scoring::{fall_interval_ms, line_clear_score, SpeedBonus};
pub use session::{GameSession, HoldOutcome, Phase, PieceState, ResumeError, ResumeState};
pub use snapshot::{ActiveSnapshot, GameSnapshot};
