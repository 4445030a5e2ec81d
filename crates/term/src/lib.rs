//! Terminal front end.
//!
//! A small, game-oriented rendering layer: [`GameView`] draws a
//! [`GameSnapshot`](crate::core::GameSnapshot) into a [`FrameBuffer`], and
//! [`TerminalRenderer`] flushes framebuffers to the terminal as diffs. No
//! widget toolkit, no layout engine.
//!
//! Board cells are drawn 2 columns wide by default to compensate for the
//! aspect ratio of terminal glyphs.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use blockfall_core as core;
pub use blockfall_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{piece_color, AnchorY, GameView, PanelInfo, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
