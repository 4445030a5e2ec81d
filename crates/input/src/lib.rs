//! Terminal input.
//!
//! Independent of any UI framework: [`KeyBindings`] maps `crossterm` key
//! events to [`Command`]s, and [`KeyTracker`] turns the raw event stream into
//! clean press/release edges, including on terminals that never report key
//! releases.

pub mod handler;
pub mod map;

pub use blockfall_types as types;

pub use handler::{InputEvent, KeyTracker};
pub use map::{should_quit, Command, KeyBindings, KeySet};
