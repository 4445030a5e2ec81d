//! Save-game records.
//!
//! A [`SavedGame`] is the serde form of a session in progress: counters,
//! every locked mino, and the current/next/held pieces. It round-trips
//! through [`GameSession::resume_state`] and [`GameSession::resume`].

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::{is_anchor_in_range, GameSession, PieceState, ResumeState, SessionConfig};
use crate::types::{PieceKind, Rotation, SPAWN_X, SPAWN_Y};

/// Bumped when the record layout changes incompatibly.
pub const SAVE_VERSION: u32 = 1;

/// Piece kinds are stored by their one-letter name.
mod kind_name {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    use crate::types::PieceKind;

    pub fn serialize<S: Serializer>(kind: &PieceKind, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(kind.as_str())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<PieceKind, D::Error> {
        let name = String::deserialize(d)?;
        PieceKind::from_str(&name)
            .ok_or_else(|| D::Error::custom(format!("unknown piece kind {:?}", name)))
    }
}

/// One locked mino.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedMino {
    #[serde(with = "kind_name")]
    pub kind: PieceKind,
    pub x: i8,
    pub y: i8,
}

/// A piece descriptor: kind, anchor and rotation (quarter turns).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedPiece {
    #[serde(with = "kind_name")]
    pub kind: PieceKind,
    pub x: i8,
    pub y: i8,
    #[serde(default)]
    pub rotation: u8,
}

impl SavedPiece {
    /// Descriptor for a piece that is not in play yet.
    pub fn waiting(kind: PieceKind) -> Self {
        Self {
            kind,
            x: SPAWN_X,
            y: SPAWN_Y,
            rotation: 0,
        }
    }
}

impl From<PieceState> for SavedPiece {
    fn from(piece: PieceState) -> Self {
        Self {
            kind: piece.kind,
            x: piece.x,
            y: piece.y,
            rotation: piece.rotation.index(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedGame {
    pub version: u32,
    pub name: String,
    /// Unix seconds.
    pub saved_at: u64,
    pub seed: u32,
    pub score: u32,
    pub lines: u32,
    pub level: u8,
    pub minos: Vec<SavedMino>,
    pub current: SavedPiece,
    pub next: SavedPiece,
    pub held: Option<SavedPiece>,
}

impl SavedGame {
    /// Capture `session` under the player name `name`.
    ///
    /// Fails when there is no piece in play (not started, or game over).
    pub fn capture(session: &GameSession, name: &str) -> Result<Self> {
        let Some(state) = session.resume_state() else {
            bail!("no piece in play to save");
        };
        Ok(Self {
            version: SAVE_VERSION,
            name: name.to_string(),
            saved_at: crate::unix_now(),
            seed: session.seed(),
            score: state.score,
            lines: state.lines,
            level: state.level,
            minos: state
                .minos
                .iter()
                .map(|&(kind, x, y)| SavedMino { kind, x, y })
                .collect(),
            current: state.active.into(),
            next: SavedPiece::waiting(state.next),
            held: state.held.map(SavedPiece::waiting),
        })
    }

    /// Rebuild a running session. `config` supplies the rules; the seed comes
    /// from the record.
    pub fn resume(&self, config: SessionConfig) -> Result<GameSession> {
        if self.version != SAVE_VERSION {
            bail!(
                "save version {} is not supported (expected {})",
                self.version,
                SAVE_VERSION
            );
        }
        if self.current.rotation > 3 {
            bail!("invalid rotation {} for current piece", self.current.rotation);
        }
        if !is_anchor_in_range(self.current.x, self.current.y) {
            bail!(
                "current piece at ({}, {}) is outside the board",
                self.current.x,
                self.current.y
            );
        }

        let state = ResumeState {
            score: self.score,
            lines: self.lines,
            level: self.level,
            minos: self.minos.iter().map(|m| (m.kind, m.x, m.y)).collect(),
            active: PieceState {
                kind: self.current.kind,
                rotation: Rotation::from_index(self.current.rotation),
                x: self.current.x,
                y: self.current.y,
            },
            next: self.next.kind,
            held: self.held.map(|p| p.kind),
        };
        let config = SessionConfig {
            seed: self.seed,
            ..config
        };
        GameSession::resume(config, state)
            .with_context(|| format!("saved game of {} does not fit the board", self.name))
    }
}
