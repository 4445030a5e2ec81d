use crate::pieces::Tetromino;
use crate::types::{PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl ActiveSnapshot {
    /// Absolute cells of the piece, `y` up.
    pub fn cells(&self) -> [(i8, i8); 4] {
        crate::pieces::candidate_cells(self.kind, self.rotation, self.x, self.y)
    }
}

impl From<Tetromino> for ActiveSnapshot {
    fn from(value: Tetromino) -> Self {
        Self {
            kind: value.kind,
            rotation: value.rotation,
            x: value.x,
            y: value.y,
        }
    }
}

/// Plain copy of everything a front end needs to draw one frame.
///
/// `board[y][x]` holds kind codes with row 0 at the floor; the active piece is
/// included wherever it is below the skyline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    pub board: [[u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
    pub active: Option<ActiveSnapshot>,
    pub ghost_y: Option<i8>,
    pub next: Option<PieceKind>,
    pub held: Option<PieceKind>,
    pub swaps_left: u8,
    pub seed: u32,
    pub score: u32,
    pub level: u8,
    pub lines: u32,
    pub speed_bonus: u32,
    pub paused: bool,
    pub game_over: bool,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn playable(&self) -> bool {
        !self.game_over && !self.paused
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: [[0u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
            active: None,
            ghost_y: None,
            next: None,
            held: None,
            swaps_left: 0,
            seed: 0,
            score: 0,
            level: 0,
            lines: 0,
            speed_bonus: 0,
            paused: false,
            game_over: false,
        }
    }
}
