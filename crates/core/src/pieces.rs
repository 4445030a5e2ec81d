//! Pieces module - tetromino shapes, placement validity and rotation
//!
//! Shapes are four mino offsets around a pivot mino, `y` pointing up. Each
//! rotation state turns the spawn shape a quarter turn counter-clockwise about
//! the pivot.
//!
//! Rotation uses a two-step wall correction rather than a kick table: if the
//! rotated cells do not fit, the piece is pushed back inside the walls/floor by
//! the largest overflow on each axis and tried once more against the other
//! pieces on the board.

use crate::board::{Board, PieceId};
use crate::types::{PieceKind, Rotation, BOARD_WIDTH, SPAWN_Y};

/// Offset of a single mino relative to the piece anchor
pub type MinoOffset = (i8, i8);

/// Shape of a piece - 4 mino offsets from the anchor
pub type PieceShape = [MinoOffset; 4];

/// Absolute board coordinates of a piece's 4 minos
pub type PieceCells = [(i8, i8); 4];

/// How a kind is allowed to rotate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationRule {
    /// Never rotates (O).
    Fixed,
    /// Toggles between the spawn state and one quarter turn (I, S, Z).
    Toggle,
    /// Cycles through all four states (T, J, L).
    Full,
}

pub fn rotation_rule(kind: PieceKind) -> RotationRule {
    match kind {
        PieceKind::O => RotationRule::Fixed,
        PieceKind::I | PieceKind::S | PieceKind::Z => RotationRule::Toggle,
        PieceKind::T | PieceKind::J | PieceKind::L => RotationRule::Full,
    }
}

/// Rotation state a rotate input would move to, or `None` if the kind is fixed.
pub fn next_rotation(kind: PieceKind, rotation: Rotation) -> Option<Rotation> {
    match rotation_rule(kind) {
        RotationRule::Fixed => None,
        RotationRule::Toggle => Some(match rotation {
            Rotation::R0 => Rotation::R90,
            _ => Rotation::R0,
        }),
        RotationRule::Full => Some(rotation.next()),
    }
}

fn spawn_shape(kind: PieceKind) -> PieceShape {
    match kind {
        PieceKind::I => [(-1, 0), (0, 0), (1, 0), (2, 0)],
        PieceKind::O => [(0, 0), (1, 0), (0, 1), (1, 1)],
        PieceKind::T => [(-1, 0), (0, 0), (1, 0), (0, 1)],
        PieceKind::S => [(-1, 0), (0, 0), (0, 1), (1, 1)],
        PieceKind::Z => [(-1, 1), (0, 1), (0, 0), (1, 0)],
        PieceKind::J => [(-1, 1), (-1, 0), (0, 0), (1, 0)],
        PieceKind::L => [(-1, 0), (0, 0), (1, 0), (1, 1)],
    }
}

/// Get the shape (mino offsets) for a piece kind and rotation
pub fn get_shape(kind: PieceKind, rotation: Rotation) -> PieceShape {
    let mut shape = spawn_shape(kind);
    for _ in 0..rotation.index() {
        for offset in shape.iter_mut() {
            // Quarter turn counter-clockwise about the pivot.
            *offset = (-offset.1, offset.0);
        }
    }
    shape
}

/// Whether an anchor is close enough to the board for its cells to be computed.
///
/// Every shape holds its pivot at `(0, 0)`, so a piece that fits has its anchor
/// on the grid or, while spawning, just above it.
pub fn is_anchor_in_range(x: i8, y: i8) -> bool {
    (-2..BOARD_WIDTH as i8 + 2).contains(&x) && (0..=SPAWN_Y + 2).contains(&y)
}

/// Absolute cells of `kind` in `rotation` anchored at `(x, y)`.
pub fn candidate_cells(kind: PieceKind, rotation: Rotation, x: i8, y: i8) -> PieceCells {
    get_shape(kind, rotation).map(|(dx, dy)| (x + dx, y + dy))
}

/// Every cell inside bounds and free or owned by one of `owners`.
pub fn is_valid_placement(board: &Board, cells: &[(i8, i8)], owners: &[PieceId]) -> bool {
    cells
        .iter()
        .all(|&(x, y)| board.is_inside_bounds(x, y) && board.is_cell_free(x, y, owners))
}

/// Translation that brings out-of-bounds cells back inside the walls and floor.
///
/// Only the largest overflow per axis counts, so two minos past the same wall
/// do not double-correct. `x` is positive when pushing right (left wall
/// overflow) and negative when pushing left; `y` is only ever pushed up.
pub fn units_to_move(cells: &[(i8, i8)]) -> (i8, i8) {
    let max_x = BOARD_WIDTH as i8 - 1;
    let (mut dx, mut dy) = (0i8, 0i8);
    for &(x, y) in cells {
        if x < 0 {
            dx = dx.max(-x);
        } else if x > max_x {
            dx = dx.min(max_x - x);
        }
        if y < 0 {
            dy = dy.max(-y);
        }
    }
    (dx, dy)
}

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tetromino {
    pub id: PieceId,
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl Tetromino {
    pub fn new(id: PieceId, kind: PieceKind, x: i8, y: i8) -> Self {
        Self {
            id,
            kind,
            rotation: Rotation::R0,
            x,
            y,
        }
    }

    pub fn shape(&self) -> PieceShape {
        get_shape(self.kind, self.rotation)
    }

    pub fn cells(&self) -> PieceCells {
        candidate_cells(self.kind, self.rotation, self.x, self.y)
    }

    /// Same piece shifted by `(dx, dy)`.
    pub fn shifted(&self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Valid where it stands, ignoring its own cells.
    pub fn fits(&self, board: &Board) -> bool {
        is_valid_placement(board, &self.cells(), &[self.id])
    }

    /// Any mino above the skyline.
    pub fn is_above_skyline(&self, board: &Board) -> bool {
        let top = board.height() as i8 - 1;
        self.cells().iter().any(|&(_, y)| y > top)
    }
}

/// Try to rotate `piece` on `board`.
///
/// 1. Candidate state at the current anchor; commit if valid.
/// 2. Otherwise compute [`units_to_move`] for the candidate cells. A zero
///    vector means the rotation is blocked.
/// 3. Apply the correction and re-validate against everything but the piece
///    itself; blocked means the whole attempt is abandoned.
///
/// Returns the rotated (and possibly corrected) piece, or `None` when the
/// rotation fails. The caller's piece is never modified.
pub fn try_rotate(board: &Board, piece: &Tetromino) -> Option<Tetromino> {
    let rotation = next_rotation(piece.kind, piece.rotation)?;
    let rotated = Tetromino { rotation, ..*piece };

    if rotated.fits(board) {
        return Some(rotated);
    }

    let (dx, dy) = units_to_move(&rotated.cells());
    if dx == 0 && dy == 0 {
        return None;
    }

    let corrected = rotated.shifted(dx, dy);
    if corrected.fits(board) {
        Some(corrected)
    } else {
        None
    }
}
