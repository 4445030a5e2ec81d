//! Resting-position search shared by the ghost preview and hard drop.
//!
//! The search walks up from the floor and takes the first row where the piece
//! fits and nothing sits above any of its minos. It never looks above the
//! piece's current row, so the ghost can't render above the real piece.

use crate::board::Board;
use crate::pieces::Tetromino;

/// Every column above each mino of `piece` is free up to the top row.
pub fn is_sky_clear(board: &Board, piece: &Tetromino) -> bool {
    let top = board.height() as i8;
    piece.cells().iter().all(|&(x, y)| {
        ((y + 1)..top).all(|above| board.is_cell_free(x, above, &[piece.id]))
    })
}

/// Anchor row where `piece` would come to rest if dropped straight down.
///
/// Falls back to the piece's current row when no lower row qualifies.
pub fn resting_y(board: &Board, piece: &Tetromino) -> i8 {
    (0..=piece.y)
        .map(|y| Tetromino { y, ..*piece })
        .find(|candidate| candidate.fits(board) && is_sky_clear(board, candidate))
        .map_or(piece.y, |candidate| candidate.y)
}

/// `piece` moved to its resting row.
pub fn project(board: &Board, piece: &Tetromino) -> Tetromino {
    Tetromino {
        y: resting_y(board, piece),
        ..*piece
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Occupant, PieceId};
    use crate::types::PieceKind;

    fn debris(board: &mut Board, x: i8, y: i8) {
        board.set(x, y, Some(Occupant { kind: PieceKind::I, owner: PieceId(0) }));
    }

    #[test]
    fn test_empty_board_rests_on_floor() {
        let board = Board::new();
        let piece = Tetromino::new(PieceId(1), PieceKind::O, 4, 20);
        assert_eq!(resting_y(&board, &piece), 0);
    }

    #[test]
    fn test_rests_on_top_of_stack() {
        let mut board = Board::new();
        for y in 0..3 {
            debris(&mut board, 4, y);
        }
        let piece = Tetromino::new(PieceId(1), PieceKind::O, 4, 20);
        assert_eq!(resting_y(&board, &piece), 3);
    }

    #[test]
    fn test_ignores_own_cells() {
        let mut board = Board::new();
        let piece = Tetromino::new(PieceId(1), PieceKind::T, 4, 10);
        board.place_piece(piece.id, piece.kind, &piece.cells());
        assert_eq!(resting_y(&board, &piece), 0);
    }

    #[test]
    fn test_does_not_tunnel_under_overhang() {
        let mut board = Board::new();
        // Roof over an empty pocket at (4..6, 0..2).
        debris(&mut board, 4, 3);
        let piece = Tetromino::new(PieceId(1), PieceKind::O, 4, 15);
        assert_eq!(resting_y(&board, &piece), 4);
    }

    #[test]
    fn test_never_above_current_row() {
        let mut board = Board::new();
        for y in 0..6 {
            debris(&mut board, 5, y);
        }
        // Overlaps the column everywhere below: stays put.
        let blocked = Tetromino::new(PieceId(1), PieceKind::O, 4, 3);
        assert_eq!(resting_y(&board, &blocked), 3);
    }
}
