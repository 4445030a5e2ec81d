//! Board tests: bounds, ownership, row queries and line clears.

use blockfall::core::{Board, Occupant, PieceId};
use blockfall::types::{PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

const DEBRIS: PieceId = PieceId(0);

fn mino(kind: PieceKind) -> Option<Occupant> {
    Some(Occupant {
        kind,
        owner: DEBRIS,
    })
}

fn fill_row(board: &mut Board, y: i8) {
    for x in 0..BOARD_WIDTH as i8 {
        board.set(x, y, mino(PieceKind::I));
    }
}

#[test]
fn test_board_new_empty() {
    let board = Board::new();
    assert_eq!(board.width(), BOARD_WIDTH);
    assert_eq!(board.height(), BOARD_HEIGHT);

    for y in 0..BOARD_HEIGHT as i8 {
        for x in 0..BOARD_WIDTH as i8 {
            assert!(board.is_cell_free(x, y, &[]), "cell ({}, {}) should be free", x, y);
        }
    }
    assert_eq!(board.occupied().count(), 0);
}

#[test]
fn test_bounds_have_no_ceiling() {
    let board = Board::new();
    assert!(board.is_inside_bounds(0, 0));
    assert!(board.is_inside_bounds(9, 0));
    assert!(board.is_inside_bounds(5, BOARD_HEIGHT as i8 + 3));
    assert!(!board.is_inside_bounds(-1, 0));
    assert!(!board.is_inside_bounds(BOARD_WIDTH as i8, 0));
    assert!(!board.is_inside_bounds(0, -1));
}

#[test]
fn test_set_and_read_back() {
    let mut board = Board::new();
    assert!(board.set(5, 10, mino(PieceKind::T)));
    assert_eq!(board.occupant_at(5, 10).map(|o| o.kind), Some(PieceKind::T));

    assert!(board.set(5, 10, None));
    assert_eq!(board.occupant_at(5, 10), None);

    assert!(!board.set(-1, 0, mino(PieceKind::T)));
    assert!(!board.set(0, BOARD_HEIGHT as i8, mino(PieceKind::T)));
}

#[test]
fn test_cell_free_excludes_listed_owners() {
    let mut board = Board::new();
    board.place_piece(PieceId(7), PieceKind::S, &[(3, 3)]);

    assert!(!board.is_cell_free(3, 3, &[]));
    assert!(!board.is_cell_free(3, 3, &[PieceId(8)]));
    assert!(board.is_cell_free(3, 3, &[PieceId(8), PieceId(7)]));
}

#[test]
fn test_place_piece_moves_previous_cells() {
    let mut board = Board::new();
    let id = PieceId(3);
    board.place_piece(id, PieceKind::O, &[(0, 0), (1, 0), (0, 1), (1, 1)]);
    board.place_piece(id, PieceKind::O, &[(4, 0), (5, 0), (4, 1), (5, 1)]);

    assert_eq!(board.occupant_at(0, 0), None);
    assert_eq!(board.occupant_at(4, 1).map(|o| o.owner), Some(id));
    assert_eq!(board.occupied().count(), 4);
}

#[test]
fn test_place_piece_skips_cells_above_skyline() {
    let mut board = Board::new();
    let top = BOARD_HEIGHT as i8;
    board.place_piece(PieceId(1), PieceKind::I, &[(5, top - 1), (5, top), (5, top + 1), (5, top + 2)]);
    assert_eq!(board.occupied().count(), 1);
    assert!(board.is_cell_free(5, top, &[]));
}

#[test]
fn test_row_full_is_a_pure_query() {
    let mut board = Board::new();
    fill_row(&mut board, 4);
    let before = board.clone();

    assert!(board.is_row_full(4));
    assert!(!board.is_row_full(3));
    assert!(!board.is_row_full(-1));
    assert!(!board.is_row_full(BOARD_HEIGHT as i8));
    assert_eq!(board.count_full_rows(), 1);
    assert_eq!(board, before);
}

#[test]
fn test_clear_row_shifts_rows_above() {
    let mut board = Board::new();
    board.set(0, 0, mino(PieceKind::J));
    fill_row(&mut board, 1);
    board.set(2, 2, mino(PieceKind::T));
    board.set(9, 19, mino(PieceKind::Z));

    board.clear_row(1);

    assert_eq!(board.occupant_at(0, 0).map(|o| o.kind), Some(PieceKind::J));
    assert_eq!(board.occupant_at(2, 1).map(|o| o.kind), Some(PieceKind::T));
    assert_eq!(board.occupant_at(9, 18).map(|o| o.kind), Some(PieceKind::Z));
    assert_eq!(board.occupant_at(9, 19), None);
    assert_eq!(board.occupied().count(), 3);
}

#[test]
fn test_clear_full_rows_rechecks_fallen_row() {
    let mut board = Board::new();
    fill_row(&mut board, 0);
    fill_row(&mut board, 1);
    board.set(3, 2, mino(PieceKind::L));
    fill_row(&mut board, 3);

    assert_eq!(board.clear_full_rows(), 3);
    assert_eq!(board.occupied().count(), 1);
    assert_eq!(board.occupant_at(3, 0).map(|o| o.kind), Some(PieceKind::L));
}

#[test]
fn test_single_full_row_clear_on_otherwise_empty_board() {
    let mut board = Board::new();
    for x in (0..BOARD_WIDTH as i8).step_by(2) {
        board.place_piece(PieceId(x as u32 + 1), PieceKind::O, &[(x, 0), (x + 1, 0)]);
    }

    assert!(board.is_row_full(0));
    assert_eq!(board.clear_full_rows(), 1);
    assert_eq!(board.occupied().count(), 0);
}

#[test]
fn test_write_u8_grid_uses_kind_codes() {
    let mut board = Board::new();
    board.set(2, 0, mino(PieceKind::S));
    let mut grid = [[0u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];
    board.write_u8_grid(&mut grid);
    assert_eq!(grid[0][2], PieceKind::S.code());
    assert_eq!(grid.iter().flatten().filter(|c| **c != 0).count(), 1);
}
