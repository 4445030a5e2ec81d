//! Board module - the occupancy grid
//!
//! The board is a 10x20 grid where each cell is empty or holds an [`Occupant`]:
//! the piece kind (for rendering) plus the id of the piece that owns the mino.
//! Ownership replaces any external scene graph: a piece finds "its own" cells by
//! id, which is how moves, rotations and hold swaps validate against everything
//! except themselves.
//!
//! Coordinates: `x` in 0..10 left to right, `y` grows upwards from the floor
//! (row 0). Cells with `y >= BOARD_HEIGHT` are above the skyline; they are never
//! stored and always read as free.

use crate::types::{PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

const WIDTH: usize = BOARD_WIDTH as usize;
const HEIGHT: usize = BOARD_HEIGHT as usize;

/// Identity of a piece instance. Every spawn gets a fresh id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct PieceId(pub u32);

/// Who occupies a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Occupant {
    pub kind: PieceKind,
    pub owner: PieceId,
}

/// A single board cell
pub type Cell = Option<Occupant>;

/// The game board - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Row-major, row 0 first (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * WIDTH + (x as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// True iff `0 <= x < W` and `y >= 0`.
    ///
    /// There is no upper bound: pieces live above the skyline while spawning.
    pub fn is_inside_bounds(&self, x: i8, y: i8) -> bool {
        x >= 0 && x < BOARD_WIDTH as i8 && y >= 0
    }

    /// Occupant of a cell. Above the skyline and outside the grid read as `None`.
    pub fn occupant_at(&self, x: i8, y: i8) -> Option<Occupant> {
        Self::index(x, y).and_then(|idx| self.cells[idx])
    }

    /// Free if nobody is there, or the occupant belongs to one of `excluding`.
    pub fn is_cell_free(&self, x: i8, y: i8, excluding: &[PieceId]) -> bool {
        match self.occupant_at(x, y) {
            None => true,
            Some(occupant) => excluding.contains(&occupant.owner),
        }
    }

    /// Write a single cell, ignoring coordinates outside the grid.
    /// Returns false if nothing was written.
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Record a piece at `cells`.
    ///
    /// Every cell previously owned by `owner` is cleared first; then each cell
    /// below the skyline is written. Cells above the skyline are not recorded.
    pub fn place_piece(&mut self, owner: PieceId, kind: PieceKind, cells: &[(i8, i8)]) {
        self.remove_piece(owner);
        for &(x, y) in cells {
            if y < BOARD_HEIGHT as i8 {
                self.set(x, y, Some(Occupant { kind, owner }));
            }
        }
    }

    /// Clear every cell owned by `owner`. Returns how many were cleared.
    pub fn remove_piece(&mut self, owner: PieceId) -> usize {
        let mut removed = 0;
        for cell in self.cells.iter_mut() {
            if matches!(cell, Some(o) if o.owner == owner) {
                *cell = None;
                removed += 1;
            }
        }
        removed
    }

    /// True iff all `W` cells of row `y` are occupied. Pure query.
    pub fn is_row_full(&self, y: i8) -> bool {
        if y < 0 || y >= BOARD_HEIGHT as i8 {
            return false;
        }
        let start = (y as usize) * WIDTH;
        self.cells[start..start + WIDTH].iter().all(|c| c.is_some())
    }

    /// Number of full rows currently on the board.
    pub fn count_full_rows(&self) -> usize {
        (0..BOARD_HEIGHT as i8).filter(|&y| self.is_row_full(y)).count()
    }

    /// Empty row `y` and shift every row above it down by one.
    ///
    /// The top row becomes empty. Rows below `y` are untouched.
    pub fn clear_row(&mut self, y: i8) {
        if y < 0 || y >= BOARD_HEIGHT as i8 {
            return;
        }
        let y = y as usize;

        // copy_within handles the overlapping ranges.
        for row in y..HEIGHT - 1 {
            let src = (row + 1) * WIDTH;
            self.cells.copy_within(src..src + WIDTH, row * WIDTH);
        }

        let top = (HEIGHT - 1) * WIDTH;
        self.cells[top..top + WIDTH].fill(None);
    }

    /// Remove every full row, lowest first, and return how many were removed.
    ///
    /// After a clear the same index is examined again, since the row above has
    /// fallen into it.
    pub fn clear_full_rows(&mut self) -> usize {
        let mut cleared = 0;
        let mut y: i8 = 0;
        while y < BOARD_HEIGHT as i8 {
            if self.is_row_full(y) {
                self.clear_row(y);
                cleared += 1;
            } else {
                y += 1;
            }
        }
        cleared
    }

    /// Iterate `(x, y, occupant)` for every occupied cell, bottom row first.
    pub fn occupied(&self) -> impl Iterator<Item = (i8, i8, Occupant)> + '_ {
        self.cells.iter().enumerate().filter_map(|(idx, cell)| {
            cell.map(|o| ((idx % WIDTH) as i8, (idx / WIDTH) as i8, o))
        })
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Write kind codes into a grid (row 0 = floor, 0 = empty).
    pub fn write_u8_grid(&self, out: &mut [[u8; WIDTH]; HEIGHT]) {
        for (y, row) in out.iter_mut().enumerate() {
            for (x, slot) in row.iter_mut().enumerate() {
                *slot = self.cells[y * WIDTH + x].map_or(0, |o| o.kind.code());
            }
        }
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEBRIS: PieceId = PieceId(0);

    fn fill_row(board: &mut Board, y: i8, kind: PieceKind) {
        for x in 0..BOARD_WIDTH as i8 {
            board.set(x, y, Some(Occupant { kind, owner: DEBRIS }));
        }
    }

    #[test]
    fn test_board_index_calculation() {
        assert_eq!(Board::index(0, 0), Some(0));
        assert_eq!(Board::index(9, 0), Some(9));
        assert_eq!(Board::index(0, 1), Some(10));
        assert_eq!(Board::index(9, 19), Some(199));
        assert_eq!(Board::index(-1, 0), None);
        assert_eq!(Board::index(10, 0), None);
        assert_eq!(Board::index(0, 20), None);
    }

    #[test]
    fn test_above_skyline_reads_free() {
        let board = Board::new();
        assert!(board.is_inside_bounds(4, 25));
        assert_eq!(board.occupant_at(4, 25), None);
        assert!(board.is_cell_free(4, 25, &[]));
    }

    #[test]
    fn test_place_piece_moves_previous_cells() {
        let mut board = Board::new();
        let id = PieceId(7);
        board.place_piece(id, PieceKind::O, &[(0, 0), (1, 0), (0, 1), (1, 1)]);
        board.place_piece(id, PieceKind::O, &[(1, 0), (2, 0), (1, 1), (2, 1)]);

        assert_eq!(board.occupant_at(0, 0), None);
        assert_eq!(board.occupant_at(0, 1), None);
        assert_eq!(board.occupied().count(), 4);
    }

    #[test]
    fn test_place_piece_skips_cells_above_skyline() {
        let mut board = Board::new();
        board.place_piece(PieceId(3), PieceKind::I, &[(4, 19), (4, 20), (4, 21), (4, 22)]);
        assert_eq!(board.occupied().count(), 1);
    }

    #[test]
    fn test_clear_row_shifts_rows_above() {
        let mut board = Board::new();
        fill_row(&mut board, 3, PieceKind::I);
        board.set(2, 4, Some(Occupant { kind: PieceKind::T, owner: DEBRIS }));
        board.set(5, 1, Some(Occupant { kind: PieceKind::L, owner: DEBRIS }));

        board.clear_row(3);

        assert_eq!(board.occupant_at(2, 3).map(|o| o.kind), Some(PieceKind::T));
        assert_eq!(board.occupant_at(2, 4), None);
        assert_eq!(board.occupant_at(5, 1).map(|o| o.kind), Some(PieceKind::L));
        assert!(!board.is_row_full(3));
    }

    #[test]
    fn test_clear_full_rows_reexamines_shifted_row() {
        let mut board = Board::new();
        fill_row(&mut board, 0, PieceKind::I);
        fill_row(&mut board, 1, PieceKind::J);
        board.set(0, 2, Some(Occupant { kind: PieceKind::S, owner: DEBRIS }));

        assert_eq!(board.count_full_rows(), 2);
        assert_eq!(board.clear_full_rows(), 2);
        assert_eq!(board.occupant_at(0, 0).map(|o| o.kind), Some(PieceKind::S));
        assert_eq!(board.occupied().count(), 1);
    }

    #[test]
    fn test_write_u8_grid_uses_kind_codes() {
        let mut board = Board::new();
        board.set(9, 19, Some(Occupant { kind: PieceKind::L, owner: DEBRIS }));
        let mut grid = [[0u8; WIDTH]; HEIGHT];
        board.write_u8_grid(&mut grid);
        assert_eq!(grid[19][9], PieceKind::L.code());
        assert_eq!(grid[0][0], 0);
    }
}
