//! Board module - manages the game grid
//!
//! The board is a 10x20 grid where each cell is empty or holds the kind of the
//! piece that was locked there. Storage is a flat row-major array, so the board
//! never allocates and its dimensions can never change.
//!
//! Coordinates: `(x, y)` where x ranges 0..9 (left to right) and y ranges 0..19
//! (top to bottom). Rows with `y < 0` lie above the visible board; shapes may
//! occupy them while spawning.

use crate::pieces::Shape;
use crate::types::{Cell, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

const WIDTH: usize = BOARD_WIDTH as usize;

/// The game board - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
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

    /// Get cell at position (x, y). Returns None if out of bounds.
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y). Returns false if out of bounds.
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is inside the board and filled
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Whether a single cell would be illegal for a piece.
    ///
    /// Horizontal bounds and the floor always apply. Rows above the board are
    /// exempt from the overlap check so pieces can spawn partially off the top.
    #[inline]
    pub fn blocks(&self, x: i8, y: i8) -> bool {
        if x < 0 || x >= BOARD_WIDTH as i8 || y >= BOARD_HEIGHT as i8 {
            return true;
        }
        y >= 0 && self.is_occupied(x, y)
    }

    /// True if any occupied cell of `shape` anchored at `(x, y)` is out of the
    /// horizontal bounds, below the floor, or overlaps a filled cell.
    pub fn collides(&self, shape: &Shape, x: i8, y: i8) -> bool {
        shape
            .cells()
            .iter()
            .any(|&(dx, dy)| self.blocks(x + dx, y + dy))
    }

    /// Write `kind` into every occupied cell of `shape` anchored at `(x, y)`.
    ///
    /// No validation: callers check [`Board::collides`] first. Cells above the
    /// board are dropped.
    pub fn place(&mut self, shape: &Shape, x: i8, y: i8, kind: PieceKind) {
        for (dx, dy) in shape.cells() {
            let (px, py) = (x + dx, y + dy);
            if py < 0 {
                continue;
            }
            debug_assert!(Self::index(px, py).is_some(), "placing outside the board");
            self.set(px, py, Some(kind));
        }
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= BOARD_HEIGHT as usize {
            return false;
        }
        let start = y * WIDTH;
        self.cells[start..start + WIDTH].iter().all(|cell| cell.is_some())
    }

    /// Remove row `y`, shift every row above it down by one and insert an empty
    /// row at the top.
    fn remove_row(&mut self, y: usize) {
        // copy_within handles the overlapping ranges.
        self.cells.copy_within(0..y * WIDTH, WIDTH);
        self.cells[..WIDTH].fill(None);
    }

    /// Remove every full row and return how many were removed.
    ///
    /// Scans bottom to top. After a removal the same index is examined again,
    /// since the row that just shifted into it may also be full.
    pub fn clear_full_rows(&mut self) -> u32 {
        let mut cleared = 0;
        let mut y = BOARD_HEIGHT as usize;
        while y > 0 {
            if self.is_row_full(y - 1) {
                self.remove_row(y - 1);
                cleared += 1;
            } else {
                y -= 1;
            }
        }
        cleared
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Iterate rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks_exact(WIDTH)
    }

    /// Number of filled cells on the board.
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Encode cells as snapshot tags (0 = empty).
    pub fn write_u8_grid(&self, out: &mut [[u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize]) {
        for (dst, src) in out.iter_mut().zip(self.rows()) {
            for (d, s) in dst.iter_mut().zip(src) {
                *d = s.map_or(0, PieceKind::tag);
            }
        }
    }

    /// Build a board from text rows, top-aligned to the bottom of the board.
    ///
    /// `#` marks a filled cell (tagged as `I`), anything else is empty. Handy for
    /// setting up positions in tests and benches.
    pub fn from_ascii(rows: &[&str]) -> Self {
        let mut board = Self::new();
        let top = BOARD_HEIGHT as usize - rows.len().min(BOARD_HEIGHT as usize);
        for (i, row) in rows.iter().take(BOARD_HEIGHT as usize).enumerate() {
            for (x, ch) in row.chars().take(WIDTH).enumerate() {
                if ch == '#' {
                    board.set(x as i8, (top + i) as i8, Some(PieceKind::I));
                }
            }
        }
        board
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
    use crate::pieces::canonical_shape;

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
    fn rows_above_board_only_check_walls() {
        let board = Board::new();
        assert!(!board.blocks(0, -3));
        assert!(board.blocks(-1, -3));
        assert!(board.blocks(10, -1));
        assert!(board.blocks(0, 20));
    }

    #[test]
    fn place_drops_cells_above_the_board() {
        let mut board = Board::new();
        let o = canonical_shape(PieceKind::O);
        board.place(&o, 4, -1, PieceKind::O);
        assert_eq!(board.filled_count(), 2);
        assert!(board.is_occupied(4, 0));
        assert!(board.is_occupied(5, 0));
    }

    #[test]
    fn clear_rescans_after_shift() {
        // Two adjacent full rows with a partial row above them.
        let mut board = Board::from_ascii(&["#.........", "##########", "##########"]);
        assert_eq!(board.clear_full_rows(), 2);
        assert!(board.is_occupied(0, 19));
        assert_eq!(board.filled_count(), 1);
    }

    #[test]
    fn write_u8_grid_uses_piece_tags() {
        let mut board = Board::new();
        board.set(2, 19, Some(PieceKind::L));
        let mut grid = [[0u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];
        board.write_u8_grid(&mut grid);
        assert_eq!(grid[19][2], PieceKind::L.tag());
        assert_eq!(grid[0][0], 0);
    }
}
