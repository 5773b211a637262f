//! Pieces module - tetromino catalog and the clockwise rotation transform
//!
//! Every piece is an occupancy matrix of at most 4x4 cells. Only the spawn
//! orientation is stored; other orientations are derived with [`Shape::rotate_cw`],
//! which maps input cell `(i, j)` of an `R x C` matrix to output cell `(j, R-1-i)`
//! of a `C x R` matrix. Four rotations give back the starting matrix.

use arrayvec::ArrayVec;

use crate::types::{PieceKind, BOARD_WIDTH};

/// Largest matrix side supported by [`Shape`].
pub const MAX_SHAPE_SIDE: u8 = 4;

/// Offset of a single occupied cell relative to the piece anchor: `(dx, dy)`.
pub type CellOffset = (i8, i8);

/// Occupied offsets of a shape, top-to-bottom then left-to-right.
pub type ShapeCells = ArrayVec<CellOffset, 16>;

/// Rectangular occupancy matrix, stored as a row-major bitset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    rows: u8,
    cols: u8,
    bits: u16,
}

impl Shape {
    /// Build a shape from rows of `0`/`1`.
    ///
    /// Panics if the matrix is empty, ragged, or larger than 4x4. Shapes come from
    /// the static catalog, so this is a programming error rather than input error.
    pub fn from_rows(rows: &[&[u8]]) -> Self {
        let r = rows.len();
        assert!(r > 0 && r <= MAX_SHAPE_SIDE as usize, "shape height out of range");
        let c = rows[0].len();
        assert!(c > 0 && c <= MAX_SHAPE_SIDE as usize, "shape width out of range");

        let mut shape = Shape {
            rows: r as u8,
            cols: c as u8,
            bits: 0,
        };
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), c, "ragged shape matrix");
            for (j, &v) in row.iter().enumerate() {
                if v != 0 {
                    shape.set(i as u8, j as u8);
                }
            }
        }
        shape
    }

    #[inline(always)]
    fn bit(row: u8, col: u8) -> u16 {
        1 << (row * MAX_SHAPE_SIDE + col)
    }

    fn set(&mut self, row: u8, col: u8) {
        self.bits |= Self::bit(row, col);
    }

    /// Number of matrix rows.
    pub fn rows(&self) -> u8 {
        self.rows
    }

    /// Number of matrix columns.
    pub fn cols(&self) -> u8 {
        self.cols
    }

    /// Whether matrix cell `(row, col)` is occupied. Out-of-range cells are empty.
    pub fn is_filled(&self, row: u8, col: u8) -> bool {
        row < self.rows && col < self.cols && self.bits & Self::bit(row, col) != 0
    }

    /// Occupied cells as `(dx, dy)` offsets from the anchor.
    pub fn cells(&self) -> ShapeCells {
        let mut out = ShapeCells::new();
        for row in 0..self.rows {
            for col in 0..self.cols {
                if self.is_filled(row, col) {
                    out.push((col as i8, row as i8));
                }
            }
        }
        out
    }

    pub fn cell_count(&self) -> u32 {
        self.bits.count_ones()
    }

    /// Index of the lowest matrix row holding an occupied cell.
    pub fn lowest_filled_row(&self) -> u8 {
        (0..self.rows)
            .rev()
            .find(|&row| (0..self.cols).any(|col| self.is_filled(row, col)))
            .unwrap_or(0)
    }

    /// Rotate the whole matrix 90° clockwise.
    pub fn rotate_cw(&self) -> Shape {
        let mut out = Shape {
            rows: self.cols,
            cols: self.rows,
            bits: 0,
        };
        for i in 0..self.rows {
            for j in 0..self.cols {
                if self.is_filled(i, j) {
                    out.set(j, self.rows - 1 - i);
                }
            }
        }
        out
    }

    /// Anchor that centers the shape horizontally and puts its lowest occupied
    /// row on board row 0. Rows above it hang off the top of the board.
    pub fn spawn_anchor(&self) -> (i8, i8) {
        let x = (BOARD_WIDTH.saturating_sub(self.cols) / 2) as i8;
        let y = -(self.lowest_filled_row() as i8);
        (x, y)
    }
}

/// Spawn-orientation matrix for a piece kind.
pub fn canonical_shape(kind: PieceKind) -> Shape {
    match kind {
        PieceKind::I => Shape::from_rows(&[&[1, 1, 1, 1]]),
        PieceKind::O => Shape::from_rows(&[&[1, 1], &[1, 1]]),
        PieceKind::T => Shape::from_rows(&[&[0, 1, 0], &[1, 1, 1]]),
        PieceKind::S => Shape::from_rows(&[&[0, 1, 1], &[1, 1, 0]]),
        PieceKind::Z => Shape::from_rows(&[&[1, 1, 0], &[0, 1, 1]]),
        PieceKind::J => Shape::from_rows(&[&[1, 0, 0], &[1, 1, 1]]),
        PieceKind::L => Shape::from_rows(&[&[0, 0, 1], &[1, 1, 1]]),
    }
}

/// Shape after `turns` clockwise rotations from the spawn orientation.
pub fn get_shape(kind: PieceKind, turns: u8) -> Shape {
    let mut shape = canonical_shape(kind);
    for _ in 0..turns % 4 {
        shape = shape.rotate_cw();
    }
    shape
}
