//! Owned, `Copy` views of a game for observers.
//!
//! A snapshot shares nothing with the live [`GameState`](crate::GameState); holders may
//! mutate their copy freely.

use crate::game_state::Piece;
use crate::pieces::Shape;
use crate::types::{Difficulty, Phase, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub shape: Shape,
    pub x: i8,
    pub y: i8,
}

impl ActiveSnapshot {
    /// Board coordinates of every occupied cell, including rows above the board.
    pub fn board_cells(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        self.shape
            .cells()
            .into_iter()
            .map(move |(dx, dy)| (self.x + dx, self.y + dy))
    }
}

impl From<Piece> for ActiveSnapshot {
    fn from(value: Piece) -> Self {
        Self {
            kind: value.kind,
            shape: value.shape,
            x: value.x,
            y: value.y,
        }
    }
}

/// The piece waiting in the preview slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NextSnapshot {
    pub kind: PieceKind,
    pub shape: Shape,
}

impl From<Piece> for NextSnapshot {
    fn from(value: Piece) -> Self {
        Self {
            kind: value.kind,
            shape: value.shape,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameSnapshot {
    /// Locked cells as piece tags, `board[y][x]`, 0 = empty.
    pub board: [[u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
    pub active: Option<ActiveSnapshot>,
    /// Anchor row the active piece would land on if hard-dropped.
    pub ghost_y: Option<i8>,
    pub next: Option<NextSnapshot>,
    pub difficulty: Difficulty,
    pub phase: Phase,
    pub paused: bool,
    pub game_over: bool,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    /// Bumped on every state change; equal revisions mean equal snapshots.
    pub revision: u64,
}

impl GameSnapshot {
    /// Tag of the locked cell at `(x, y)`, 0 when empty or out of range.
    pub fn cell(&self, x: i8, y: i8) -> u8 {
        if x < 0 || y < 0 {
            return 0;
        }
        self.board
            .get(y as usize)
            .and_then(|row| row.get(x as usize))
            .copied()
            .unwrap_or(0)
    }
}
