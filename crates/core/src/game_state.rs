//! Game state module - the authoritative state machine
//!
//! Ties together the board, piece catalog, generator and scoring. Every mutation
//! is a synchronous method returning whether it was applied; rejected commands
//! leave the state untouched.
//!
//! Lifecycle: `Ready` → `Running` ⇄ `Paused`, `Running` → `GameOver`.
//! `reset` returns any phase to a fresh `Ready` game.

use crate::board::Board;
use crate::pieces::{canonical_shape, Shape};
use crate::rng::{PieceGenerator, Randomizer};
use crate::scoring::{drop_interval_ms, level_for_lines, line_clear_score};
use crate::snapshot::{ActiveSnapshot, GameSnapshot, NextSnapshot};
use crate::types::{Command, Difficulty, DifficultyConfig, Phase, PieceKind};

/// A tetromino with its current orientation and anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub shape: Shape,
    pub x: i8,
    pub y: i8,
}

impl Piece {
    /// A piece of `kind` in spawn orientation at its spawn anchor.
    pub fn spawn(kind: PieceKind) -> Self {
        let shape = canonical_shape(kind);
        let (x, y) = shape.spawn_anchor();
        Self { kind, shape, x, y }
    }

    pub fn collides(&self, board: &Board) -> bool {
        board.collides(&self.shape, self.x, self.y)
    }

    fn shifted(self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }
}

/// Outcome of a lock-in, retrievable once through [`GameState::take_last_event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LockEvent {
    pub lines_cleared: u32,
    /// Points awarded for the cleared lines.
    pub points: u32,
    /// Level after the lock-in.
    pub level: u32,
    pub level_changed: bool,
    /// The next piece could not spawn.
    pub game_over: bool,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    current: Option<Piece>,
    next: Piece,
    generator: PieceGenerator,
    difficulty: Difficulty,
    config: DifficultyConfig,
    phase: Phase,
    score: u32,
    level: u32,
    lines: u32,
    /// Last lock-in outcome (consumed by observers).
    last_event: Option<LockEvent>,
    revision: u64,
}

impl GameState {
    /// Create a `Ready` game with an empty board.
    pub fn new(difficulty: Difficulty, seed: u32, randomizer: Randomizer) -> Self {
        Self::with_generator(
            difficulty,
            Board::new(),
            PieceGenerator::new(seed, randomizer),
        )
    }

    /// Create a `Ready` game on a prepared board, drawing pieces from `generator`.
    pub fn with_generator(
        difficulty: Difficulty,
        board: Board,
        mut generator: PieceGenerator,
    ) -> Self {
        let current = Piece::spawn(generator.draw());
        let next = Piece::spawn(generator.draw());
        Self {
            board,
            current: Some(current),
            next,
            generator,
            difficulty,
            config: difficulty.config(),
            phase: Phase::Ready,
            score: 0,
            level: 1,
            lines: 0,
            last_event: None,
            revision: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn paused(&self) -> bool {
        self.phase == Phase::Paused
    }

    pub fn game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn randomizer(&self) -> Randomizer {
        self.generator.randomizer()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn current(&self) -> Option<Piece> {
        self.current
    }

    pub fn next(&self) -> Piece {
        self.next
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Gravity interval for the current level and difficulty.
    pub fn drop_interval_ms(&self) -> u32 {
        drop_interval_ms(self.level, &self.config)
    }

    fn touch(&mut self) -> bool {
        self.revision = self.revision.wrapping_add(1);
        true
    }

    /// Begin play. Only accepted from `Ready`.
    pub fn start(&mut self) -> bool {
        if self.phase != Phase::Ready {
            return false;
        }
        self.phase = Phase::Running;
        self.touch()
    }

    /// Suspend play. Pausing twice is a no-op.
    pub fn pause(&mut self) -> bool {
        if self.phase != Phase::Running {
            return false;
        }
        self.phase = Phase::Paused;
        self.touch()
    }

    pub fn resume(&mut self) -> bool {
        if self.phase != Phase::Paused {
            return false;
        }
        self.phase = Phase::Running;
        self.touch()
    }

    /// Discard the board, score and pieces and return to `Ready`.
    ///
    /// Difficulty and randomizer are kept. The generator keeps advancing, so a
    /// reset deals new pieces rather than replaying the previous game.
    pub fn reset(&mut self) -> bool {
        let revision = self.revision;
        let generator = std::mem::take(&mut self.generator);
        *self = Self::with_generator(self.difficulty, Board::new(), generator);
        self.revision = revision;
        self.touch()
    }

    /// Try to move the current piece. Never locks.
    fn try_move(&mut self, dx: i8, dy: i8) -> bool {
        if self.phase != Phase::Running {
            return false;
        }
        let Some(current) = self.current else {
            return false;
        };
        let candidate = current.shifted(dx, dy);
        if candidate.collides(&self.board) {
            return false;
        }
        self.current = Some(candidate);
        self.touch()
    }

    pub fn move_left(&mut self) -> bool {
        self.try_move(-1, 0)
    }

    pub fn move_right(&mut self) -> bool {
        self.try_move(1, 0)
    }

    /// Move the current piece down one row, locking it in when it cannot move.
    ///
    /// Returns true whenever the state changed (moved or locked).
    pub fn move_down(&mut self) -> bool {
        if self.phase != Phase::Running || self.current.is_none() {
            return false;
        }
        if self.try_move(0, 1) {
            return true;
        }
        self.lock_in();
        true
    }

    /// Drop to the lowest legal row and lock in once.
    pub fn hard_drop(&mut self) -> bool {
        if self.phase != Phase::Running {
            return false;
        }
        let Some(mut piece) = self.current else {
            return false;
        };
        while !piece.shifted(0, 1).collides(&self.board) {
            piece = piece.shifted(0, 1);
        }
        self.current = Some(piece);
        self.lock_in();
        true
    }

    /// Rotate clockwise in place. A colliding rotation is rejected.
    pub fn rotate(&mut self) -> bool {
        if self.phase != Phase::Running {
            return false;
        }
        let Some(current) = self.current else {
            return false;
        };
        let rotated = Piece {
            shape: current.shape.rotate_cw(),
            ..current
        };
        if rotated.collides(&self.board) {
            return false;
        }
        self.current = Some(rotated);
        self.touch()
    }

    /// Write the current piece into the board, clear lines, score, and spawn
    /// the next piece (or end the game).
    fn lock_in(&mut self) {
        let Some(piece) = self.current.take() else {
            return;
        };
        debug_assert!(
            !piece.collides(&self.board),
            "locking a piece that overlaps the stack"
        );
        self.board.place(&piece.shape, piece.x, piece.y, piece.kind);

        let lines_cleared = self.board.clear_full_rows();
        // Points use the level in effect before this clear.
        let points = line_clear_score(lines_cleared, self.level, &self.config);
        self.score = self.score.saturating_add(points);
        self.lines += lines_cleared;

        let previous_level = self.level;
        self.level = self.level.max(level_for_lines(self.lines, &self.config));

        let spawned = std::mem::replace(&mut self.next, Piece::spawn(self.generator.draw()));
        let game_over = spawned.collides(&self.board);
        if game_over {
            self.phase = Phase::GameOver;
        } else {
            self.current = Some(spawned);
        }

        self.last_event = Some(LockEvent {
            lines_cleared,
            points,
            level: self.level,
            level_changed: self.level != previous_level,
            game_over,
        });
        self.touch();
    }

    /// Take and clear the last lock-in event.
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    /// Anchor row the current piece would land on if hard-dropped.
    pub fn ghost_y(&self) -> Option<i8> {
        let mut piece = self.current?;
        while !piece.shifted(0, 1).collides(&self.board) {
            piece = piece.shifted(0, 1);
        }
        Some(piece.y)
    }

    /// Apply a command. Returns whether it changed the state.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::MoveLeft => self.move_left(),
            Command::MoveRight => self.move_right(),
            Command::MoveDown => self.move_down(),
            Command::Rotate => self.rotate(),
            Command::HardDrop => self.hard_drop(),
            Command::Pause => self.pause(),
            Command::Resume => self.resume(),
            Command::Start => self.start(),
            Command::Reset => self.reset(),
        }
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_u8_grid(&mut out.board);

        out.active = self.current.map(ActiveSnapshot::from);
        out.ghost_y = self.ghost_y();
        out.next = Some(NextSnapshot::from(self.next));
        out.difficulty = self.difficulty;
        out.phase = self.phase;
        out.paused = self.paused();
        out.game_over = self.game_over();
        out.score = self.score;
        out.level = self.level;
        out.lines = self.lines;
        out.revision = self.revision;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Difficulty::default(), 1, Randomizer::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scripted(kinds: &[PieceKind], board: Board) -> GameState {
        let mut state = GameState::with_generator(
            Difficulty::Easy,
            board,
            PieceGenerator::sequence(kinds),
        );
        assert!(state.start());
        state
    }

    #[test]
    fn new_game_is_ready_with_two_pieces() {
        let state = GameState::new(Difficulty::Medium, 7, Randomizer::Uniform);
        assert_eq!(state.phase(), Phase::Ready);
        assert!(state.current().is_some());
        assert_eq!(state.level(), 1);
        assert_eq!(state.score(), 0);
        assert_eq!(state.board().filled_count(), 0);
    }

    #[test]
    fn piece_commands_rejected_until_started() {
        let mut state = GameState::default();
        let before = state.snapshot();
        assert!(!state.move_left());
        assert!(!state.move_down());
        assert!(!state.hard_drop());
        assert!(!state.rotate());
        assert_eq!(state.snapshot(), before);
    }

    #[test]
    fn start_only_from_ready() {
        let mut state = GameState::default();
        assert!(state.start());
        assert!(!state.start());
        assert!(state.pause());
        assert!(!state.start());
    }

    #[test]
    fn pause_twice_is_same_as_once() {
        let mut state = GameState::default();
        state.start();
        assert!(state.pause());
        let once = state.snapshot();
        assert!(!state.pause());
        assert_eq!(state.snapshot(), once);
        assert!(state.resume());
        assert!(!state.resume());
        assert!(state.is_running());
    }

    #[test]
    fn moves_stop_at_walls() {
        let mut state = scripted(&[PieceKind::I], Board::new());
        // I spawns at x = 3 and is four wide.
        assert!(state.move_left());
        assert!(state.move_left());
        assert!(state.move_left());
        assert!(!state.move_left());
        assert_eq!(state.current().map(|p| p.x), Some(0));

        for _ in 0..6 {
            assert!(state.move_right());
        }
        assert!(!state.move_right());
        assert_eq!(state.current().map(|p| p.x), Some(6));
    }

    #[test]
    fn hard_drop_i_lands_on_bottom_row_without_clearing() {
        let mut state = scripted(&[PieceKind::I, PieceKind::O], Board::new());
        assert!(state.hard_drop());
        let event = state.take_last_event().expect("lock event");
        assert_eq!(event.lines_cleared, 0);
        assert_eq!(event.points, 0);
        assert!(!event.game_over);
        for x in 3..7 {
            assert!(state.board().is_occupied(x, 19));
        }
        assert_eq!(state.board().filled_count(), 4);
        assert_eq!(state.current().map(|p| p.kind), Some(PieceKind::O));
        assert!(state.take_last_event().is_none());
    }

    #[test]
    fn filling_the_gap_clears_one_line_and_shifts() {
        // Bottom row missing only column 0, one marker cell above it.
        let board = Board::from_ascii(&[".....#....", ".#########"]);
        let mut state = scripted(&[PieceKind::I, PieceKind::O], board);
        // Stand the I up in column 0.
        assert!(state.rotate());
        while state.move_left() {}
        assert_eq!(state.current().map(|p| p.x), Some(0));
        assert!(state.hard_drop());

        let event = state.take_last_event().expect("lock event");
        assert_eq!(event.lines_cleared, 1);
        assert_eq!(event.points, 40);
        assert_eq!(state.lines(), 1);
        assert_eq!(state.score(), 40);
        // Marker moved from row 18 to row 19, the I's top three cells now sit in column 0.
        assert!(state.board().is_occupied(5, 19));
        assert!(state.board().is_occupied(0, 19));
        assert!(state.board().is_occupied(0, 17));
        assert!(!state.board().is_occupied(0, 16));
        assert_eq!(state.board().filled_count(), 4);
    }

    #[test]
    fn rotation_rejected_when_blocked() {
        let mut state = scripted(&[PieceKind::I], Board::new());
        while state.move_down() && state.current().map(|p| p.y) != Some(19) {}
        // Lying flat on the floor, a vertical I would poke below the board.
        let before = state.current();
        assert!(!state.rotate());
        assert_eq!(state.current(), before);
    }

    #[test]
    fn four_rotations_return_to_spawn_shape() {
        let mut state = scripted(&[PieceKind::T], Board::new());
        for _ in 0..3 {
            assert!(state.move_down());
        }
        let start = state.current();
        for _ in 0..4 {
            assert!(state.rotate());
        }
        assert_eq!(state.current(), start);
    }

    #[test]
    fn blocked_spawn_ends_the_game_and_freezes_state() {
        let rows = ["#########."; 19];
        let mut state = scripted(&[PieceKind::O], Board::from_ascii(&rows));
        assert!(state.move_down());
        let event = state.take_last_event().expect("lock event");
        assert!(event.game_over);
        assert_eq!(state.phase(), Phase::GameOver);
        assert!(state.current().is_none());

        let frozen = state.snapshot();
        for command in [
            Command::MoveLeft,
            Command::MoveRight,
            Command::MoveDown,
            Command::Rotate,
            Command::HardDrop,
            Command::Pause,
            Command::Resume,
            Command::Start,
        ] {
            assert!(!state.apply(command), "{command:?} accepted after game over");
        }
        assert_eq!(state.snapshot(), frozen);

        assert!(state.apply(Command::Reset));
        assert_eq!(state.phase(), Phase::Ready);
        assert_eq!(state.board().filled_count(), 0);
        assert!(state.current().is_some());
    }

    #[test]
    fn reset_keeps_difficulty_and_clears_progress() {
        let mut state = GameState::new(Difficulty::Hard, 3, Randomizer::Bag);
        state.start();
        state.hard_drop();
        assert!(state.reset());
        assert_eq!(state.difficulty(), Difficulty::Hard);
        assert_eq!(state.randomizer(), Randomizer::Bag);
        assert_eq!(state.phase(), Phase::Ready);
        assert_eq!(state.score(), 0);
        assert_eq!(state.lines(), 0);
        assert_eq!(state.level(), 1);
        assert!(state.take_last_event().is_none());
    }

    #[test]
    fn level_rises_with_cleared_lines() {
        let mut cleared = 0;
        let mut state = scripted(&[PieceKind::I], Board::new());
        // Clear ten single lines on easy by pre-filling the row under each drop.
        for _ in 0..10 {
            let mut board = state.board().clone();
            for x in 0..10 {
                if !(3..7).contains(&x) {
                    board.set(x, 19, Some(PieceKind::T));
                }
            }
            state.board = board;
            assert!(state.hard_drop());
            let event = state.take_last_event().expect("lock event");
            cleared += event.lines_cleared;
        }
        assert_eq!(cleared, 10);
        assert_eq!(state.lines(), 10);
        assert_eq!(state.level(), 2);
        assert_eq!(state.drop_interval_ms(), 750);
    }

    #[test]
    fn snapshot_is_detached_copy() {
        let mut state = scripted(&[PieceKind::L], Board::new());
        let mut snap = state.snapshot();
        snap.board[19][0] = 9;
        snap.score = 1_000_000;
        assert!(!state.board().is_occupied(0, 19));
        assert_eq!(state.score(), 0);

        assert!(state.move_down());
        assert_ne!(state.snapshot().revision, snap.revision);
    }

    #[test]
    fn ghost_row_matches_hard_drop() {
        let mut state = scripted(&[PieceKind::T, PieceKind::I], Board::new());
        let ghost = state.ghost_y().expect("ghost");
        // T spawns with its lowest row at board row 0, anchor y = -1.
        assert_eq!(ghost, 18);
        let snap = state.snapshot();
        assert_eq!(snap.ghost_y, Some(18));
        assert_eq!(snap.next.map(|n| n.kind), Some(PieceKind::I));
    }

    #[test]
    fn snapshot_cell_reads_locked_tags() {
        let mut state = scripted(&[PieceKind::O], Board::new());
        assert!(state.hard_drop());
        let snap = state.snapshot();
        assert_eq!(snap.cell(4, 19), PieceKind::O.tag());
        assert_eq!(snap.cell(5, 18), PieceKind::O.tag());
        assert_eq!(snap.cell(0, 19), 0);
        assert_eq!(snap.cell(-1, 19), 0);
        assert_eq!(snap.cell(4, 20), 0);
    }
}
