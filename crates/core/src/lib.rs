//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the rules of the game and nothing else: no timers, no I/O,
//! no rendering. Every operation is a synchronous method on [`GameState`] that
//! either applies completely or is rejected with `false`.
//!
//! # Module Structure
//!
//! - [`board`]: 10x20 grid with collision testing, placement and line clearing
//! - [`pieces`]: the seven tetromino matrices and the clockwise rotation transform
//! - [`rng`]: seeded piece generation (uniform or 7-bag)
//! - [`scoring`]: line-clear points, level derivation and the gravity curve
//! - [`game_state`]: the state machine tying the above together
//! - [`snapshot`]: owned copies of the state for observers
//!
//! # Example
//!
//! ```
//! use blockfall_core::{GameState, Randomizer};
//! use blockfall_types::{Command, Difficulty, Phase};
//!
//! let mut game = GameState::new(Difficulty::Easy, 12345, Randomizer::Uniform);
//! assert!(game.apply(Command::Start));
//!
//! game.apply(Command::MoveRight);
//! game.apply(Command::Rotate);
//! assert!(game.apply(Command::HardDrop));
//!
//! let event = game.take_last_event().unwrap();
//! assert_eq!(event.lines_cleared, 0);
//! assert_eq!(game.phase(), Phase::Running);
//! ```
//!
//! Gravity is not driven here. Callers issue [`Command::MoveDown`](types::Command::MoveDown)
//! every [`GameState::drop_interval_ms`](game_state::GameState::drop_interval_ms).

pub mod board;
pub mod game_state;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use blockfall_types as types;

pub use board::Board;
pub use game_state::{GameState, LockEvent, Piece};
pub use pieces::{canonical_shape, get_shape, Shape};
pub use rng::{PieceGenerator, Randomizer, SimpleRng};
pub use scoring::{drop_interval_ms, level_for_lines, line_clear_score};
pub use snapshot::{ActiveSnapshot, GameSnapshot, NextSnapshot};
