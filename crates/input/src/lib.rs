//! Terminal input mapping.
//!
//! Maps `crossterm` key events onto [`Command`](crate::types::Command)s. The
//! mapping is phase-aware only where one key means different things: the
//! pause key pauses a running game and resumes a paused one.

pub mod map;

pub use blockfall_types as types;

pub use map::{handle_key_event, should_quit};
