//! Terminal rendering for the game.
//!
//! Snapshots are drawn into a plain framebuffer by [`GameView`] (pure, testable),
//! and [`Screen`] flushes framebuffers to the terminal, sending only what changed.
//! Board cells are two columns wide to compensate for the glyph aspect ratio.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use blockfall_core as core;
pub use blockfall_types as types;

pub use fb::{FrameBuffer, Glyph, Rgb, Style};
pub use game_view::{GameView, Viewport};
pub use renderer::{changed_runs, encode_diff_into, encode_full_into, Screen};
