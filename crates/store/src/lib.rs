//! Durable best-score lists keyed by difficulty.
//!
//! ```no_run
//! use blockfall_store::{ScoreEntry, ScoreStore};
//! use blockfall_types::Difficulty;
//!
//! let store = ScoreStore::open_default()?;
//! store.record(Difficulty::Medium, ScoreEntry::new(1800, 4, 27))?;
//! let best = store.load()?.best(Difficulty::Medium);
//! # Ok::<(), blockfall_store::StoreError>(())
//! ```

pub mod error;
pub mod file;
pub mod high_scores;

pub use error::{Result, StoreError};
pub use file::ScoreStore;
pub use high_scores::{HighScores, ScoreEntry};
