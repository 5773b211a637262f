//! Async runtime around the core simulation.
//!
//! - [`session`]: the actor that serializes commands and gravity ticks onto one
//!   [`GameState`](blockfall_core::GameState) and publishes snapshots and events
//! - [`scheduler`]: the owned, cancellable gravity timer

pub mod scheduler;
pub mod session;

pub use scheduler::{DropScheduler, Tick};
pub use session::{Session, SessionConfig, SessionEvent, SessionHandle};
