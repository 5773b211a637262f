//! Blockfall (workspace facade crate).
//!
//! Re-exports the member crates under one name so the binary, integration tests
//! and benches can use `blockfall::{core, engine, store, ...}`.

pub use blockfall_core as core;
pub use blockfall_engine as engine;
pub use blockfall_input as input;
pub use blockfall_store as store;
pub use blockfall_term as term;
pub use blockfall_types as types;
