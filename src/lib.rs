//! Tetris Enhanced (workspace facade crate).
//!
//! Re-exports the implementation crates under `crates/` so binaries and
//! integration tests can use `tetris_enhanced::{core, store, input, term, types}`.

pub mod config;

pub use tetris_enhanced_core as core;
pub use tetris_enhanced_input as input;
pub use tetris_enhanced_store as store;
pub use tetris_enhanced_term as term;
pub use tetris_enhanced_types as types;

pub use config::AppConfig;
