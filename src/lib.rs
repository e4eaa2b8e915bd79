//! Streamer Tetris (workspace facade crate).
//!
//! Re-exports the workspace crates as `streamer_tetris::{core,feed,input,types}`
//! while the implementation lives in dedicated crates under `crates/`.

pub use streamer_tetris_core as core;
pub use streamer_tetris_feed as feed;
pub use streamer_tetris_input as input;
pub use streamer_tetris_types as types;
