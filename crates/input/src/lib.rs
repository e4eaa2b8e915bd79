//! Terminal input - maps `crossterm` key events to [`crate::types::GameAction`]
//!
//! The mapping depends on the session status so a single key can start a
//! session from `Ready` and hard drop while `Playing`.

pub mod map;

pub use streamer_tetris_types as types;

pub use map::{handle_key_event, is_reclaim_key, should_quit};
