//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the grid rules, piece geometry, scoring, the piece
//! source arbiter, and the drop/lock scheduler. It has **no** I/O: the piece
//! randomizer and the wall clock are injected, and the external room feed
//! reaches a session only as [`FeedUpdate`] values.
//!
//! # Module Structure
//!
//! - [`grid`]: 15x16 playfield with placement checks, copy-on-write commit and row clearing
//! - [`pieces`]: the seven piece matrices and clockwise rotation (no wall kicks)
//! - [`scoring`]: line-clear score, level progression and gravity interval
//! - [`rng`]: local piece randomizers
//! - [`clock`]: wall clock seam used for room expiration
//! - [`arbiter`]: chooses between local and room-fed next pieces
//! - [`session`]: session lifecycle, gravity, player actions and locking
//! - [`snapshot`]: plain state copies for front ends
//!
//! # Example
//!
//! ```
//! use streamer_tetris_core::GameSession;
//! use streamer_tetris_types::{GameAction, GameStatus};
//!
//! let mut game = GameSession::new(12345);
//! game.apply_action(GameAction::Start);
//!
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::Rotate);
//! game.apply_action(GameAction::HardDrop);
//!
//! assert_eq!(game.status(), GameStatus::Playing);
//! assert_eq!(game.grid().filled_count(), 4);
//! ```
//!
//! # Timing
//!
//! Call [`GameSession::tick`](session::GameSession::tick) every frame (16ms)
//! with the elapsed time. Gravity starts at 1000ms per row and gets 50ms
//! faster every level, down to 50ms.

pub mod arbiter;
pub mod clock;
pub mod grid;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;

pub use streamer_tetris_types as types;

// Re-export commonly used types for convenience
pub use arbiter::{
    ExternalSelection, FeedDecision, FeedState, FeedUpdate, InactiveReason, NextPiece,
    PieceArbiter,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use grid::{ClearedRows, Grid};
pub use pieces::{get_shape, rotate, PieceDefinition, Shape, PIECES};
pub use rng::{PieceRandomizer, ScriptedPieces, SimpleRng};
pub use scoring::{drop_interval_ms, level_for_lines, line_clear_score};
pub use session::{ActivePiece, GameSession};
pub use snapshot::{ActiveSnapshot, GameSnapshot};
