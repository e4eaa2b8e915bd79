//! External room feed - lets viewers pick the next piece
//!
//! A streamer claims one of the ledger's rooms; viewers buy pieces for that
//! room, and the ledger records the latest purchase with a timestamp. This
//! crate polls the room and delivers what it sees to the game loop:
//!
//! - [`RoomLedger`]: read/claim interface to the ledger
//! - [`MemoryLedger`] / [`JsonFileLedger`]: ledger implementations
//! - [`FeedPoller`]: interval poller producing [`FeedUpdate`](crate::core::FeedUpdate)s
//! - [`FeedRuntime`]: owns a tokio runtime and exposes `try_recv()` to the sync loop
//!
//! # Environment Variables
//!
//! See [`config`] for the full list; the feed stays off unless
//! `TETRIS_ROOM_ID` is set.
//!
//! # Example
//!
//! ```no_run
//! use streamer_tetris_core::GameSession;
//! use streamer_tetris_feed::FeedRuntime;
//!
//! let mut game = GameSession::new(1);
//! if let Some(mut feed) = FeedRuntime::start_from_env().unwrap() {
//!     while let Some(update) = feed.try_recv() {
//!         game.apply_feed(update);
//!     }
//!     feed.shutdown();
//! }
//! ```

pub mod config;
pub mod error;
pub mod file;
pub mod ledger;
pub mod memory;
pub mod poller;
pub mod record;
pub mod runtime;

pub use streamer_tetris_core as core;
pub use streamer_tetris_types as types;

pub use config::FeedConfig;
pub use error::FeedError;
pub use file::JsonFileLedger;
pub use ledger::RoomLedger;
pub use memory::MemoryLedger;
pub use poller::FeedPoller;
pub use record::{ClaimRequest, RoomBook, RoomRecord};
pub use runtime::FeedRuntime;
