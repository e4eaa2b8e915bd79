//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data with no external dependencies, so they can be used
//! by the game core, the feed poller and the terminal front end alike.
//!
//! # Board Dimensions
//!
//! The streamer playfield is wider and shorter than the guideline board:
//!
//! - **Width**: 15 columns (indexed 0-14)
//! - **Height**: 16 rows (indexed 0-15)
//! - **Spawn position**: (3, 0), rotation 0°
//!
//! # Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed game loop cadence (~60 FPS) |
//! | `BASE_DROP_MS` | 1000 | Gravity at level 1 |
//! | `DROP_STEP_MS` | 50 | Gravity speed-up per level |
//! | `MIN_DROP_MS` | 50 | Gravity floor |
//! | `FEED_POLL_MS` | 2000 | Default external feed poll cadence |
//! | `ROOM_EXPIRY_SECS` | 120 | Room inactivity window |
//!
//! # Examples
//!
//! ```
//! use streamer_tetris_types::{PieceKind, GameAction, BOARD_WIDTH, BOARD_HEIGHT};
//!
//! // Feed ids wrap around the fixed variant order.
//! assert_eq!(PieceKind::from_feed_id(2), PieceKind::T);
//! assert_eq!(PieceKind::from_feed_id(9), PieceKind::T);
//!
//! // Parse from string (case-insensitive)
//! assert_eq!(PieceKind::from_str("z"), Some(PieceKind::Z));
//!
//! assert_eq!(GameAction::from_str("hardDrop"), Some(GameAction::HardDrop));
//!
//! assert_eq!(BOARD_WIDTH, 15);
//! assert_eq!(BOARD_HEIGHT, 16);
//! ```

/// Board width in cells (15 columns)
pub const BOARD_WIDTH: u8 = 15;

/// Board height in cells (16 rows)
pub const BOARD_HEIGHT: u8 = 16;

/// Spawn column for new pieces
pub const SPAWN_X: i8 = 3;

/// Spawn row for new pieces
pub const SPAWN_Y: i8 = 0;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Gravity interval at level 1 (1000ms = 1 second per row)
pub const BASE_DROP_MS: u32 = 1000;

/// Gravity interval reduction per level above 1
pub const DROP_STEP_MS: u32 = 50;

/// Fastest gravity interval
pub const MIN_DROP_MS: u32 = 50;

/// Lines needed per level
pub const LINES_PER_LEVEL: u32 = 10;

/// Level a fresh session starts at
pub const START_LEVEL: u32 = 1;

/// Points awarded for a successful soft drop step
pub const SOFT_DROP_POINTS: u32 = 1;

/// Line clear scoring table (Classic Nintendo scoring)
///
/// Base points for clearing N lines, multiplied by (level + 1).
pub const LINE_SCORES: [u32; 5] = [0, 40, 100, 300, 1200];

/// Default cadence of the external feed poller
pub const FEED_POLL_MS: u64 = 2000;

/// A room with no claim activity for this long is expired
pub const ROOM_EXPIRY_SECS: u64 = 120;

/// Number of rooms the ledger exposes (ids 0..ROOMS_COUNT)
pub const ROOMS_COUNT: u8 = 10;

/// The seven piece variants
///
/// The declaration order is the order used to map external feed ids to
/// variants: `I, O, T, S, Z, J, L`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All variants in feed order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Map an external feed piece id to a variant (`id mod 7`).
    ///
    /// Any id is accepted; out-of-range ids wrap.
    pub fn from_feed_id(id: u64) -> Self {
        Self::ALL[(id % Self::ALL.len() as u64) as usize]
    }

    /// Position of this variant in feed order
    pub fn index(&self) -> usize {
        match self {
            PieceKind::I => 0,
            PieceKind::O => 1,
            PieceKind::T => 2,
            PieceKind::S => 3,
            PieceKind::Z => 4,
            PieceKind::J => 5,
            PieceKind::L => 6,
        }
    }

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use streamer_tetris_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("I"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("l"), Some(PieceKind::L));
    /// assert_eq!(PieceKind::from_str("x"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "I" => Some(PieceKind::I),
            "O" => Some(PieceKind::O),
            "T" => Some(PieceKind::T),
            "S" => Some(PieceKind::S),
            "Z" => Some(PieceKind::Z),
            "J" => Some(PieceKind::J),
            "L" => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Display tag, equal to the variant name
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::O => "O",
            PieceKind::T => "T",
            PieceKind::S => "S",
            PieceKind::Z => "Z",
            PieceKind::J => "J",
            PieceKind::L => "L",
        }
    }
}

/// Where the upcoming piece came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PieceOrigin {
    /// Local pseudo-random generator
    #[default]
    Local,
    /// External (room) feed selection
    External,
}

impl PieceOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceOrigin::Local => "local",
            PieceOrigin::External => "external",
        }
    }
}

/// Session lifecycle
///
/// `Ready → Playing ↔ Paused`, `Playing → GameOver → Playing` (restart).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameStatus {
    #[default]
    Ready,
    Playing,
    Paused,
    GameOver,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Ready => "ready",
            GameStatus::Playing => "playing",
            GameStatus::Paused => "paused",
            GameStatus::GameOver => "game over",
        }
    }
}

/// Player commands accepted by a game session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Start a session from `Ready`
    Start,
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Move piece one cell down (+1 point on success)
    SoftDrop,
    /// Drop piece to its landing row and lock it immediately
    HardDrop,
    /// Rotate piece 90° clockwise (no wall kicks)
    Rotate,
    /// Toggle pause
    Pause,
    /// Start over after game over
    Restart,
}

impl GameAction {
    /// Parse action from string
    ///
    /// # Examples
    ///
    /// ```
    /// use streamer_tetris_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("rotate"), Some(GameAction::Rotate));
    /// assert_eq!(GameAction::from_str("hold"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "start" => Some(GameAction::Start),
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "softdrop" => Some(GameAction::SoftDrop),
            "harddrop" => Some(GameAction::HardDrop),
            "rotate" => Some(GameAction::Rotate),
            "pause" => Some(GameAction::Pause),
            "restart" => Some(GameAction::Restart),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::Start => "start",
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::SoftDrop => "softDrop",
            GameAction::HardDrop => "hardDrop",
            GameAction::Rotate => "rotate",
            GameAction::Pause => "pause",
            GameAction::Restart => "restart",
        }
    }
}

/// Core-side event emitted after a piece locks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockEvent {
    pub kind: PieceKind,
    pub lines_cleared: u32,
    pub line_clear_score: u32,
    /// Level after this lock, if it changed
    pub new_level: Option<u32>,
    /// The follow-up spawn was blocked
    pub game_over: bool,
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(PieceKind)`: Cell filled with the specified piece kind
pub type Cell = Option<PieceKind>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_id_mapping_order() {
        let expected = ["I", "O", "T", "S", "Z", "J", "L"];
        for (id, tag) in expected.iter().enumerate() {
            assert_eq!(PieceKind::from_feed_id(id as u64).as_str(), *tag);
        }
    }

    #[test]
    fn test_feed_id_wraps() {
        assert_eq!(PieceKind::from_feed_id(7), PieceKind::I);
        assert_eq!(PieceKind::from_feed_id(13), PieceKind::L);
        assert_eq!(PieceKind::from_feed_id(u64::MAX), PieceKind::ALL[(u64::MAX % 7) as usize]);
    }

    #[test]
    fn test_index_matches_all() {
        for (i, kind) in PieceKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn test_action_roundtrip_names() {
        for action in [
            GameAction::Start,
            GameAction::MoveLeft,
            GameAction::MoveRight,
            GameAction::SoftDrop,
            GameAction::HardDrop,
            GameAction::Rotate,
            GameAction::Pause,
            GameAction::Restart,
        ] {
            assert_eq!(GameAction::from_str(action.as_str()), Some(action));
        }
    }
}
