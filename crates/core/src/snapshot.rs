//! Snapshot module - plain copy of the session state for front ends and logs

use crate::arbiter::NextPiece;
use crate::types::{GameStatus, PieceKind, PieceOrigin};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub origin: PieceOrigin,
    pub x: i16,
    pub y: i16,
    pub rotation_degrees: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    pub status: GameStatus,
    pub score: u32,
    pub lines: u32,
    pub level: u32,
    pub drop_interval_ms: u32,
    pub next: NextPiece,
    pub active: Option<ActiveSnapshot>,
    /// Row the active piece would lock at
    pub landing_y: Option<i16>,
    pub filled_cells: u32,
    /// Whether fresh room selections are currently accepted
    pub feed_active: bool,
    pub piece_id: u32,
    pub episode_id: u32,
}

impl GameSnapshot {
    pub fn playable(&self) -> bool {
        self.status == GameStatus::Playing
    }

    /// One-line HUD text, e.g. `PLAYING score 120 lines 3 level 1 next T (room)`
    pub fn status_line(&self) -> String {
        let origin = match self.next.origin {
            PieceOrigin::Local => "local",
            PieceOrigin::External => "room",
        };
        let feed = if self.feed_active { " feed on" } else { "" };
        format!(
            "{} score {} lines {} level {} next {} ({}){}",
            self.status.as_str().to_uppercase(),
            self.score,
            self.lines,
            self.level,
            self.next.kind.as_str(),
            origin,
            feed
        )
    }
}
