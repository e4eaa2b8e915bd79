//! Session module - drop/lock scheduler and session lifecycle
//!
//! Ties the grid, piece geometry, scoring, and the piece arbiter together.
//! Everything here runs on the caller's thread: the front end calls
//! [`GameSession::tick`] at a fixed cadence, forwards keyboard actions through
//! [`GameSession::apply_action`], and hands feed poller output to
//! [`GameSession::apply_feed`] between ticks.

use std::fmt;

use crate::arbiter::{FeedDecision, FeedUpdate, NextPiece, PieceArbiter};
use crate::clock::{Clock, SystemClock};
use crate::grid::Grid;
use crate::pieces::{get_shape, rotate, Shape};
use crate::rng::{PieceRandomizer, SimpleRng};
use crate::scoring::{drop_interval_ms, level_for_lines, line_clear_score, soft_drop_score};
use crate::snapshot::{ActiveSnapshot, GameSnapshot};
use crate::types::{
    GameAction, GameStatus, LockEvent, PieceKind, PieceOrigin, BASE_DROP_MS, SPAWN_X, SPAWN_Y,
    START_LEVEL,
};

/// The falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivePiece {
    pub kind: PieceKind,
    pub shape: Shape,
    pub x: i16,
    pub y: i16,
    /// Clockwise rotation applied since spawn: 0, 90, 180 or 270
    pub rotation_degrees: u16,
}

impl ActivePiece {
    /// New piece at the spawn position with its base shape
    pub fn spawn(kind: PieceKind) -> Self {
        Self::at(kind, SPAWN_X as i16, SPAWN_Y as i16)
    }

    /// New piece with its base shape at (x, y)
    pub fn at(kind: PieceKind, x: i16, y: i16) -> Self {
        Self {
            kind,
            shape: get_shape(kind),
            x,
            y,
            rotation_degrees: 0,
        }
    }

    /// Copy shifted by (dx, dy)
    pub fn moved(&self, dx: i16, dy: i16) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Copy rotated 90 degrees clockwise around the matrix origin
    pub fn rotated(&self) -> Self {
        Self {
            shape: rotate(&self.shape),
            rotation_degrees: (self.rotation_degrees + 90) % 360,
            ..*self
        }
    }

    pub fn fits(&self, grid: &Grid) -> bool {
        grid.is_valid_placement(&self.shape, self.x, self.y)
    }

    /// Absolute grid coordinates of the filled cells
    pub fn cells(&self) -> impl Iterator<Item = (i16, i16)> + '_ {
        self.shape
            .filled_cells()
            .map(move |(dx, dy)| (self.x + dx as i16, self.y + dy as i16))
    }
}

/// One play session
pub struct GameSession {
    grid: Grid,
    active: Option<ActivePiece>,
    next: NextPiece,
    /// Origin of the piece currently falling
    active_origin: PieceOrigin,
    score: u32,
    lines: u32,
    level: u32,
    drop_interval_ms: u32,
    status: GameStatus,
    drop_timer_ms: u32,
    arbiter: PieceArbiter,
    rng: Box<dyn PieceRandomizer>,
    clock: Box<dyn Clock>,
    /// Last lock event (consumed by observers)
    last_event: Option<LockEvent>,
    /// Monotonic id for spawned pieces (increments only on successful spawn)
    piece_id: u32,
    /// Monotonic episode id (increments on restart)
    episode_id: u32,
}

impl GameSession {
    /// Local-only session with a seeded RNG and the system clock
    pub fn new(seed: u32) -> Self {
        Self::with_sources(
            Box::new(SimpleRng::new(seed)),
            Box::new(SystemClock),
            PieceArbiter::local_only(),
        )
    }

    /// Session with injected piece source, clock, and arbiter
    pub fn with_sources(
        mut rng: Box<dyn PieceRandomizer>,
        clock: Box<dyn Clock>,
        arbiter: PieceArbiter,
    ) -> Self {
        let next = arbiter.next_local(rng.as_mut());
        Self {
            grid: Grid::standard(),
            active: None,
            next,
            active_origin: PieceOrigin::Local,
            score: 0,
            lines: 0,
            level: START_LEVEL,
            drop_interval_ms: BASE_DROP_MS,
            status: GameStatus::Ready,
            drop_timer_ms: 0,
            arbiter,
            rng,
            clock,
            last_event: None,
            piece_id: 0,
            episode_id: 0,
        }
    }

    /// Replace the grid before the session starts (custom dimensions)
    ///
    /// Ignored once the session has left `Ready`.
    pub fn with_grid(mut self, grid: Grid) -> Self {
        if self.status == GameStatus::Ready {
            self.grid = grid;
        }
        self
    }

    /// Start the session from `Ready`
    ///
    /// The first piece is the `next` shown while `Ready`, including a
    /// viewer selection applied before the start.
    pub fn start(&mut self) -> bool {
        if self.status != GameStatus::Ready {
            return false;
        }
        self.begin();
        true
    }

    /// Start a new episode from `GameOver`
    pub fn restart(&mut self) -> bool {
        if self.status != GameStatus::GameOver {
            return false;
        }
        self.episode_id = self.episode_id.wrapping_add(1);
        self.arbiter.reset_feed();
        self.next = self.arbiter.next_local(self.rng.as_mut());
        self.begin();
        true
    }

    fn begin(&mut self) {
        self.grid = Grid::new(self.grid.width(), self.grid.height());
        self.active = None;
        self.score = 0;
        self.lines = 0;
        self.level = START_LEVEL;
        self.drop_interval_ms = drop_interval_ms(START_LEVEL);
        self.drop_timer_ms = 0;
        self.last_event = None;
        self.status = GameStatus::Playing;
        self.spawn_piece();
    }

    /// Toggle between `Playing` and `Paused`
    pub fn toggle_pause(&mut self) -> bool {
        match self.status {
            GameStatus::Playing => {
                self.status = GameStatus::Paused;
                true
            }
            GameStatus::Paused => {
                self.status = GameStatus::Playing;
                true
            }
            GameStatus::Ready | GameStatus::GameOver => false,
        }
    }

    /// Promote `next` to the active piece at the spawn position
    ///
    /// Returns false (and ends the session) if the spawn position is blocked.
    pub fn spawn_piece(&mut self) -> bool {
        let piece = ActivePiece::spawn(self.next.kind);
        if !piece.fits(&self.grid) {
            self.active = None;
            self.status = GameStatus::GameOver;
            return false;
        }

        self.active = Some(piece);
        self.active_origin = self.next.origin;
        self.piece_id = self.piece_id.wrapping_add(1);
        self.drop_timer_ms = 0;
        self.next = self.arbiter.next_local(self.rng.as_mut());
        true
    }

    /// Advance gravity by `elapsed_ms`
    ///
    /// Returns true if the piece moved down or locked.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if self.status != GameStatus::Playing || self.active.is_none() {
            return false;
        }

        self.drop_timer_ms = self.drop_timer_ms.saturating_add(elapsed_ms);
        if self.drop_timer_ms < self.drop_interval_ms {
            return false;
        }

        self.drop_timer_ms = 0;
        if !self.try_move(0, 1) {
            self.lock_piece();
        }
        true
    }

    /// Apply a player action
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match self.status {
            GameStatus::Ready => match action {
                GameAction::Start => self.start(),
                _ => false,
            },
            GameStatus::Paused => match action {
                GameAction::Pause => self.toggle_pause(),
                _ => false,
            },
            GameStatus::GameOver => match action {
                GameAction::Restart => self.restart(),
                _ => false,
            },
            GameStatus::Playing => match action {
                GameAction::MoveLeft => self.try_move(-1, 0),
                GameAction::MoveRight => self.try_move(1, 0),
                GameAction::Rotate => self.try_rotate(),
                GameAction::SoftDrop => self.soft_drop(),
                GameAction::HardDrop => self.hard_drop(),
                GameAction::Pause => self.toggle_pause(),
                GameAction::Start | GameAction::Restart => false,
            },
        }
    }

    /// Try to move the active piece
    pub fn try_move(&mut self, dx: i16, dy: i16) -> bool {
        self.try_replace(|piece| piece.moved(dx, dy))
    }

    /// Try to rotate the active piece clockwise (no kicks)
    pub fn try_rotate(&mut self) -> bool {
        self.try_replace(|piece| piece.rotated())
    }

    fn try_replace(&mut self, f: impl FnOnce(&ActivePiece) -> ActivePiece) -> bool {
        if self.status != GameStatus::Playing {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        let candidate = f(&active);
        if !candidate.fits(&self.grid) {
            return false;
        }
        self.active = Some(candidate);
        true
    }

    /// Move down one row; +1 point on success, never locks
    pub fn soft_drop(&mut self) -> bool {
        let moved = self.try_move(0, 1);
        if moved {
            self.score = self.score.saturating_add(soft_drop_score(1));
        }
        moved
    }

    /// Drop to the landing row and lock immediately
    pub fn hard_drop(&mut self) -> bool {
        if self.status != GameStatus::Playing {
            return false;
        }
        let Some(mut active) = self.active else {
            return false;
        };

        active.y += self.grid.drop_distance(&active.shape, active.x, active.y);
        self.active = Some(active);
        self.lock_piece();
        true
    }

    /// Lock the active piece, clear rows, score, and spawn the next piece
    pub fn lock_piece(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };

        let committed = self
            .grid
            .commit(&active.shape, active.x, active.y, active.kind);
        let cleared = committed.clear_full_rows();
        self.grid = cleared.grid;

        let lines_cleared = cleared.lines_cleared;
        // Score with the level the piece was locked at.
        let points = line_clear_score(lines_cleared, self.level);
        self.score = self.score.saturating_add(points);
        self.lines = self.lines.saturating_add(lines_cleared);

        let mut new_level = None;
        let level = level_for_lines(self.lines);
        if level != self.level {
            self.level = level;
            self.drop_interval_ms = drop_interval_ms(level);
            new_level = Some(level);
        }
        self.drop_timer_ms = 0;

        let spawned = self.spawn_piece();
        self.last_event = Some(LockEvent {
            kind: active.kind,
            lines_cleared,
            line_clear_score: points,
            new_level,
            game_over: !spawned,
        });
    }

    /// Hand one poller message to the arbiter
    pub fn apply_feed(&mut self, update: FeedUpdate) -> FeedDecision {
        let now = self.clock.now_secs();
        self.arbiter.apply(&mut self.next, update, now)
    }

    /// Record a successful (re)claim of the session's room
    pub fn reclaim_room(&mut self) {
        let now = self.clock.now_secs();
        self.arbiter.reclaim(now);
    }

    /// Whether a fresh feed selection would currently be applied
    pub fn feed_active(&self) -> bool {
        self.arbiter.is_feed_active(self.clock.now_secs())
    }

    /// Take and clear the last lock event
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    /// Row the active piece would lock at if hard dropped
    pub fn landing_y(&self) -> Option<i16> {
        let active = self.active?;
        Some(active.y + self.grid.drop_distance(&active.shape, active.x, active.y))
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            status: self.status,
            score: self.score,
            lines: self.lines,
            level: self.level,
            drop_interval_ms: self.drop_interval_ms,
            next: self.next,
            active: self.active.map(|piece| ActiveSnapshot {
                kind: piece.kind,
                origin: self.active_origin,
                x: piece.x,
                y: piece.y,
                rotation_degrees: piece.rotation_degrees,
            }),
            landing_y: self.landing_y(),
            filled_cells: self.grid.filled_count() as u32,
            feed_active: self.feed_active(),
            piece_id: self.piece_id,
            episode_id: self.episode_id,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn active(&self) -> Option<ActivePiece> {
        self.active
    }

    pub fn active_origin(&self) -> PieceOrigin {
        self.active_origin
    }

    pub fn next_piece(&self) -> NextPiece {
        self.next
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn drop_interval_ms(&self) -> u32 {
        self.drop_interval_ms
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn arbiter(&self) -> &PieceArbiter {
        &self.arbiter
    }

    pub fn arbiter_mut(&mut self) -> &mut PieceArbiter {
        &mut self.arbiter
    }

    pub fn piece_id(&self) -> u32 {
        self.piece_id
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    #[cfg(test)]
    pub(crate) fn set_active(&mut self, piece: ActivePiece) {
        self.active = Some(piece);
    }

    #[cfg(test)]
    pub(crate) fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }
}

impl fmt::Debug for GameSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameSession")
            .field("status", &self.status)
            .field("active", &self.active)
            .field("next", &self.next)
            .field("score", &self.score)
            .field("lines", &self.lines)
            .field("level", &self.level)
            .field("drop_interval_ms", &self.drop_interval_ms)
            .field("piece_id", &self.piece_id)
            .field("episode_id", &self.episode_id)
            .finish_non_exhaustive()
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(1)
    }
}
