//! Piece source arbiter - merges local generation with the external room feed
//!
//! Two writers decide the upcoming piece:
//!
//! - the session, which asks for a locally generated piece on every spawn;
//! - the feed poller, which pushes the room's latest purchased selection.
//!
//! The poller runs on a coarse cadence (seconds) while spawns can happen
//! several times a second, so the same selection is observed many times. A
//! selection is applied only if its timestamp is strictly greater than the
//! last one applied, which makes pushes idempotent and order-independent.
//!
//! Feed pushes are further gated by ownership (the room must belong to this
//! session) and by room expiration: a room whose last claim or purchase is 120
//! seconds or more in the past is treated as inactive until it is reclaimed.

use std::time::Duration;

use crate::rng::PieceRandomizer;
use crate::types::{PieceKind, PieceOrigin, FEED_POLL_MS, ROOM_EXPIRY_SECS};

/// The upcoming piece and where it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NextPiece {
    pub kind: PieceKind,
    pub origin: PieceOrigin,
}

impl NextPiece {
    pub fn local(kind: PieceKind) -> Self {
        Self {
            kind,
            origin: PieceOrigin::Local,
        }
    }

    pub fn external(kind: PieceKind) -> Self {
        Self {
            kind,
            origin: PieceOrigin::External,
        }
    }
}

/// One observation of the room's latest selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExternalSelection {
    /// Raw piece id as stored by the ledger; mapped with `mod 7`
    pub piece_id: u64,
    /// Selection time in unix seconds; `None` if the room has never had one
    pub timestamp: Option<i64>,
    /// The room is owned by this session
    pub ownership_valid: bool,
}

/// Why the poller considers the feed inactive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InactiveReason {
    /// The room does not exist on the ledger
    RoomMissing,
    /// The room is owned by someone else
    NotOwner,
}

impl InactiveReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            InactiveReason::RoomMissing => "room_missing",
            InactiveReason::NotOwner => "not_owner",
        }
    }
}

/// Message from the feed poller to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedUpdate {
    Selection {
        selection: ExternalSelection,
        /// Room's last claim activity (unix seconds), if known
        last_activity: Option<i64>,
    },
    Inactive(InactiveReason),
}

/// Outcome of offering a feed update to the arbiter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedDecision {
    /// The selection became the next piece
    Applied(PieceKind),
    /// The session does not use the external feed
    Disabled,
    /// The selection was not made for a room this session owns
    Unowned,
    /// The room has been inactive for too long
    Expired,
    /// The room has no selection timestamp yet
    MissingTimestamp,
    /// Already applied (or older than what was applied)
    Stale { timestamp: i64, last_applied: i64 },
    /// The poller reported the feed inactive; feed state was reset
    Deactivated(InactiveReason),
}

impl FeedDecision {
    pub fn is_applied(&self) -> bool {
        matches!(self, FeedDecision::Applied(_))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FeedDecision::Applied(_) => "applied",
            FeedDecision::Disabled => "disabled",
            FeedDecision::Unowned => "unowned",
            FeedDecision::Expired => "expired",
            FeedDecision::MissingTimestamp => "missing_timestamp",
            FeedDecision::Stale { .. } => "stale",
            FeedDecision::Deactivated(_) => "deactivated",
        }
    }
}

/// Per-session external feed bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedState {
    last_applied_timestamp: Option<i64>,
    poll_interval_ms: u64,
    staleness_threshold_secs: u64,
}

impl FeedState {
    pub fn new(poll_interval_ms: u64, staleness_threshold_secs: u64) -> Self {
        Self {
            last_applied_timestamp: None,
            poll_interval_ms,
            staleness_threshold_secs,
        }
    }

    pub fn last_applied_timestamp(&self) -> Option<i64> {
        self.last_applied_timestamp
    }

    pub fn poll_interval_ms(&self) -> u64 {
        self.poll_interval_ms
    }

    /// Cadence the room poller runs at
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn staleness_threshold_secs(&self) -> u64 {
        self.staleness_threshold_secs
    }

    /// Whether `timestamp` is strictly newer than the last applied one
    pub fn is_fresh(&self, timestamp: i64) -> bool {
        match self.last_applied_timestamp {
            None => true,
            Some(last) => timestamp > last,
        }
    }

    fn reset(&mut self) {
        self.last_applied_timestamp = None;
    }
}

impl Default for FeedState {
    fn default() -> Self {
        Self::new(FEED_POLL_MS, ROOM_EXPIRY_SECS)
    }
}

/// Decides the type of each upcoming piece
#[derive(Debug, Clone, Default)]
pub struct PieceArbiter {
    feed: FeedState,
    feed_enabled: bool,
    inactive: Option<InactiveReason>,
    last_activity: Option<i64>,
}

impl PieceArbiter {
    /// Arbiter that only ever uses local generation
    pub fn local_only() -> Self {
        Self::default()
    }

    /// Arbiter that accepts pushes from a room feed
    pub fn with_feed(feed: FeedState) -> Self {
        Self {
            feed,
            feed_enabled: true,
            inactive: None,
            last_activity: None,
        }
    }

    pub fn feed_state(&self) -> &FeedState {
        &self.feed
    }

    pub fn feed_enabled(&self) -> bool {
        self.feed_enabled
    }

    pub fn inactive_reason(&self) -> Option<InactiveReason> {
        self.inactive
    }

    pub fn last_activity(&self) -> Option<i64> {
        self.last_activity
    }

    /// Turn feed handling on or off (poller started/stopped)
    pub fn set_feed_enabled(&mut self, enabled: bool) {
        if self.feed_enabled != enabled {
            self.feed_enabled = enabled;
            self.feed.reset();
        }
    }

    /// Pick a local piece (spawn path)
    pub fn next_local(&self, rng: &mut dyn PieceRandomizer) -> NextPiece {
        NextPiece::local(rng.next_kind())
    }

    /// A room with no recorded activity never expires
    pub fn is_expired(&self, now_secs: i64) -> bool {
        match self.last_activity {
            Some(ts) => now_secs.saturating_sub(ts) >= self.feed.staleness_threshold_secs as i64,
            None => false,
        }
    }

    /// Seconds until the room expires (0 when already expired)
    pub fn secs_until_expiry(&self, now_secs: i64) -> Option<u64> {
        let ts = self.last_activity?;
        let remaining = self.feed.staleness_threshold_secs as i64 - now_secs.saturating_sub(ts);
        Some(remaining.max(0) as u64)
    }

    /// Whether a fresh selection pushed now would be applied
    pub fn is_feed_active(&self, now_secs: i64) -> bool {
        self.feed_enabled && self.inactive.is_none() && !self.is_expired(now_secs)
    }

    /// Record the room's last claim activity as reported by the ledger
    ///
    /// Activity only moves forward; an older report (e.g. a poll issued
    /// before a local reclaim) is ignored.
    pub fn record_activity(&mut self, last_activity: Option<i64>) {
        if let Some(ts) = last_activity {
            self.last_activity = Some(self.last_activity.map_or(ts, |prev| prev.max(ts)));
        }
    }

    /// The room was (re)claimed by this session at `now_secs`
    pub fn reclaim(&mut self, now_secs: i64) {
        self.last_activity = Some(now_secs);
        self.inactive = None;
    }

    /// Ownership lost or room gone: stop using the feed and forget what was applied
    pub fn mark_inactive(&mut self, reason: InactiveReason) -> FeedDecision {
        self.inactive = Some(reason);
        self.feed.reset();
        FeedDecision::Deactivated(reason)
    }

    /// Session restart: the new session starts with a clean feed state
    pub fn reset_feed(&mut self) {
        self.feed.reset();
    }

    /// Route a poller message
    pub fn apply(&mut self, next: &mut NextPiece, update: FeedUpdate, now_secs: i64) -> FeedDecision {
        match update {
            FeedUpdate::Selection {
                selection,
                last_activity,
            } => {
                if selection.ownership_valid {
                    self.record_activity(last_activity);
                }
                self.apply_external(next, selection, now_secs)
            }
            FeedUpdate::Inactive(reason) => {
                if !self.feed_enabled {
                    return FeedDecision::Disabled;
                }
                self.mark_inactive(reason)
            }
        }
    }

    /// Offer one external selection
    ///
    /// On any outcome other than `Applied`, `next` is left untouched.
    pub fn apply_external(
        &mut self,
        next: &mut NextPiece,
        selection: ExternalSelection,
        now_secs: i64,
    ) -> FeedDecision {
        if !self.feed_enabled {
            return FeedDecision::Disabled;
        }
        if !selection.ownership_valid {
            return FeedDecision::Unowned;
        }
        // The poller confirmed ownership again.
        self.inactive = None;

        if self.is_expired(now_secs) {
            return FeedDecision::Expired;
        }
        let Some(timestamp) = selection.timestamp else {
            return FeedDecision::MissingTimestamp;
        };
        if !self.feed.is_fresh(timestamp) {
            return FeedDecision::Stale {
                timestamp,
                last_applied: self.feed.last_applied_timestamp.unwrap_or(timestamp),
            };
        }

        let kind = PieceKind::from_feed_id(selection.piece_id);
        *next = NextPiece::external(kind);
        self.feed.last_applied_timestamp = Some(timestamp);
        FeedDecision::Applied(kind)
    }
}
