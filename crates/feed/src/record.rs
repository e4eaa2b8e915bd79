//! Room records - what the ledger stores for each streaming room

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::ExternalSelection;
use crate::error::{FeedError, Result};
use crate::types::{PieceKind, ROOMS_COUNT, ROOM_EXPIRY_SECS};

/// Longest accepted room name, in characters
pub const MAX_ROOM_NAME_LEN: usize = 50;
/// Longest accepted stream URL, in characters
pub const MAX_STREAM_URL_LEN: usize = 200;

/// One room as held by the ledger
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomRecord {
    /// The room has been claimed at least once
    pub exists: bool,
    pub owner: Option<String>,
    /// Raw piece id of the latest purchase (mapped with `mod 7`)
    pub latest_chosen_piece: u64,
    pub last_buyer: Option<String>,
    /// Time of the latest selection (unix seconds)
    pub timestamp: Option<i64>,
    /// Time of the latest claim or purchase (unix seconds)
    pub last_activity: Option<i64>,
    pub room_name: String,
    pub stream_url: String,
}

impl RoomRecord {
    pub fn is_owned_by(&self, owner: &str) -> bool {
        self.owner.as_deref() == Some(owner)
    }

    /// Inactive for the full expiry window (or never claimed)
    pub fn is_expired(&self, now_secs: i64) -> bool {
        match self.last_activity {
            Some(ts) => now_secs.saturating_sub(ts) >= ROOM_EXPIRY_SECS as i64,
            None => true,
        }
    }

    /// The latest selection as seen by `owner`
    pub fn selection_for(&self, owner: &str) -> ExternalSelection {
        ExternalSelection {
            piece_id: self.latest_chosen_piece,
            timestamp: self.timestamp,
            ownership_valid: self.exists && self.is_owned_by(owner),
        }
    }
}

/// Claim parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRequest {
    pub owner: String,
    #[serde(default)]
    pub room_name: String,
    #[serde(default)]
    pub stream_url: String,
}

impl ClaimRequest {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            room_name: String::new(),
            stream_url: String::new(),
        }
    }

    pub fn with_room_name(mut self, room_name: impl Into<String>) -> Self {
        self.room_name = room_name.into();
        self
    }

    pub fn with_stream_url(mut self, stream_url: impl Into<String>) -> Self {
        self.stream_url = stream_url.into();
        self
    }
}

/// All rooms keyed by id
pub type RoomBook = BTreeMap<u8, RoomRecord>;

pub(crate) fn check_room_id(room_id: u8) -> Result<()> {
    if room_id >= ROOMS_COUNT {
        return Err(FeedError::InvalidRoom(room_id));
    }
    Ok(())
}

fn check_claim(claim: &ClaimRequest) -> Result<()> {
    let len = claim.room_name.chars().count();
    if len > MAX_ROOM_NAME_LEN {
        return Err(FeedError::NameTooLong {
            len,
            max: MAX_ROOM_NAME_LEN,
        });
    }
    let len = claim.stream_url.chars().count();
    if len > MAX_STREAM_URL_LEN {
        return Err(FeedError::UrlTooLong {
            len,
            max: MAX_STREAM_URL_LEN,
        });
    }
    Ok(())
}

/// Claim `room_id` in `book`
///
/// A claim succeeds when the room is unclaimed, already owned by the
/// claimer, or expired. A new owner starts with an empty selection.
pub(crate) fn claim_in(
    book: &mut RoomBook,
    room_id: u8,
    claim: &ClaimRequest,
    now_secs: i64,
) -> Result<RoomRecord> {
    check_room_id(room_id)?;
    check_claim(claim)?;
    let record = book.entry(room_id).or_default();

    let same_owner = record.is_owned_by(&claim.owner);
    if record.exists && !same_owner && !record.is_expired(now_secs) {
        return Err(FeedError::AlreadyClaimed {
            room_id,
            owner: record.owner.clone().unwrap_or_default(),
        });
    }

    if !same_owner {
        record.latest_chosen_piece = 0;
        record.last_buyer = None;
        record.timestamp = None;
    }
    record.exists = true;
    record.owner = Some(claim.owner.clone());
    record.last_activity = Some(now_secs);
    if !claim.room_name.is_empty() {
        record.room_name = claim.room_name.clone();
    }
    if !claim.stream_url.is_empty() {
        record.stream_url = claim.stream_url.clone();
    }

    Ok(record.clone())
}

/// Record a purchased piece for `room_id` in `book`
///
/// A purchase counts as room activity. Piece ids are `0..7` on write.
pub(crate) fn choose_in(
    book: &mut RoomBook,
    room_id: u8,
    piece_id: u64,
    buyer: &str,
    now_secs: i64,
) -> Result<RoomRecord> {
    check_room_id(room_id)?;
    if piece_id >= PieceKind::ALL.len() as u64 {
        return Err(FeedError::InvalidPieceType(piece_id));
    }
    let record = book
        .get_mut(&room_id)
        .filter(|record| record.exists)
        .ok_or(FeedError::RoomNotFound(room_id))?;

    record.latest_chosen_piece = piece_id;
    record.last_buyer = Some(buyer.to_string());
    record.timestamp = Some(now_secs);
    record.last_activity = Some(now_secs);
    Ok(record.clone())
}
