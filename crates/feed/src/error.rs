use thiserror::Error;

/// Errors from room ledger reads and writes
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("invalid room id {0}")]
    InvalidRoom(u8),
    #[error("room {room_id} is already claimed by {owner}")]
    AlreadyClaimed { room_id: u8, owner: String },
    #[error("room {0} not found")]
    RoomNotFound(u8),
    #[error("invalid piece type {0}, must be 0-6")]
    InvalidPieceType(u64),
    #[error("room name too long: {len} characters, max {max}")]
    NameTooLong { len: usize, max: usize },
    #[error("stream url too long: {len} characters, max {max}")]
    UrlTooLong { len: usize, max: usize },
    #[error("ledger io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("ledger decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FeedError>;
