//! JSON file ledger
//!
//! The file holds one JSON object mapping room ids to [`RoomRecord`]s:
//!
//! ```json
//! { "3": { "exists": true, "owner": "alice", "latest_chosen_piece": 2, "timestamp": 1700000000 } }
//! ```
//!
//! An external bridge (or a second process) writes purchases into the file
//! and the poller picks them up on its next read. A missing file is an empty
//! ledger.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::Result;
use crate::ledger::RoomLedger;
use crate::record::{check_room_id, choose_in, claim_in, ClaimRequest, RoomBook, RoomRecord};

#[derive(Debug)]
pub struct JsonFileLedger {
    path: PathBuf,
    /// Serializes read-modify-write cycles from this process
    write_lock: Mutex<()>,
}

impl JsonFileLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every room from disk
    pub async fn load(&self) -> Result<RoomBook> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(RoomBook::new()),
            Err(err) => return Err(err.into()),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(RoomBook::new());
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn store(&self, book: &RoomBook) -> Result<()> {
        let json = serde_json::to_vec_pretty(book)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        // Write next to the target, then rename so readers never see a torn file.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), rooms = book.len(), "ledger stored");
        Ok(())
    }

    /// Record a purchase of `piece_id` by `buyer`
    pub async fn choose_piece(
        &self,
        room_id: u8,
        piece_id: u64,
        buyer: &str,
        now_secs: i64,
    ) -> Result<RoomRecord> {
        let _guard = self.write_lock.lock().await;
        let mut book = self.load().await?;
        let record = choose_in(&mut book, room_id, piece_id, buyer, now_secs)?;
        self.store(&book).await?;
        Ok(record)
    }
}

#[async_trait]
impl RoomLedger for JsonFileLedger {
    async fn read_room(&self, room_id: u8) -> Result<Option<RoomRecord>> {
        check_room_id(room_id)?;
        let mut book = self.load().await?;
        Ok(book.remove(&room_id))
    }

    async fn claim_room(
        &self,
        room_id: u8,
        claim: &ClaimRequest,
        now_secs: i64,
    ) -> Result<RoomRecord> {
        let _guard = self.write_lock.lock().await;
        let mut book = self.load().await?;
        let record = claim_in(&mut book, room_id, claim, now_secs)?;
        self.store(&book).await?;
        info!(room_id, owner = %claim.owner, path = %self.path.display(), "room claimed");
        Ok(record)
    }
}
