//! In-memory ledger

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use crate::error::Result;
use crate::ledger::RoomLedger;
use crate::record::{check_room_id, choose_in, claim_in, ClaimRequest, RoomBook, RoomRecord};

/// Ledger held in process memory (tests, demos, embedding)
#[derive(Debug, Default)]
pub struct MemoryLedger {
    rooms: RwLock<RoomBook>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a purchase of `piece_id` by `buyer`
    pub async fn choose_piece(
        &self,
        room_id: u8,
        piece_id: u64,
        buyer: &str,
        now_secs: i64,
    ) -> Result<RoomRecord> {
        let mut rooms = self.rooms.write().await;
        choose_in(&mut rooms, room_id, piece_id, buyer, now_secs)
    }

    /// Snapshot of every room
    pub async fn rooms(&self) -> RoomBook {
        self.rooms.read().await.clone()
    }
}

#[async_trait]
impl RoomLedger for MemoryLedger {
    async fn read_room(&self, room_id: u8) -> Result<Option<RoomRecord>> {
        check_room_id(room_id)?;
        Ok(self.rooms.read().await.get(&room_id).cloned())
    }

    async fn claim_room(
        &self,
        room_id: u8,
        claim: &ClaimRequest,
        now_secs: i64,
    ) -> Result<RoomRecord> {
        let mut rooms = self.rooms.write().await;
        let record = claim_in(&mut rooms, room_id, claim, now_secs)?;
        info!(room_id, owner = %claim.owner, "room claimed");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FeedError;

    #[tokio::test]
    async fn test_unknown_room_reads_none() {
        let ledger = MemoryLedger::new();
        assert_eq!(ledger.read_room(5).await.unwrap(), None);
        assert_eq!(ledger.room_activity(5).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_invalid_room_read_is_error() {
        let ledger = MemoryLedger::new();
        assert!(matches!(
            ledger.read_room(10).await,
            Err(FeedError::InvalidRoom(10))
        ));
    }

    #[tokio::test]
    async fn test_claim_then_choose() {
        let ledger = MemoryLedger::new();
        ledger
            .claim_room(0, &ClaimRequest::new("alice").with_room_name("speedrun"), 1_000)
            .await
            .unwrap();
        ledger.choose_piece(0, 3, "viewer", 1_010).await.unwrap();

        let record = ledger.read_room(0).await.unwrap().unwrap();
        assert_eq!(record.room_name, "speedrun");
        assert_eq!(record.latest_chosen_piece, 3);
        assert_eq!(record.last_buyer.as_deref(), Some("viewer"));
        assert_eq!(ledger.room_activity(0).await.unwrap(), Some(1_010));
        assert_eq!(ledger.rooms().await.len(), 1);
    }
}
