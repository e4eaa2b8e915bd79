//! Room ledger interface
//!
//! The ledger is the system of record for room ownership and purchased
//! pieces. The game only ever reads it through [`RoomLedger::read_room`]
//! (and claims once at startup); writes by buyers happen elsewhere.

use async_trait::async_trait;

use crate::error::Result;
use crate::record::{ClaimRequest, RoomRecord};

#[async_trait]
pub trait RoomLedger: Send + Sync {
    /// Current record for `room_id`; `None` if the room was never created
    async fn read_room(&self, room_id: u8) -> Result<Option<RoomRecord>>;

    /// Last claim or purchase for `room_id` (unix seconds)
    async fn room_activity(&self, room_id: u8) -> Result<Option<i64>> {
        Ok(self
            .read_room(room_id)
            .await?
            .and_then(|record| record.last_activity))
    }

    /// Claim (or reclaim) `room_id` for `claim.owner`
    async fn claim_room(&self, room_id: u8, claim: &ClaimRequest, now_secs: i64)
        -> Result<RoomRecord>;
}
