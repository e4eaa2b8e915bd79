//! External feed poller
//!
//! Reads the session's room on a fixed cadence and turns each read into a
//! [`FeedUpdate`] for the game loop. The poller never touches the session:
//! it only sends values over a channel, and the session dedups them by
//! selection timestamp, so repeated or reordered deliveries are harmless.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::core::{FeedUpdate, InactiveReason};
use crate::ledger::RoomLedger;

pub struct FeedPoller {
    ledger: Arc<dyn RoomLedger>,
    room_id: u8,
    owner: String,
    poll_interval: Duration,
}

impl FeedPoller {
    pub fn new(
        ledger: Arc<dyn RoomLedger>,
        room_id: u8,
        owner: impl Into<String>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            ledger,
            room_id,
            owner: owner.into(),
            poll_interval,
        }
    }

    pub fn room_id(&self) -> u8 {
        self.room_id
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Read the room once
    ///
    /// Returns `None` when the read failed; the failure is logged and the
    /// next tick tries again.
    pub async fn poll_once(&self) -> Option<FeedUpdate> {
        let record = match self.ledger.read_room(self.room_id).await {
            Ok(record) => record,
            Err(err) => {
                warn!(room_id = self.room_id, %err, "room read failed");
                return None;
            }
        };

        let update = match record {
            Some(record) if !record.exists => FeedUpdate::Inactive(InactiveReason::RoomMissing),
            None => FeedUpdate::Inactive(InactiveReason::RoomMissing),
            Some(record) if !record.is_owned_by(&self.owner) => {
                FeedUpdate::Inactive(InactiveReason::NotOwner)
            }
            Some(record) => FeedUpdate::Selection {
                selection: record.selection_for(&self.owner),
                last_activity: record.last_activity,
            },
        };
        debug!(room_id = self.room_id, ?update, "room polled");
        Some(update)
    }

    /// Poll until `shutdown` flips to true or the receiver goes away
    ///
    /// The first poll happens immediately.
    pub async fn run(self, tx: mpsc::UnboundedSender<FeedUpdate>, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(
            room_id = self.room_id,
            owner = %self.owner,
            interval_ms = self.poll_interval.as_millis() as u64,
            "feed poller running"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let Some(update) = self.poll_once().await else {
                        continue;
                    };
                    if tx.send(update).is_err() {
                        debug!("feed receiver dropped");
                        break;
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!(room_id = self.room_id, "feed poller stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryLedger;
    use crate::record::ClaimRequest;

    fn poller(ledger: Arc<MemoryLedger>, owner: &str) -> FeedPoller {
        FeedPoller::new(ledger, 1, owner, Duration::from_millis(10))
    }

    #[tokio::test]
    async fn test_missing_room_is_inactive() {
        let ledger = Arc::new(MemoryLedger::new());
        let update = poller(ledger, "alice").poll_once().await;
        assert_eq!(update, Some(FeedUpdate::Inactive(InactiveReason::RoomMissing)));
    }

    #[tokio::test]
    async fn test_foreign_room_is_inactive() {
        let ledger = Arc::new(MemoryLedger::new());
        ledger
            .claim_room(1, &ClaimRequest::new("bob"), 100)
            .await
            .unwrap();
        let update = poller(ledger, "alice").poll_once().await;
        assert_eq!(update, Some(FeedUpdate::Inactive(InactiveReason::NotOwner)));
    }

    #[tokio::test]
    async fn test_owned_room_yields_selection() {
        let ledger = Arc::new(MemoryLedger::new());
        ledger
            .claim_room(1, &ClaimRequest::new("alice"), 100)
            .await
            .unwrap();
        ledger.choose_piece(1, 5, "viewer", 105).await.unwrap();

        let Some(FeedUpdate::Selection {
            selection,
            last_activity,
        }) = poller(ledger, "alice").poll_once().await
        else {
            panic!("expected a selection");
        };
        assert!(selection.ownership_valid);
        assert_eq!(selection.piece_id, 5);
        assert_eq!(selection.timestamp, Some(105));
        assert_eq!(last_activity, Some(105));
    }

    #[tokio::test]
    async fn test_read_error_sends_nothing() {
        let ledger = Arc::new(MemoryLedger::new());
        // Room ids past the room count are rejected by the ledger.
        let poller = FeedPoller::new(ledger, 42, "alice", Duration::from_millis(10));
        assert_eq!(poller.poll_once().await, None);
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let ledger = Arc::new(MemoryLedger::new());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(poller(ledger, "alice").run(tx, shutdown_rx));
        let first = rx.recv().await;
        assert_eq!(first, Some(FeedUpdate::Inactive(InactiveReason::RoomMissing)));

        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();
    }
}
