//! Feed runtime integration
//!
//! Bridges the sync game loop with the async feed poller.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::runtime::{Builder, Runtime};
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

use crate::config::FeedConfig;
use crate::core::{Clock, FeedState, FeedUpdate, SystemClock};
use crate::error::FeedError;
use crate::file::JsonFileLedger;
use crate::ledger::RoomLedger;
use crate::poller::FeedPoller;
use crate::record::{ClaimRequest, RoomRecord};

/// Running feed instance
pub struct FeedRuntime {
    rt: Runtime,
    ledger: Arc<dyn RoomLedger>,
    room_id: u8,
    owner: String,
    update_rx: mpsc::UnboundedReceiver<FeedUpdate>,
    shutdown_tx: watch::Sender<bool>,
    polling: bool,
}

impl FeedRuntime {
    /// Start the feed from environment variables
    ///
    /// Returns `Ok(None)` if no room is configured or `TETRIS_FEED_DISABLED` is set.
    pub fn start_from_env() -> Result<Option<Self>> {
        Self::start(&FeedConfig::from_env())
    }

    /// Start the feed against the JSON ledger named by `config`
    pub fn start(config: &FeedConfig) -> Result<Option<Self>> {
        let Some(room_id) = config.room_id.filter(|_| config.is_enabled()) else {
            return Ok(None);
        };
        let ledger = Arc::new(JsonFileLedger::new(&config.feed_path));
        Self::start_with_ledger(ledger, room_id, &config.owner, &config.feed_state()).map(Some)
    }

    /// Start polling `room_id` on an arbitrary ledger at `feed`'s cadence
    pub fn start_with_ledger(
        ledger: Arc<dyn RoomLedger>,
        room_id: u8,
        owner: &str,
        feed: &FeedState,
    ) -> Result<Self> {
        let poll_interval = feed.poll_interval();
        let rt = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("streamer-tetris-feed")
            .enable_all()
            .build()
            .context("failed to create feed runtime")?;

        let (update_tx, update_rx) = mpsc::unbounded_channel::<FeedUpdate>();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let poller = FeedPoller::new(Arc::clone(&ledger), room_id, owner, poll_interval);
        rt.spawn(poller.run(update_tx, shutdown_rx));
        info!(room_id, owner, poll_ms = feed.poll_interval_ms(), "feed runtime started");

        Ok(Self {
            rt,
            ledger,
            room_id,
            owner: owner.to_string(),
            update_rx,
            shutdown_tx,
            polling: true,
        })
    }

    pub fn room_id(&self) -> u8 {
        self.room_id
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Claim (or renew) the session's room; blocks the calling thread
    pub fn claim(&self) -> std::result::Result<RoomRecord, FeedError> {
        let now = SystemClock.now_secs();
        let claim = ClaimRequest::new(self.owner.clone());
        self.rt
            .block_on(self.ledger.claim_room(self.room_id, &claim, now))
    }

    /// Next pending update, if any
    pub fn try_recv(&mut self) -> Option<FeedUpdate> {
        match self.update_rx.try_recv() {
            Ok(update) => Some(update),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                if self.polling {
                    warn!(room_id = self.room_id, "feed poller stopped");
                    self.polling = false;
                }
                None
            }
        }
    }

    /// False once the poller has exited and every update was drained
    pub fn is_polling(&self) -> bool {
        self.polling
    }

    /// Ask the poller to exit; the runtime stays up for claims
    pub fn stop_polling(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Stop the poller and tear down the runtime
    pub fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        self.rt.shutdown_timeout(Duration::from_millis(250));
        info!("feed runtime stopped");
    }
}
