//! Streamer Tetris runner (default binary).
//!
//! Drives one game session at a fixed 16ms cadence, reads keyboard input with
//! crossterm, and applies room feed updates between ticks. Logs go to a file
//! (`TETRIS_LOG_PATH`) so they never interleave with the status line.

mod status;

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use streamer_tetris::core::{FeedDecision, GameSession, PieceArbiter, SimpleRng, SystemClock};
use streamer_tetris::feed::config::{read_env_string, read_env_u32};
use streamer_tetris::feed::{FeedConfig, FeedRuntime};
use streamer_tetris::input::{handle_key_event, is_reclaim_key, should_quit};
use streamer_tetris::types::TICK_MS;

use status::StatusLine;

const DEFAULT_LOG_PATH: &str = "streamer-tetris.log";

/// Binary-level settings from environment variables.
struct AppConfig {
    seed: u32,
    log_path: PathBuf,
}

impl AppConfig {
    fn from_env() -> Self {
        Self {
            seed: read_env_u32("TETRIS_SEED", time_seed()),
            log_path: read_env_string("TETRIS_LOG_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_PATH)),
        }
    }
}

fn time_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}

fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let config = AppConfig::from_env();
    init_logging(&config.log_path)?;

    let feed_config = FeedConfig::from_env();
    let mut feed = FeedRuntime::start(&feed_config)?;

    let arbiter = if feed.is_some() {
        PieceArbiter::with_feed(feed_config.feed_state())
    } else {
        PieceArbiter::local_only()
    };
    let mut session = GameSession::with_sources(
        Box::new(SimpleRng::new(config.seed)),
        Box::new(SystemClock),
        arbiter,
    );
    info!(
        seed = config.seed,
        room_id = ?feed_config.room_id,
        feed = feed.is_some(),
        "session created"
    );

    if let Some(feed) = feed.as_mut() {
        claim_room(&mut session, feed);
    }

    let mut status = StatusLine::new(feed.is_some());
    status.enter()?;

    let result = run(&mut session, feed.as_mut(), &mut status);

    // Always try to restore terminal state.
    let _ = status.exit();
    if let Some(feed) = feed {
        feed.shutdown();
    }
    info!(
        score = session.score(),
        lines = session.lines(),
        level = session.level(),
        "session ended"
    );
    result
}

fn claim_room(session: &mut GameSession, feed: &mut FeedRuntime) {
    match feed.claim() {
        Ok(record) => {
            // Reads queued before the claim may predate it; the next poll
            // reports the room again.
            while feed.try_recv().is_some() {}
            session.reclaim_room();
            info!(
                room_id = feed.room_id(),
                room_name = %record.room_name,
                "room claimed; viewer picks enabled"
            );
        }
        Err(err) => warn!(room_id = feed.room_id(), %err, "room claim failed"),
    }
}

fn run(
    session: &mut GameSession,
    mut feed: Option<&mut FeedRuntime>,
    status: &mut StatusLine,
) -> Result<()> {
    let tick_duration = Duration::from_millis(TICK_MS as u64);
    let mut last_tick = Instant::now();
    let mut feed_active = session.feed_active();

    loop {
        status.draw(&session.snapshot())?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if should_quit(key) {
                    return Ok(());
                }
                if is_reclaim_key(key) {
                    if let Some(feed) = feed.as_deref_mut() {
                        claim_room(session, feed);
                    }
                } else if let Some(action) = handle_key_event(key, session.status()) {
                    if session.apply_action(action) {
                        debug!(action = action.as_str(), "action applied");
                    }
                }
            }
        }

        if let Some(feed) = feed.as_deref_mut() {
            while let Some(update) = feed.try_recv() {
                log_decision(session.apply_feed(update));
            }
            if !feed.is_polling() && session.arbiter().feed_enabled() {
                session.arbiter_mut().set_feed_enabled(false);
                warn!("room feed off; local pieces only");
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            session.tick(TICK_MS);

            if let Some(event) = session.take_last_event() {
                debug!(
                    piece = event.kind.as_str(),
                    lines = event.lines_cleared,
                    points = event.line_clear_score,
                    "piece locked"
                );
                if let Some(level) = event.new_level {
                    info!(level, "level up");
                }
                if event.game_over {
                    info!(score = session.score(), lines = session.lines(), "game over");
                }
            }
        }

        let now_active = session.feed_active();
        if now_active != feed_active {
            feed_active = now_active;
            info!(active = feed_active, "room feed state changed");
        }
    }
}

fn log_decision(decision: FeedDecision) {
    match decision {
        FeedDecision::Applied(kind) => info!(piece = kind.as_str(), "viewer piece queued"),
        FeedDecision::Deactivated(reason) => {
            info!(reason = reason.as_str(), "room feed deactivated")
        }
        FeedDecision::Expired => debug!("room expired; selection ignored"),
        other => debug!(decision = other.as_str(), "selection ignored"),
    }
}
