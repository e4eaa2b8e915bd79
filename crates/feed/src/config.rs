//! Feed configuration from environment variables
//!
//! - `TETRIS_ROOM_ID`: room to claim and poll (unset: local pieces only)
//! - `TETRIS_SESSION_OWNER`: owner identity used for claims and ownership checks
//! - `TETRIS_FEED_PATH`: JSON ledger file (default: "rooms.json")
//! - `TETRIS_FEED_POLL_MS`: poll cadence in milliseconds (default: 2000)
//! - `TETRIS_FEED_DISABLED`: set to "1" or "true" to disable the feed entirely

use std::env;
use std::path::PathBuf;
use crate::core::FeedState;
use crate::types::{FEED_POLL_MS, ROOMS_COUNT, ROOM_EXPIRY_SECS};

pub const DEFAULT_FEED_PATH: &str = "rooms.json";
pub const DEFAULT_OWNER: &str = "local-streamer";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedConfig {
    pub room_id: Option<u8>,
    pub owner: String,
    pub feed_path: PathBuf,
    pub poll_interval_ms: u64,
    pub disabled: bool,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            room_id: None,
            owner: DEFAULT_OWNER.to_string(),
            feed_path: PathBuf::from(DEFAULT_FEED_PATH),
            poll_interval_ms: FEED_POLL_MS,
            disabled: false,
        }
    }
}

impl FeedConfig {
    pub fn from_env() -> Self {
        let room_id = env::var("TETRIS_ROOM_ID")
            .ok()
            .and_then(|s| s.trim().parse::<u8>().ok())
            .filter(|id| *id < ROOMS_COUNT);
        let owner = read_env_string("TETRIS_SESSION_OWNER")
            .or_else(|| read_env_string("USER"))
            .unwrap_or_else(|| DEFAULT_OWNER.to_string());
        let feed_path = read_env_string("TETRIS_FEED_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FEED_PATH));

        Self {
            room_id,
            owner,
            feed_path,
            poll_interval_ms: read_env_u64("TETRIS_FEED_POLL_MS", FEED_POLL_MS),
            disabled: read_env_bool("TETRIS_FEED_DISABLED", false),
        }
    }

    /// A room is configured and the feed is not switched off
    pub fn is_enabled(&self) -> bool {
        !self.disabled && self.room_id.is_some()
    }

    /// Feed bookkeeping for a session polling with this config
    pub fn feed_state(&self) -> FeedState {
        FeedState::new(self.poll_interval_ms, ROOM_EXPIRY_SECS)
    }
}

/// Non-empty, trimmed string value
pub fn read_env_string(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn read_env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}

pub fn read_env_u32(name: &str, default: u32) -> u32 {
    env::var(name)
        .ok()
        .and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}

pub fn read_env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .map(|value| {
            matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            )
        })
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_default_config_is_local_only() {
        let config = FeedConfig::default();
        assert!(!config.is_enabled());
        assert_eq!(config.feed_state().poll_interval(), Duration::from_millis(2000));
        assert_eq!(config.feed_state().staleness_threshold_secs(), 120);
        assert_eq!(config.feed_path, PathBuf::from("rooms.json"));
    }

    #[test]
    fn test_enabled_needs_room_and_not_disabled() {
        let mut config = FeedConfig {
            room_id: Some(4),
            ..FeedConfig::default()
        };
        assert!(config.is_enabled());
        config.disabled = true;
        assert!(!config.is_enabled());
    }

    #[test]
    fn test_feed_config_from_env() {
        // This test just ensures it doesn't panic
        let _config = FeedConfig::from_env();
    }

    #[test]
    fn test_missing_env_falls_back() {
        assert_eq!(read_env_u64("TETRIS_TEST_UNSET_U64", 7), 7);
        assert!(!read_env_bool("TETRIS_TEST_UNSET_BOOL", false));
        assert_eq!(read_env_string("TETRIS_TEST_UNSET_STRING"), None);
    }

    #[test]
    fn test_zero_numbers_fall_back() {
        env::set_var("TETRIS_TEST_ZERO_U64", "0");
        env::set_var("TETRIS_TEST_ZERO_U32", " 0 ");
        env::set_var("TETRIS_TEST_SET_U32", "42");
        assert_eq!(read_env_u64("TETRIS_TEST_ZERO_U64", 2000), 2000);
        assert_eq!(read_env_u32("TETRIS_TEST_ZERO_U32", 9), 9);
        assert_eq!(read_env_u32("TETRIS_TEST_SET_U32", 9), 42);
    }
}
