// SPDX-License-Identifier: MIT

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;
use std::time::Duration;

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var).ok().and_then(|s| s.parse::<u64>().ok()).map(Duration::from_millis)
}

/// `ED_EXPEDITION_DATA_DIR` overrides the platform-default data directory.
pub fn data_dir_override() -> Option<PathBuf> {
    std::env::var_os("ED_EXPEDITION_DATA_DIR").map(PathBuf::from)
}

/// `ED_EXPEDITION_PUBLISH_TIMEOUT_MS` overrides [`expedition_bus::BusConfig`]'s
/// per-subscriber publish deadline.
pub fn publish_timeout_ms() -> Option<Duration> {
    parse_duration_ms("ED_EXPEDITION_PUBLISH_TIMEOUT_MS")
}

/// `ED_EXPEDITION_CHANNEL_CAPACITY` overrides each subscriber's channel depth.
pub fn channel_capacity() -> Option<usize> {
    std::env::var("ED_EXPEDITION_CHANNEL_CAPACITY").ok().and_then(|s| s.parse().ok())
}
