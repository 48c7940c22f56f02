// SPDX-License-Identifier: MIT

//! Gathers the daemon's tunables from CLI flags and environment overrides
//! in one place, so `main` doesn't thread individual settings through by
//! hand and a GUI embedding this crate has one struct to construct.

use std::path::PathBuf;

use expedition_bus::BusConfig;
use expedition_storage::StorageError;

use crate::env;

/// Resolved settings for one [`crate::start`] call.
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub journal_dir: PathBuf,
    pub data_dir: PathBuf,
    pub bus_config: BusConfig,
}

impl DaemonConfig {
    /// `data_dir_override` (typically a CLI flag) wins over
    /// `ED_EXPEDITION_DATA_DIR`, which wins over the platform default.
    /// Publish timeout and channel capacity fall back to
    /// [`BusConfig::default`] when their env vars aren't set.
    pub fn load(journal_dir: PathBuf, data_dir_override: Option<PathBuf>) -> Result<Self, StorageError> {
        let data_dir = expedition_storage::data_dir(data_dir_override.or_else(env::data_dir_override))?;

        let mut bus_config = BusConfig::default();
        if let Some(capacity) = env::channel_capacity() {
            bus_config.subscriber_capacity = capacity;
        }
        if let Some(timeout) = env::publish_timeout_ms() {
            bus_config.publish_timeout = timeout;
        }

        Ok(Self {
            journal_dir,
            data_dir,
            bus_config,
        })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
