// SPDX-License-Identifier: MIT

//! Resolves where on disk the companion keeps its data.

use std::path::{Path, PathBuf};

use expedition_core::{ExpeditionId, RouteId};

use crate::StorageError;

const APP_DIR_NAME: &str = "ed-expedition";

/// Resolve the root data directory.
///
/// `override_dir` wins outright (this is what the daemon's `-j`/`--data-dir`
/// flag feeds in). Otherwise the platform convention is followed:
///
/// - Windows: `%APPDATA%\ed-expedition`
/// - macOS: `~/Library/Application Support/ed-expedition`
/// - everything else: `$XDG_DATA_HOME/ed-expedition`, falling back to
///   `~/.local/share/ed-expedition`
pub fn data_dir(override_dir: Option<PathBuf>) -> Result<PathBuf, StorageError> {
    if let Some(dir) = override_dir {
        return Ok(dir);
    }

    #[cfg(target_os = "windows")]
    {
        let appdata = std::env::var_os("APPDATA").ok_or(StorageError::NoDataDir)?;
        Ok(PathBuf::from(appdata).join(APP_DIR_NAME))
    }

    #[cfg(target_os = "macos")]
    {
        let home = dirs::home_dir().ok_or(StorageError::NoDataDir)?;
        Ok(home
            .join("Library")
            .join("Application Support")
            .join(APP_DIR_NAME))
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_DATA_HOME") {
            return Ok(PathBuf::from(xdg).join(APP_DIR_NAME));
        }
        let home = dirs::home_dir().ok_or(StorageError::NoDataDir)?;
        Ok(home.join(".local").join("share").join(APP_DIR_NAME))
    }
}

pub fn index_path(data_dir: &Path) -> PathBuf {
    data_dir.join("index.json")
}

pub fn app_state_path(data_dir: &Path) -> PathBuf {
    data_dir.join("app-state.json")
}

pub fn expeditions_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("expeditions")
}

pub fn expedition_path(data_dir: &Path, id: ExpeditionId) -> PathBuf {
    expeditions_dir(data_dir).join(format!("{id}.json"))
}

pub fn routes_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("routes")
}

pub fn route_path(data_dir: &Path, id: RouteId) -> PathBuf {
    routes_dir(data_dir).join(format!("{id}.json"))
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;
