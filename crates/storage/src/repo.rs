// SPDX-License-Identifier: MIT

//! Reading and writing the on-disk records.

use std::fs;
use std::path::{Path, PathBuf};

use expedition_core::{AppState, Expedition, ExpeditionId, ExpeditionIndex, Route, RouteId};

use crate::paths;
use crate::txn::Txn;
use crate::StorageError;

/// A handle bound to one data directory. All reads and writes go through
/// this so callers never have to assemble paths themselves.
#[derive(Debug, Clone)]
pub struct Repo {
    data_dir: PathBuf,
}

impl Repo {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn load_index(&self) -> Result<ExpeditionIndex, StorageError> {
        read_json_or_default(&paths::index_path(&self.data_dir))
    }

    pub fn save_index(&self, index: &ExpeditionIndex) -> Result<(), StorageError> {
        let mut txn = Txn::new();
        txn.stage_json(paths::index_path(&self.data_dir), index)?;
        txn.commit()
    }

    pub fn load_app_state(&self) -> Result<AppState, StorageError> {
        let path = paths::app_state_path(&self.data_dir);
        if !path.exists() {
            return Ok(AppState::empty());
        }
        read_json(&path)
    }

    pub fn save_app_state(&self, state: &AppState) -> Result<(), StorageError> {
        let mut txn = Txn::new();
        txn.stage_json(paths::app_state_path(&self.data_dir), state)?;
        txn.commit()
    }

    pub fn load_expedition(&self, id: ExpeditionId) -> Result<Expedition, StorageError> {
        read_json(&paths::expedition_path(&self.data_dir, id))
    }

    pub fn list_expedition_ids(&self) -> Result<Vec<ExpeditionId>, StorageError> {
        list_uuid_named_files(&paths::expeditions_dir(&self.data_dir))
    }

    /// Persist an expedition and its index entry in one transaction.
    pub fn save_expedition(
        &self,
        expedition: &Expedition,
        index: &ExpeditionIndex,
    ) -> Result<(), StorageError> {
        let mut txn = Txn::new();
        txn.stage_json(
            paths::expedition_path(&self.data_dir, expedition.id),
            expedition,
        )?;
        txn.stage_json(paths::index_path(&self.data_dir), index)?;
        txn.commit()
    }

    pub fn delete_expedition(&self, id: ExpeditionId) -> Result<(), StorageError> {
        let path = paths::expedition_path(&self.data_dir, id);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Bakes and activates an expedition in one transaction: the freshly
    /// baked route, the expedition being superseded (if any), the
    /// newly-active expedition, and the index all land together or not at
    /// all.
    pub fn save_start_expedition(
        &self,
        baked_route: &Route,
        previous: Option<&Expedition>,
        expedition: &Expedition,
        index: &ExpeditionIndex,
    ) -> Result<(), StorageError> {
        let mut txn = Txn::new();
        txn.stage_json(paths::route_path(&self.data_dir, baked_route.id), baked_route)?;
        if let Some(previous) = previous {
            txn.stage_json(paths::expedition_path(&self.data_dir, previous.id), previous)?;
        }
        txn.stage_json(paths::expedition_path(&self.data_dir, expedition.id), expedition)?;
        txn.stage_json(paths::index_path(&self.data_dir), index)?;
        txn.commit()
    }

    pub fn load_route(&self, id: RouteId) -> Result<Route, StorageError> {
        read_json(&paths::route_path(&self.data_dir, id))
    }

    pub fn save_route(&self, route: &Route) -> Result<(), StorageError> {
        let mut txn = Txn::new();
        txn.stage_json(paths::route_path(&self.data_dir, route.id), route)?;
        txn.commit()
    }

    pub fn list_route_ids(&self) -> Result<Vec<RouteId>, StorageError> {
        list_uuid_named_files(&paths::routes_dir(&self.data_dir))
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, StorageError> {
    let bytes = fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn read_json_or_default<T: serde::de::DeserializeOwned + Default>(
    path: &Path,
) -> Result<T, StorageError> {
    if !path.exists() {
        return Ok(T::default());
    }
    read_json(path)
}

fn list_uuid_named_files<Id: From<uuid::Uuid>>(dir: &Path) -> Result<Vec<Id>, StorageError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut ids = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        match stem.parse::<uuid::Uuid>() {
            Ok(uuid) => ids.push(Id::from(uuid)),
            Err(_) => tracing::warn!(file = %path.display(), "skipping non-uuid file in data directory"),
        }
    }
    Ok(ids)
}

#[cfg(test)]
#[path = "repo_tests.rs"]
mod tests;
