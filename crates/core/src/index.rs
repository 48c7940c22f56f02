// SPDX-License-Identifier: MIT

//! The top-level catalogue of expeditions, one entry per expedition file
//! on disk.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::expedition::{Expedition, ExpeditionStatus};
use crate::id::ExpeditionId;

/// A lightweight projection of an [`Expedition`], cheap to list without
/// loading every expedition file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpeditionSummary {
    pub id: ExpeditionId,
    pub name: String,
    pub status: ExpeditionStatus,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl From<&Expedition> for ExpeditionSummary {
    fn from(expedition: &Expedition) -> Self {
        Self {
            id: expedition.id,
            name: expedition.name.clone(),
            status: expedition.status,
            created_at: expedition.created_at,
            last_updated: expedition.last_updated,
        }
    }
}

/// `index.json`: the list of known expeditions plus which one, if any, is
/// currently active. At most one expedition may be active at a time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExpeditionIndex {
    pub expeditions: Vec<ExpeditionSummary>,
    pub active: Option<ExpeditionId>,
}

impl ExpeditionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&mut self, summary: ExpeditionSummary) {
        match self.expeditions.iter_mut().find(|e| e.id == summary.id) {
            Some(existing) => *existing = summary,
            None => self.expeditions.push(summary),
        }
    }

    pub fn remove(&mut self, id: ExpeditionId) {
        self.expeditions.retain(|e| e.id != id);
        if self.active == Some(id) {
            self.active = None;
        }
    }

    pub fn set_active(&mut self, id: Option<ExpeditionId>) {
        self.active = id;
    }
}

#[cfg(test)]
#[path = "index_tests.rs"]
mod tests;
