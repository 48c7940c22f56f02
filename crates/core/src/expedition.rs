// SPDX-License-Identifier: MIT

//! The durable expedition record and its lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{ExpeditionId, RouteId};
use crate::position::{Link, RoutePosition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpeditionStatus {
    Planned,
    Active,
    Completed,
    Ended,
}

/// Immutable record written once per observed jump.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JumpHistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub system_name: String,
    pub system_id: i64,
    /// Index into the baked route this jump landed on; `None` means the
    /// jump was a detour off the route.
    pub baked_index: Option<usize>,
    pub distance_ly: f64,
    pub fuel_used_ly: Option<f64>,
    pub fuel_level_ly: Option<f64>,
    /// The jump matched the next expected position on the route.
    pub expected: bool,
    /// Reserved for gap-fill synthesis; may be unset at write time.
    #[serde(default)]
    pub synthetic: bool,
}

/// Durable record of one journey.
///
/// See module invariants enforced by [`crate::ExpeditionIndex`] and the
/// expedition engine rather than by this type itself (this struct is a
/// plain data record; the invariants require cross-referencing the index
/// and the baked route, which live in other files on disk).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expedition {
    pub id: ExpeditionId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub status: ExpeditionStatus,
    pub start: Option<RoutePosition>,
    pub routes: Vec<RouteId>,
    pub links: Vec<Link>,
    pub baked_route_id: Option<RouteId>,
    /// -1 means "not yet confirmed on route".
    pub current_baked_index: i64,
    pub baked_loop_back_index: Option<usize>,
    pub jump_history: Vec<JumpHistoryEntry>,
}

impl Expedition {
    pub fn new(id: ExpeditionId) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: String::new(),
            created_at: now,
            last_updated: now,
            status: ExpeditionStatus::Planned,
            start: None,
            routes: Vec::new(),
            links: Vec::new(),
            baked_route_id: None,
            current_baked_index: -1,
            baked_loop_back_index: None,
            jump_history: Vec::new(),
        }
    }

    /// Mutable only while `planned` (§3 invariants).
    pub fn is_editable(&self) -> bool {
        self.status == ExpeditionStatus::Planned
    }

    pub fn has_route(&self, route_id: RouteId) -> bool {
        self.routes.contains(&route_id)
    }
}

#[cfg(test)]
#[path = "expedition_tests.rs"]
mod tests;
