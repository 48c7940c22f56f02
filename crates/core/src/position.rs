// SPDX-License-Identifier: MIT

//! Vertices and edges of the expedition graph.

use serde::{Deserialize, Serialize};

use crate::id::{LinkId, RouteId};

/// Identifies one vertex in the expedition graph: jump `jump_index` of
/// route `route_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutePosition {
    pub route_id: RouteId,
    pub jump_index: usize,
}

impl RoutePosition {
    pub fn new(route_id: RouteId, jump_index: usize) -> Self {
        Self {
            route_id,
            jump_index,
        }
    }
}

/// A directed edge connecting two [`RoutePosition`]s that resolve to the
/// same system id. Links compose multiple routes into one walkable path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub id: LinkId,
    pub from: RoutePosition,
    pub to: RoutePosition,
}

impl Link {
    pub fn new(from: RoutePosition, to: RoutePosition) -> Self {
        Self {
            id: LinkId::new(),
            from,
            to,
        }
    }
}

#[cfg(test)]
#[path = "position_tests.rs"]
mod tests;
