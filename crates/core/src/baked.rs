// SPDX-License-Identifier: MIT

//! Flattening an expedition's graph of routes and links into one walkable
//! sequence of jumps.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::expedition::Expedition;
use crate::id::{ExpeditionId, RouteId};
use crate::position::RoutePosition;
use crate::route::{Route, RouteJump};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BakeError {
    #[error("expedition has no start position set")]
    NoStart,
    #[error("route {0} referenced by the expedition graph is not loaded")]
    UnknownRoute(RouteId),
    #[error("position {position:?} indexes past the end of route {route}")]
    IndexOutOfRange {
        route: RouteId,
        position: RoutePosition,
    },
}

/// The flattened, walkable path produced by [`bake_route`].
///
/// `source` records which [`RoutePosition`] each entry in `jumps` came
/// from, so the engine can map an observed jump back to the route/link
/// graph the expedition was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BakedRoute {
    pub id: RouteId,
    pub expedition_id: ExpeditionId,
    pub jumps: Vec<RouteJump>,
    pub source: Vec<RoutePosition>,
    /// Set when the walk revisits a position it already passed through;
    /// holds the index in `jumps` where the loop closes.
    pub loop_back_index: Option<usize>,
}

/// Walks `expedition`'s routes and links starting at `expedition.start`,
/// producing one flat [`BakedRoute`].
///
/// Consecutive jumps landing on the same system id (a link boundary that
/// resolves to the same star) are collapsed into a single entry. The walk
/// stops when it runs out of route or link to follow, or when it revisits
/// a position already seen, in which case `loop_back_index` records where
/// the loop closes and the walk stops before duplicating it again.
pub fn bake_route(
    expedition: &Expedition,
    routes: &HashMap<RouteId, Route>,
) -> Result<BakedRoute, BakeError> {
    let start = expedition.start.ok_or(BakeError::NoStart)?;

    let links: HashMap<RoutePosition, RoutePosition> = expedition
        .links
        .iter()
        .map(|link| (link.from, link.to))
        .collect();

    let mut jumps = Vec::new();
    let mut source = Vec::new();
    let mut seen: HashSet<RoutePosition> = HashSet::new();
    let mut loop_back_index = None;
    let mut last_system_id: Option<i64> = None;
    let mut current = start;

    loop {
        if seen.contains(&current) {
            loop_back_index = source.iter().position(|&p| p == current);
            break;
        }
        seen.insert(current);

        let route = routes
            .get(&current.route_id)
            .ok_or(BakeError::UnknownRoute(current.route_id))?;
        let jump = route
            .jumps
            .get(current.jump_index)
            .ok_or(BakeError::IndexOutOfRange {
                route: current.route_id,
                position: current,
            })?;

        if last_system_id != Some(jump.system_id) {
            jumps.push(jump.clone());
            source.push(current);
            last_system_id = Some(jump.system_id);
        }

        let next_in_route = current.jump_index + 1 < route.jumps.len();
        current = if next_in_route {
            RoutePosition::new(current.route_id, current.jump_index + 1)
        } else if let Some(&linked) = links.get(&current) {
            linked
        } else {
            break;
        };
    }

    Ok(BakedRoute {
        id: RouteId::new(),
        expedition_id: expedition.id,
        jumps,
        source,
        loop_back_index,
    })
}

#[cfg(test)]
#[path = "baked_tests.rs"]
mod tests;
