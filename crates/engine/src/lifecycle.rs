// SPDX-License-Identifier: MIT

//! CRUD on expeditions that doesn't require the live engine's in-memory
//! state (no active expedition, no baked route, no jump state machine).
//! Starting, ending, and completing an expedition do need that state and
//! live on [`crate::ExpeditionEngine`] instead.

use chrono::Utc;
use expedition_core::{
    Expedition, ExpeditionId, ExpeditionIndex, ExpeditionSummary, Link, LinkId, Route, RouteId,
    RoutePosition,
};
use expedition_storage::Repo;

use crate::EngineError;

pub fn create_expedition(repo: &Repo, index: &mut ExpeditionIndex) -> Result<ExpeditionId, EngineError> {
    let expedition = Expedition::new(ExpeditionId::new());
    index.upsert(ExpeditionSummary::from(&expedition));
    repo.save_expedition(&expedition, index)?;
    Ok(expedition.id)
}

pub fn delete_expedition(
    repo: &Repo,
    index: &mut ExpeditionIndex,
    id: ExpeditionId,
) -> Result<(), EngineError> {
    let expedition = repo.load_expedition(id)?;
    if !expedition.is_editable() {
        return Err(EngineError::NotEditable(id));
    }
    repo.delete_expedition(id)?;
    index.remove(id);
    repo.save_index(index)?;
    Ok(())
}

pub fn rename_expedition(
    repo: &Repo,
    index: &mut ExpeditionIndex,
    id: ExpeditionId,
    name: String,
) -> Result<(), EngineError> {
    let mut expedition = repo.load_expedition(id)?;
    if !expedition.is_editable() {
        return Err(EngineError::NotEditable(id));
    }
    expedition.name = name;
    expedition.last_updated = Utc::now();
    index.upsert(ExpeditionSummary::from(&expedition));
    repo.save_expedition(&expedition, index)?;
    Ok(())
}

/// Attaches `route` (already plotted elsewhere) to an expedition. The
/// first route attached seeds the expedition's name and start position if
/// neither is set yet.
// TODO: an error partway through this leaves `route` saved but unattached
pub fn add_route_to_expedition(
    repo: &Repo,
    index: &mut ExpeditionIndex,
    expedition_id: ExpeditionId,
    route: &Route,
) -> Result<(), EngineError> {
    repo.save_route(route)?;

    let mut expedition = repo.load_expedition(expedition_id)?;
    if !expedition.is_editable() {
        return Err(EngineError::NotEditable(expedition_id));
    }
    let is_first_route = expedition.routes.is_empty();

    expedition.routes.push(route.id);

    if expedition.start.is_none() && !route.jumps.is_empty() {
        expedition.start = Some(RoutePosition::new(route.id, 0));
    }

    if is_first_route && expedition.name.is_empty() {
        expedition.name = route.name.clone();
    }
    expedition.last_updated = Utc::now();

    index.upsert(ExpeditionSummary::from(&expedition));
    repo.save_expedition(&expedition, index)?;
    Ok(())
}

pub fn remove_route_from_expedition(
    repo: &Repo,
    index: &ExpeditionIndex,
    expedition_id: ExpeditionId,
    route_id: RouteId,
) -> Result<(), EngineError> {
    let mut expedition = repo.load_expedition(expedition_id)?;
    if !expedition.is_editable() {
        return Err(EngineError::NotEditable(expedition_id));
    }
    if !expedition.has_route(route_id) {
        return Err(EngineError::RouteNotAttached(route_id));
    }

    expedition.routes.retain(|id| *id != route_id);
    expedition
        .links
        .retain(|link| link.from.route_id != route_id && link.to.route_id != route_id);

    if expedition.start.is_some_and(|start| start.route_id == route_id) {
        expedition.start = expedition.routes.first().map(|id| RoutePosition::new(*id, 0));
    }
    expedition.last_updated = Utc::now();

    repo.save_expedition(&expedition, index)?;
    Ok(())
}

pub fn create_link(
    repo: &Repo,
    index: &ExpeditionIndex,
    expedition_id: ExpeditionId,
    from: RoutePosition,
    to: RoutePosition,
) -> Result<(), EngineError> {
    let mut expedition = repo.load_expedition(expedition_id)?;
    if !expedition.is_editable() {
        return Err(EngineError::NotEditable(expedition_id));
    }

    let link = Link::new(from, to);
    validate_link(repo, &expedition, &link)?;

    expedition.links.push(link);
    expedition.last_updated = Utc::now();
    repo.save_expedition(&expedition, index)?;
    Ok(())
}

pub fn delete_link(
    repo: &Repo,
    index: &ExpeditionIndex,
    expedition_id: ExpeditionId,
    link_id: LinkId,
) -> Result<(), EngineError> {
    let mut expedition = repo.load_expedition(expedition_id)?;
    if !expedition.is_editable() {
        return Err(EngineError::NotEditable(expedition_id));
    }

    let before = expedition.links.len();
    expedition.links.retain(|link| link.id != link_id);
    if expedition.links.len() == before {
        return Err(EngineError::LinkNotFound(link_id));
    }
    expedition.last_updated = Utc::now();
    repo.save_expedition(&expedition, index)?;
    Ok(())
}

fn validate_link(repo: &Repo, expedition: &Expedition, link: &Link) -> Result<(), EngineError> {
    if !expedition.has_route(link.from.route_id) {
        return Err(EngineError::RouteNotAttached(link.from.route_id));
    }
    if !expedition.has_route(link.to.route_id) {
        return Err(EngineError::RouteNotAttached(link.to.route_id));
    }
    if expedition.links.iter().any(|l| l.from == link.from) {
        return Err(EngineError::DuplicateOutgoingLink(link.from.route_id));
    }

    let from_route = repo.load_route(link.from.route_id)?;
    let to_route = repo.load_route(link.to.route_id)?;

    if link.from.jump_index >= from_route.jumps.len() {
        return Err(EngineError::LinkIndexOutOfBounds(link.from.route_id));
    }
    if link.to.jump_index >= to_route.jumps.len() {
        return Err(EngineError::LinkIndexOutOfBounds(link.to.route_id));
    }

    let from_system = from_route.jumps[link.from.jump_index].system_id;
    let to_system = to_route.jumps[link.to.jump_index].system_id;
    if from_system != to_system {
        return Err(EngineError::LinkSystemMismatch);
    }

    Ok(())
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
