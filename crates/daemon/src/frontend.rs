// SPDX-License-Identifier: MIT

//! The handle a GUI frontend embeds against. Channel names and request
//! verbs both follow the external contract verbatim; everything here is a
//! thin, renamed delegation onto one [`ExpeditionEngine`].

use expedition_bus::Subscription;
use expedition_core::{
    Expedition, ExpeditionId, ExpeditionSummary, JumpHistoryEntry, LinkId, Route, RouteId,
    RoutePosition,
};
use expedition_engine::{EngineError, ExpeditionEngine, FuelAlert};
use expedition_tailer::FsdTargetEvent;

/// Cheap to clone: wraps one [`ExpeditionEngine`], itself cheap to clone.
#[derive(Clone)]
pub struct Frontend {
    engine: ExpeditionEngine,
}

impl Frontend {
    pub fn new(engine: ExpeditionEngine) -> Self {
        Self { engine }
    }

    pub fn jump_history(&self) -> Subscription<JumpHistoryEntry> {
        self.engine.buses().jump_history.subscribe()
    }

    pub fn target(&self) -> Subscription<FsdTargetEvent> {
        self.engine.buses().target.subscribe()
    }

    pub fn complete_expedition(&self) -> Subscription<Expedition> {
        self.engine.buses().complete_expedition.subscribe()
    }

    pub fn current_jump(&self) -> Subscription<JumpHistoryEntry> {
        self.engine.buses().current_jump.subscribe()
    }

    pub fn fuel_alert(&self) -> Subscription<FuelAlert> {
        self.engine.buses().fuel_alert.subscribe()
    }

    pub async fn get_expedition_summaries(&self) -> Vec<ExpeditionSummary> {
        self.engine.get_expedition_summaries().await
    }

    pub async fn create_expedition(&self) -> Result<ExpeditionId, EngineError> {
        self.engine.create_expedition().await
    }

    pub fn load_expedition(&self, id: ExpeditionId) -> Result<Expedition, EngineError> {
        self.engine.load_expedition(id)
    }

    pub fn load_routes(&self, expedition_id: ExpeditionId) -> Result<Vec<Route>, EngineError> {
        self.engine.load_routes(expedition_id)
    }

    /// Attaches a route a plotter collaborator has already produced.
    /// `PlotRoute` itself — talking to a third-party plotting service — is
    /// not this crate's concern.
    pub async fn add_plotted_route(
        &self,
        expedition_id: ExpeditionId,
        route: Route,
    ) -> Result<(), EngineError> {
        self.engine.add_route_to_expedition(expedition_id, route).await
    }

    pub async fn delete_expedition(&self, id: ExpeditionId) -> Result<(), EngineError> {
        self.engine.delete_expedition(id).await
    }

    pub async fn rename_expedition(&self, id: ExpeditionId, name: String) -> Result<(), EngineError> {
        self.engine.rename_expedition(id, name).await
    }

    pub async fn remove_route_from_expedition(
        &self,
        expedition_id: ExpeditionId,
        route_id: RouteId,
    ) -> Result<(), EngineError> {
        self.engine
            .remove_route_from_expedition(expedition_id, route_id)
            .await
    }

    pub async fn create_link(
        &self,
        expedition_id: ExpeditionId,
        from: RoutePosition,
        to: RoutePosition,
    ) -> Result<(), EngineError> {
        self.engine.create_link(expedition_id, from, to).await
    }

    pub async fn delete_link(
        &self,
        expedition_id: ExpeditionId,
        link_id: LinkId,
    ) -> Result<(), EngineError> {
        self.engine.delete_link(expedition_id, link_id).await
    }

    pub async fn start_expedition(&self, id: ExpeditionId) -> Result<(), EngineError> {
        self.engine.start_expedition(id).await
    }

    pub async fn end_active_expedition(&self) -> Result<(), EngineError> {
        self.engine.end_active_expedition().await
    }

    pub async fn load_active_expedition(&self) -> Option<Expedition> {
        self.engine.load_active_expedition().await
    }
}
