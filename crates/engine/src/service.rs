// SPDX-License-Identifier: MIT

//! The expedition progress engine: owns every piece of mutable expedition
//! state in memory, reconciles journal events against the baked route, and
//! drives lifecycle transitions. Request-verb methods and the journal event
//! loop share state through a `parking_lot::Mutex` rather than message
//! passing — the lock is taken and released within a single synchronous
//! block and never held across an `.await`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use expedition_bus::{Bus, BusConfig};
use expedition_core::{
    bake_route, Expedition, ExpeditionId, ExpeditionIndex, ExpeditionStatus, ExpeditionSummary,
    JumpHistoryEntry, LinkId, Route, RouteId, RouteJump, RoutePosition,
};
use expedition_storage::Repo;
use expedition_tailer::{
    FsdJumpEvent, FsdTargetEvent, FuelStatus, JournalBuses, JumpType, StatusBuses,
};
use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot};

use crate::classify::{classify_jump, reached_route_end};
use crate::fuel::{project_fuel_alert, FuelAlert};
use crate::jump::{ChargeState, ChargeToken, JumpStateMachine, CHARGE_TIMEOUT};
use crate::lifecycle;
use crate::notifier::{ExpeditionNotifier, NoopNotifier};
use crate::EngineError;

/// How long after a fuel-scooping edge falls to re-save the expedition, so
/// the final tank reading lands on disk without saving on every tick of
/// the scoop.
const REFUEL_SAVE_DEBOUNCE: Duration = Duration::from_secs(1);

/// Output channels a GUI frontend subscribes to.
pub struct EngineBuses {
    pub jump_history: Bus<JumpHistoryEntry>,
    pub target: Bus<FsdTargetEvent>,
    pub complete_expedition: Bus<Expedition>,
    pub current_jump: Bus<JumpHistoryEntry>,
    pub fuel_alert: Bus<FuelAlert>,
}

impl EngineBuses {
    pub fn new(config: BusConfig) -> Self {
        Self {
            jump_history: Bus::new(config),
            target: Bus::new(config),
            complete_expedition: Bus::new(config),
            current_jump: Bus::new(config),
            fuel_alert: Bus::new(config),
        }
    }
}

struct EngineState {
    index: ExpeditionIndex,
    active: Option<Expedition>,
    baked_jumps: Vec<RouteJump>,
    /// Index into `active.jump_history` of the most recently recorded jump.
    current_jump: Option<usize>,
    jump_state: JumpStateMachine,
    previously_scooping: bool,
}

/// Fed by the background timer tasks spawned from [`ExpeditionEngine::run`],
/// replacing a goroutine/`time.AfterFunc` pair with an owned channel so the
/// run loop reads its own live state at fire time rather than closing over
/// a shared pointer.
enum EngineTick {
    ChargingTimeout(ChargeToken),
    RefuelSave,
}

/// Cheap to clone: every field is an `Arc` (or a `Bus<T>`, itself
/// Arc-backed) or a [`Repo`] (also cheap to clone), so clones share one
/// in-memory expedition state with the instance driving [`Self::run`].
#[derive(Clone)]
pub struct ExpeditionEngine {
    state: Arc<Mutex<EngineState>>,
    repo: Repo,
    notifier: Arc<dyn ExpeditionNotifier>,
    buses: Arc<EngineBuses>,
}

impl ExpeditionEngine {
    pub fn new(repo: Repo, buses: EngineBuses) -> Result<Self, EngineError> {
        Self::with_notifier(repo, buses, Arc::new(NoopNotifier))
    }

    pub fn with_notifier(
        repo: Repo,
        buses: EngineBuses,
        notifier: Arc<dyn ExpeditionNotifier>,
    ) -> Result<Self, EngineError> {
        let index = repo.load_index()?;
        Ok(Self {
            state: Arc::new(Mutex::new(EngineState {
                index,
                active: None,
                baked_jumps: Vec::new(),
                current_jump: None,
                jump_state: JumpStateMachine::new(),
                previously_scooping: false,
            })),
            repo,
            notifier,
            buses: Arc::new(buses),
        })
    }

    pub fn buses(&self) -> &EngineBuses {
        &self.buses
    }

    /// Reloads whatever expedition the index says is active and its baked
    /// route, so a restart with the same data directory recovers the same
    /// in-memory state it had before shutting down.
    pub fn resume_active(&self) -> Result<(), EngineError> {
        let active_id = self.state.lock().index.active;
        let Some(id) = active_id else {
            return Ok(());
        };

        let expedition = self.repo.load_expedition(id)?;
        let baked_jumps = match expedition.baked_route_id {
            Some(route_id) => self.repo.load_route(route_id)?.jumps,
            None => Vec::new(),
        };
        let current_jump = match expedition.jump_history.len() {
            0 => None,
            len => Some(len - 1),
        };

        let mut state = self.state.lock();
        state.baked_jumps = baked_jumps;
        state.current_jump = current_jump;
        state.active = Some(expedition);
        Ok(())
    }

    // --- Request verbs (the GUI-facing surface) -------------------------

    pub async fn get_expedition_summaries(&self) -> Vec<ExpeditionSummary> {
        self.state.lock().index.expeditions.clone()
    }

    pub async fn load_active_expedition(&self) -> Option<Expedition> {
        self.state.lock().active.clone()
    }

    pub fn load_expedition(&self, id: ExpeditionId) -> Result<Expedition, EngineError> {
        Ok(self.repo.load_expedition(id)?)
    }

    pub fn load_routes(&self, expedition_id: ExpeditionId) -> Result<Vec<Route>, EngineError> {
        let expedition = self.repo.load_expedition(expedition_id)?;
        expedition
            .routes
            .iter()
            .map(|route_id| Ok(self.repo.load_route(*route_id)?))
            .collect()
    }

    pub async fn create_expedition(&self) -> Result<ExpeditionId, EngineError> {
        let mut state = self.state.lock();
        lifecycle::create_expedition(&self.repo, &mut state.index)
    }

    /// Attaches an already-plotted route (plotting itself is out of scope
    /// here — a third-party plotter collaborator produces `route`).
    pub async fn add_route_to_expedition(
        &self,
        expedition_id: ExpeditionId,
        route: Route,
    ) -> Result<(), EngineError> {
        let mut state = self.state.lock();
        lifecycle::add_route_to_expedition(&self.repo, &mut state.index, expedition_id, &route)
    }

    pub async fn delete_expedition(&self, id: ExpeditionId) -> Result<(), EngineError> {
        {
            let mut state = self.state.lock();
            lifecycle::delete_expedition(&self.repo, &mut state.index, id)?;
        }
        self.notifier.expedition_deleted(id);
        Ok(())
    }

    pub async fn rename_expedition(&self, id: ExpeditionId, name: String) -> Result<(), EngineError> {
        let mut state = self.state.lock();
        lifecycle::rename_expedition(&self.repo, &mut state.index, id, name)
    }

    pub async fn remove_route_from_expedition(
        &self,
        expedition_id: ExpeditionId,
        route_id: RouteId,
    ) -> Result<(), EngineError> {
        let state = self.state.lock();
        lifecycle::remove_route_from_expedition(&self.repo, &state.index, expedition_id, route_id)
    }

    pub async fn create_link(
        &self,
        expedition_id: ExpeditionId,
        from: RoutePosition,
        to: RoutePosition,
    ) -> Result<(), EngineError> {
        let state = self.state.lock();
        lifecycle::create_link(&self.repo, &state.index, expedition_id, from, to)
    }

    pub async fn delete_link(
        &self,
        expedition_id: ExpeditionId,
        link_id: LinkId,
    ) -> Result<(), EngineError> {
        let state = self.state.lock();
        lifecycle::delete_link(&self.repo, &state.index, expedition_id, link_id)
    }

    pub async fn end_active_expedition(&self) -> Result<(), EngineError> {
        let mut state = self.state.lock();
        let Some(expedition) = state.active.take() else {
            return Err(EngineError::NoActiveExpedition);
        };
        let original = expedition.clone();

        match self.finish_active_locked(&mut state, expedition, ExpeditionStatus::Ended) {
            Ok(ended) => {
                state.baked_jumps = Vec::new();
                state.current_jump = None;
                drop(state);
                self.notifier.expedition_ended(&ended);
                Ok(())
            }
            Err(err) => {
                state.active = Some(original);
                Err(err)
            }
        }
    }

    /// Bakes the expedition's route, ends whatever expedition is currently
    /// active, and activates this one. The baked route, the superseded
    /// expedition, the newly-active expedition, and the index all commit in
    /// one transaction.
    pub async fn start_expedition(&self, id: ExpeditionId) -> Result<(), EngineError> {
        let mut expedition = self.repo.load_expedition(id)?;
        if !expedition.is_editable() {
            return Err(EngineError::NotEditable(id));
        }
        if expedition.routes.is_empty() || expedition.start.is_none() {
            return Err(EngineError::NotReadyToStart);
        }

        let mut routes = HashMap::with_capacity(expedition.routes.len());
        for route_id in &expedition.routes {
            routes.insert(*route_id, self.repo.load_route(*route_id)?);
        }
        let baked = bake_route(&expedition, &routes)?;

        let mut plotter_params = HashMap::new();
        plotter_params.insert(
            "expedition_id".to_string(),
            serde_json::Value::String(id.to_string()),
        );
        let baked_route = Route {
            id: baked.id,
            name: format!("Baked route for expedition: {}", expedition.name),
            plotter: "ed-expedition-baker".to_string(),
            plotter_params,
            plotter_metadata: None,
            jumps: baked.jumps.clone(),
            created_at: Utc::now(),
        };

        expedition.baked_route_id = Some(baked_route.id);
        expedition.current_baked_index = -1;
        expedition.baked_loop_back_index = baked.loop_back_index;
        expedition.status = ExpeditionStatus::Active;
        expedition.last_updated = Utc::now();

        let mut state = self.state.lock();
        let index_before = state.index.clone();
        let previous_active = state.active.take();

        let mut previous_ended = previous_active.clone();
        if let Some(previous) = previous_ended.as_mut() {
            previous.status = ExpeditionStatus::Ended;
            previous.last_updated = Utc::now();
            state.index.upsert(ExpeditionSummary::from(&*previous));
        }
        state.index.upsert(ExpeditionSummary::from(&expedition));
        state.index.set_active(Some(id));

        if let Err(err) = self.repo.save_start_expedition(
            &baked_route,
            previous_ended.as_ref(),
            &expedition,
            &state.index,
        ) {
            state.index = index_before;
            state.active = previous_active;
            return Err(err.into());
        }

        state.baked_jumps = baked.jumps;
        state.current_jump = None;
        state.jump_state = JumpStateMachine::new();
        state.previously_scooping = false;
        state.active = Some(expedition.clone());
        drop(state);

        self.notifier.expedition_started(&expedition);
        Ok(())
    }

    fn finish_active_locked(
        &self,
        state: &mut EngineState,
        mut expedition: Expedition,
        status: ExpeditionStatus,
    ) -> Result<Expedition, EngineError> {
        expedition.status = status;
        expedition.last_updated = Utc::now();
        state.index.upsert(ExpeditionSummary::from(&expedition));
        state.index.set_active(None);
        self.repo.save_expedition(&expedition, &state.index)?;
        Ok(expedition)
    }

    // --- Journal event handling ------------------------------------------

    /// Classifies one observed jump and advances the expedition's cursor.
    ///
    /// On the branch that auto-completes the expedition this returns
    /// `(None, Some(completed))`: the completed expedition is published on
    /// its own channel, but — matching the behavior this was grounded
    /// on — the final jump is not also published on the jump-history
    /// channel.
    fn handle_jump(&self, event: FsdJumpEvent) -> (Option<JumpHistoryEntry>, Option<Expedition>) {
        let mut state = self.state.lock();
        state.jump_state.handle_jump_completed();

        let Some(mut expedition) = state.active.take() else {
            return (None, None);
        };

        if let Some(last) = expedition.jump_history.last() {
            if event.timestamp <= last.timestamp {
                state.active = Some(expedition);
                return (None, None);
            }
        }

        if reached_route_end(expedition.current_baked_index, &state.baked_jumps) {
            tracing::warn!(
                system = %event.star_system,
                "received a jump but there are no more expected jumps on the baked route"
            );
            state.active = Some(expedition);
            return (None, None);
        }

        let m = classify_jump(
            expedition.current_baked_index,
            &state.baked_jumps,
            event.system_address,
        );
        let entry = JumpHistoryEntry {
            timestamp: event.timestamp,
            system_name: event.star_system.clone(),
            system_id: event.system_address,
            baked_index: m.baked_index,
            distance_ly: event.jump_dist,
            fuel_used_ly: Some(event.fuel_used),
            fuel_level_ly: Some(event.fuel_level),
            expected: m.expected,
            synthetic: false,
        };

        expedition.current_baked_index = m.new_current_baked_index;
        expedition.jump_history.push(entry.clone());
        expedition.last_updated = Utc::now();

        if reached_route_end(expedition.current_baked_index, &state.baked_jumps) {
            if let Some(loop_back) = expedition.baked_loop_back_index {
                expedition.current_baked_index = loop_back as i64;
            } else {
                let original = expedition.clone();
                return match self.finish_active_locked(&mut state, expedition, ExpeditionStatus::Completed) {
                    Ok(completed) => {
                        state.baked_jumps = Vec::new();
                        state.current_jump = None;
                        (None, Some(completed))
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "failed to persist auto-completed expedition");
                        state.active = Some(original);
                        (None, None)
                    }
                };
            }
        }

        state.current_jump = Some(expedition.jump_history.len() - 1);
        if let Some(summary) = state.index.expeditions.iter_mut().find(|s| s.id == expedition.id) {
            summary.last_updated = expedition.last_updated;
        }
        if let Err(err) = self.repo.save_expedition(&expedition, &state.index) {
            tracing::error!(error = %err, "failed to persist expedition after jump");
        }

        state.active = Some(expedition);
        (Some(entry), None)
    }

    fn handle_start_jump(&self, jump_type: JumpType) {
        self.state.lock().jump_state.handle_start_jump(jump_type);
    }

    fn handle_fsd_charging(&self, charging: bool) -> Option<ChargeToken> {
        self.state.lock().jump_state.handle_fsd_charging(charging)
    }

    fn handle_charging_timeout(&self, token: ChargeToken) {
        self.state.lock().jump_state.handle_charging_timeout(token);
    }

    /// Returns whether a scooping-just-stopped edge happened, so the
    /// caller can schedule the debounced save.
    fn handle_refueling(&self, scooping: bool) -> bool {
        let mut state = self.state.lock();
        let should_schedule = state.active.is_some() && state.previously_scooping && !scooping;
        state.previously_scooping = scooping;
        should_schedule
    }

    fn save_active_after_refuel(&self) {
        let state = self.state.lock();
        if let Some(expedition) = &state.active {
            if let Err(err) = self.repo.save_expedition(expedition, &state.index) {
                tracing::error!(error = %err, "failed to save expedition after refueling");
            }
        }
    }

    /// Mirrors `fuel_main` into the current jump's `fuel_level_ly` while the
    /// FSD isn't mid-charge, and projects a fuel alert regardless of charge
    /// state.
    fn handle_fuel_change(&self, fuel: FuelStatus) -> (Option<JumpHistoryEntry>, Option<FuelAlert>) {
        let mut state = self.state.lock();

        let Some(idx) = state.current_jump else {
            return (None, None);
        };
        if state.active.is_none() {
            return (None, None);
        }

        let mut mirrored_entry = None;
        if state.jump_state.state() == ChargeState::Normal {
            if let Some(entry) = state.active.as_mut().and_then(|a| a.jump_history.get_mut(idx)) {
                entry.fuel_level_ly = Some(fuel.fuel_main);
                mirrored_entry = Some(entry.clone());
            }
        }

        let baked_index = state
            .active
            .as_ref()
            .and_then(|a| a.jump_history.get(idx))
            .and_then(|entry| entry.baked_index);
        let alert = project_fuel_alert(&state.baked_jumps, baked_index, fuel.fuel_main);

        (mirrored_entry, alert)
    }

    /// Runs until `shutdown` fires, reconciling journal and status events
    /// against in-memory expedition state.
    pub async fn run(
        &self,
        journal: &JournalBuses,
        status: &StatusBuses,
        mut shutdown: oneshot::Receiver<()>,
    ) -> Result<(), EngineError> {
        let mut fsd_jump = journal.fsd_jump.subscribe();
        let mut start_jump = journal.start_jump.subscribe();
        let mut fsd_target = journal.fsd_target.subscribe();
        let mut fsd_charging = status.fsd_charging.subscribe();
        let mut scooping = status.scooping.subscribe();
        let mut fuel = status.fuel.subscribe();
        let (tick_tx, mut tick_rx) = mpsc::channel::<EngineTick>(32);

        loop {
            tokio::select! {
                Some(event) = fsd_jump.recv() => {
                    let (entry, completed) = self.handle_jump(event);
                    if let Some(entry) = entry {
                        self.buses.jump_history.publish(entry.clone()).await;
                        self.buses.current_jump.publish(entry).await;
                    }
                    if let Some(completed) = completed {
                        self.notifier.expedition_completed(&completed);
                        self.buses.complete_expedition.publish(completed).await;
                    }
                }
                Some(event) = start_jump.recv() => {
                    self.handle_start_jump(event.jump_type);
                }
                Some(event) = fsd_target.recv() => {
                    self.buses.target.publish(event).await;
                }
                Some(charging) = fsd_charging.recv() => {
                    if let Some(token) = self.handle_fsd_charging(charging) {
                        let tick_tx = tick_tx.clone();
                        tokio::spawn(async move {
                            tokio::time::sleep(CHARGE_TIMEOUT).await;
                            let _ = tick_tx.send(EngineTick::ChargingTimeout(token)).await;
                        });
                    }
                }
                Some(is_scooping) = scooping.recv() => {
                    if self.handle_refueling(is_scooping) {
                        let tick_tx = tick_tx.clone();
                        tokio::spawn(async move {
                            tokio::time::sleep(REFUEL_SAVE_DEBOUNCE).await;
                            let _ = tick_tx.send(EngineTick::RefuelSave).await;
                        });
                    }
                }
                Some(fuel_status) = fuel.recv() => {
                    let (mirrored, alert) = self.handle_fuel_change(fuel_status);
                    if let Some(entry) = mirrored {
                        self.buses.current_jump.publish(entry).await;
                    }
                    if let Some(alert) = alert {
                        self.buses.fuel_alert.publish(alert).await;
                    }
                }
                Some(tick) = tick_rx.recv() => {
                    match tick {
                        EngineTick::ChargingTimeout(token) => self.handle_charging_timeout(token),
                        EngineTick::RefuelSave => self.save_active_after_refuel(),
                    }
                }
                _ = &mut shutdown => {
                    tracing::debug!("expedition engine shutdown requested");
                    break;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
