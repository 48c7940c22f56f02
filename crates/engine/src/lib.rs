// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! The expedition domain's behavior: matching observed jumps against a
//! baked route, projecting fuel margin, tracking FSD charge state, editing
//! expeditions before they start, and the live progress engine that ties
//! all of it to the journal tailer and the on-disk store.

mod app_state_service;
mod classify;
mod error;
mod fuel;
mod jump;
mod lifecycle;
mod notifier;
mod service;

pub use app_state_service::run as run_app_state_service;
pub use classify::{classify_jump, reached_route_end, JumpMatch};
pub use error::EngineError;
pub use fuel::{project_fuel_alert, FuelAlert, FuelAlertLevel};
pub use jump::{ChargeState, ChargeToken, JumpStateMachine, CHARGE_TIMEOUT};
pub use lifecycle::{
    add_route_to_expedition, create_expedition, create_link, delete_expedition, delete_link,
    remove_route_from_expedition, rename_expedition,
};
pub use notifier::{ExpeditionNotifier, NoopNotifier};
pub use service::{EngineBuses, ExpeditionEngine};
