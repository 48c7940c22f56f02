// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Domain types shared by every other crate in the workspace: the data a
//! running expedition is made of, and the pure function that flattens an
//! expedition's route graph into one walkable path.
//!
//! Nothing in this crate touches the filesystem, the journal, or a clock
//! beyond `Utc::now()` for default timestamps — that belongs to
//! `expedition-storage` and `expedition-tailer` respectively.

mod app_state;
mod baked;
mod expedition;
mod id;
mod index;
mod position;
mod route;

pub use app_state::{AppState, FuelCapacity, Loadout, LoadoutFsd, Location};
pub use baked::{bake_route, BakeError, BakedRoute};
pub use expedition::{Expedition, ExpeditionStatus, JumpHistoryEntry};
pub use id::{ExpeditionId, LinkId, RouteId};
pub use index::{ExpeditionIndex, ExpeditionSummary};
pub use position::{Link, RoutePosition};
pub use route::{Route, RouteJump};
