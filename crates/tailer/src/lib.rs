// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Tails the Elite Dangerous journal directory (`Journal.*.log` and
//! `Status.json`) and republishes decoded events on typed fan-out
//! buses, one per event kind.

mod error;
mod events;
mod names;
mod reader;
mod watcher;

pub use error::TailerError;
pub use events::{
    FsdJumpEvent, FsdTargetEvent, FuelStatus, JumpType, LoadoutEvent, LoadoutModule, LocationEvent,
    StartJumpEvent,
};
pub use names::{parse_journal_name, JournalName};
pub use watcher::{JournalBuses, StatusBuses, Watcher};
