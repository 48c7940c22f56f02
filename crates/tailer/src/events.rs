// SPDX-License-Identifier: MIT

//! Journal event payloads.
//!
//! Only the fields the companion actually reads are modeled; every other
//! field the journal writes is dropped on deserialization.

use chrono::{DateTime, Utc};
use serde::Deserialize;

fn default_engineering_modifiers() -> Vec<EngineeringModifier> {
    Vec::new()
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineeringModifier {
    #[serde(rename = "Label")]
    pub label: String,
    #[serde(rename = "Value")]
    pub value: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoadoutEngineering {
    #[serde(rename = "Modifiers", default = "default_engineering_modifiers")]
    pub modifiers: Vec<EngineeringModifier>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoadoutModule {
    #[serde(rename = "Slot")]
    pub slot: String,
    #[serde(rename = "Item")]
    pub item: String,
    #[serde(rename = "Engineering", default)]
    pub engineering: Option<LoadoutEngineering>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FuelCapacityPayload {
    #[serde(rename = "Main")]
    pub main: f64,
    #[serde(rename = "Reserve")]
    pub reserve: f64,
}

/// `Loadout` — emitted whenever the ship's module list is (re)read: on
/// login, after a module swap, after engineering.
#[derive(Debug, Clone, Deserialize)]
pub struct LoadoutEvent {
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "UnladenMass")]
    pub unladen_mass: f64,
    #[serde(rename = "FuelCapacity")]
    pub fuel_capacity: FuelCapacityPayload,
    #[serde(rename = "Modules")]
    pub modules: Vec<LoadoutModule>,
}

/// `FSDJump` — emitted on arrival at the destination of a hyperspace
/// jump, once the jump has actually completed.
#[derive(Debug, Clone, Deserialize)]
pub struct FsdJumpEvent {
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "StarSystem")]
    pub star_system: String,
    #[serde(rename = "SystemAddress")]
    pub system_address: i64,
    #[serde(rename = "StarPos")]
    pub star_pos: [f64; 3],
    #[serde(rename = "JumpDist")]
    pub jump_dist: f64,
    #[serde(rename = "FuelUsed")]
    pub fuel_used: f64,
    #[serde(rename = "FuelLevel")]
    pub fuel_level: f64,
}

/// `FSDTarget` — emitted when the next jump's destination is locked in,
/// ahead of `StartJump`/`FSDJump`.
#[derive(Debug, Clone, Deserialize)]
pub struct FsdTargetEvent {
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "SystemAddress")]
    pub system_address: i64,
}

/// `Location` — emitted on login/respawn with the commander's current
/// position; unlike `FSDJump` this can fire without a jump happening.
#[derive(Debug, Clone, Deserialize)]
pub struct LocationEvent {
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "StarSystem")]
    pub star_system: String,
    #[serde(rename = "SystemAddress")]
    pub system_address: i64,
    #[serde(rename = "Docked", default)]
    pub docked: bool,
    #[serde(rename = "Body", default)]
    pub body: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum JumpType {
    Hyperspace,
    Supercruise,
}

/// `StartJump` — emitted the instant the FSD begins charging, before
/// `FSDJump` confirms the ship actually arrived. Supercruise jumps (drop
/// to a body) use the same event with a different `JumpType`.
#[derive(Debug, Clone, Deserialize)]
pub struct StartJumpEvent {
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "JumpType")]
    pub jump_type: JumpType,
}

/// A decoded line from `Status.json`. Most of the file is ignored; only
/// the flags bearing on FSD state and remaining fuel are modeled.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusPayload {
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "Flags", default)]
    pub flags: Option<i64>,
    #[serde(rename = "Flags2", default)]
    pub flags2: Option<i64>,
    #[serde(rename = "Fuel", default)]
    pub fuel: Option<FuelStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct FuelStatus {
    #[serde(rename = "FuelMain")]
    pub fuel_main: f64,
    #[serde(rename = "FuelReservoir")]
    pub fuel_reservoir: f64,
}

/// https://elite-journal.readthedocs.io/en/latest/Status%20File.html
pub const FLAG_SCOOPING_FUEL: i64 = 1 << 11;
pub const FLAG_FSD_CHARGING: i64 = 1 << 17;
pub const FLAG_IN_MAIN_SHIP: i64 = 1 << 24;
pub const FLAG2_HYPERDRIVE_CHARGING: i64 = 1 << 19;

pub fn flag_set(flags: i64, bit: i64) -> bool {
    flags & bit != 0
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
