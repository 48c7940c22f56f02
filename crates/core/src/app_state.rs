// SPDX-License-Identifier: MIT

//! Last-known commander state, rebuilt from the journal on every restart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where the commander currently is, as last reported by a `Location` or
/// `FSDJump` journal event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub timestamp: DateTime<Utc>,
    pub system_name: String,
    pub system_id: i64,
    pub body: Option<String>,
    pub docked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuelCapacity {
    pub main: f64,
    pub reserve: f64,
}

/// The FSD's relevant engineering modifiers, pulled out of `Loadout`'s
/// `Engineering.Modifiers` list by label. Everything else the journal
/// reports about engineering (blueprint id, quality, experimental
/// effects) is dropped on read — only these two modifiers feed the fuel
/// projection.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LoadoutFsd {
    pub item: String,
    #[serde(default)]
    pub optimal_mass: Option<f64>,
    #[serde(default)]
    pub max_fuel_per_jump: Option<f64>,
}

impl LoadoutFsd {
    pub fn new(item: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            optimal_mass: None,
            max_fuel_per_jump: None,
        }
    }
}

/// The commander's current ship loadout, as last reported by a `Loadout`
/// journal event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loadout {
    pub timestamp: DateTime<Utc>,
    pub unladen_mass: f64,
    pub fuel_capacity: FuelCapacity,
    pub fsd: LoadoutFsd,
    /// Item name of an equipped guardian FSD booster, if any. A separate
    /// module slot, not an FSD engineering modifier, but it changes
    /// maximum jump range the same way so it rides alongside the FSD
    /// here rather than in a whole separate module list.
    #[serde(default)]
    pub fsd_booster: Option<String>,
}

/// Commander state reconstructed from the journal. Unlike
/// [`crate::Expedition`] this is a singleton: one file per data
/// directory, overwritten in place on every strictly-newer update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub last_known_loadout: Option<Loadout>,
    pub current_location: Option<Location>,
}

impl AppState {
    pub fn empty() -> Self {
        Self {
            last_known_loadout: None,
            current_location: None,
        }
    }

    /// Applies `loadout` only if its timestamp is strictly newer than the
    /// currently held one. Returns whether the update was applied.
    ///
    /// The comparison is strict (`>`, not `>=`): two journal events can
    /// share a timestamp at second resolution, and the first one seen
    /// during a replay should not be clobbered by the second.
    pub fn apply_loadout_if_newer(&mut self, loadout: Loadout) -> bool {
        let is_newer = match &self.last_known_loadout {
            Some(current) => loadout.timestamp > current.timestamp,
            None => true,
        };
        if is_newer {
            self.last_known_loadout = Some(loadout);
        }
        is_newer
    }

    /// Applies `location` only if its timestamp is strictly newer than the
    /// currently held one. Returns whether the update was applied.
    pub fn apply_location_if_newer(&mut self, location: Location) -> bool {
        let is_newer = match &self.current_location {
            Some(current) => location.timestamp > current.timestamp,
            None => true,
        };
        if is_newer {
            self.current_location = Some(location);
        }
        is_newer
    }
}

#[cfg(test)]
#[path = "app_state_tests.rs"]
mod tests;
