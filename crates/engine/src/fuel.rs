// SPDX-License-Identifier: MIT

//! Fuel projection: does the tank hold enough to reach the next scoopable
//! system on the baked route?

use expedition_core::RouteJump;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelAlertLevel {
    Ok,
    Info,
    Warn,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelAlert {
    pub level: FuelAlertLevel,
    pub message: String,
}

/// The projection is considered to run dry below this margin, tonnes.
const LOW_FUEL_MARGIN: f64 = 0.1;
/// Above this margin the tank is considered comfortably full, tonnes.
const COMFORTABLE_MARGIN: f64 = 1.0;

/// Projects whether `current_fuel` (main tank, tonnes) lasts to the next
/// scoopable system starting just past `baked_index`.
///
/// Returns `None` when a jump between `baked_index` and the next scoopable
/// system has no plotted fuel cost, so no projection can be made.
/// `baked_index: None` (off route entirely) still yields an informational
/// alert rather than `None`, since that much can always be said regardless
/// of what's plotted ahead.
pub fn project_fuel_alert(
    baked_jumps: &[RouteJump],
    baked_index: Option<usize>,
    current_fuel: f64,
) -> Option<FuelAlert> {
    let Some(baked_index) = baked_index else {
        return Some(FuelAlert {
            level: FuelAlertLevel::Info,
            message: "You're off route.".to_string(),
        });
    };

    let current_scoopable = baked_jumps.get(baked_index).is_some_and(|jump| jump.scoopable);

    let mut remaining = current_fuel;
    for jump in baked_jumps.iter().skip(baked_index + 1) {
        let used = jump.fuel_used_ly?;
        remaining -= used;
        if jump.scoopable {
            break;
        }
    }

    Some(if remaining < LOW_FUEL_MARGIN {
        if current_scoopable {
            FuelAlert {
                level: FuelAlertLevel::Warn,
                message: "Remember to refuel.".to_string(),
            }
        } else {
            FuelAlert {
                level: FuelAlertLevel::Critical,
                message: "You will run out of fuel before the next scoopable system.".to_string(),
            }
        }
    } else if remaining < COMFORTABLE_MARGIN {
        FuelAlert {
            level: FuelAlertLevel::Warn,
            message: format!(
                "You'll arrive at the next scoopable system with {remaining:.1}t fuel left."
            ),
        }
    } else {
        FuelAlert {
            level: FuelAlertLevel::Ok,
            message: "Fuel is at required levels.".to_string(),
        }
    })
}

#[cfg(test)]
#[path = "fuel_tests.rs"]
mod tests;
