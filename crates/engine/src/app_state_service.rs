// SPDX-License-Identifier: MIT

//! Keeps `app_state.json` in sync with the commander's last known loadout
//! and current position, independent of any expedition.

use expedition_core::{AppState, FuelCapacity, Loadout, LoadoutFsd, Location};
use expedition_storage::{Repo, StorageError};
use expedition_tailer::{FsdJumpEvent, JournalBuses, LoadoutEvent, LocationEvent};
use tokio::sync::oneshot;

const FSD_SLOT: &str = "FrameShiftDrive";
const GUARDIAN_BOOSTER_PREFIX: &str = "int_guardianfsdbooster";

/// `None` if the event's module list has no `FrameShiftDrive` slot, which
/// should never happen for a real journal but isn't worth panicking over.
fn to_loadout(event: LoadoutEvent) -> Option<Loadout> {
    let fsd_module = event.modules.iter().find(|m| m.slot == FSD_SLOT)?;

    let mut fsd = LoadoutFsd::new(fsd_module.item.clone());
    if let Some(engineering) = &fsd_module.engineering {
        for modifier in &engineering.modifiers {
            match modifier.label.as_str() {
                "FSDOptimalMass" => fsd.optimal_mass = Some(modifier.value),
                "MaxFuelPerJump" => fsd.max_fuel_per_jump = Some(modifier.value),
                _ => {}
            }
        }
    }

    let fsd_booster = event
        .modules
        .iter()
        .find(|m| m.item.starts_with(GUARDIAN_BOOSTER_PREFIX))
        .map(|m| m.item.clone());

    Some(Loadout {
        timestamp: event.timestamp,
        unladen_mass: event.unladen_mass,
        fuel_capacity: FuelCapacity {
            main: event.fuel_capacity.main,
            reserve: event.fuel_capacity.reserve,
        },
        fsd,
        fsd_booster,
    })
}

fn to_location(event: LocationEvent) -> Location {
    Location {
        timestamp: event.timestamp,
        system_name: event.star_system,
        system_id: event.system_address,
        body: event.body,
        docked: event.docked,
    }
}

/// `FSDJump` carries no `Docked`/`Body` fields of its own: arriving via
/// hyperspace always drops the commander undocked in open space.
fn location_from_jump(event: FsdJumpEvent) -> Location {
    Location {
        timestamp: event.timestamp,
        system_name: event.star_system,
        system_id: event.system_address,
        body: None,
        docked: false,
    }
}

/// Runs until `shutdown` fires, persisting every strictly-newer loadout and
/// every strictly-newer location update (from either `Location` or
/// `FSDJump`) to `app_state.json`.
pub async fn run(
    repo: Repo,
    journal: &JournalBuses,
    mut shutdown: oneshot::Receiver<()>,
) -> Result<(), StorageError> {
    let mut state = repo.load_app_state()?;
    let mut loadout = journal.loadout.subscribe();
    let mut location = journal.location.subscribe();
    let mut fsd_jump = journal.fsd_jump.subscribe();

    loop {
        tokio::select! {
            Some(event) = loadout.recv() => {
                let Some(loadout) = to_loadout(event) else {
                    tracing::warn!("Loadout event had no FrameShiftDrive module, skipping");
                    continue;
                };
                if state.apply_loadout_if_newer(loadout) {
                    repo.save_app_state(&state)?;
                }
            }
            Some(event) = location.recv() => {
                if state.apply_location_if_newer(to_location(event)) {
                    repo.save_app_state(&state)?;
                }
            }
            Some(event) = fsd_jump.recv() => {
                if state.apply_location_if_newer(location_from_jump(event)) {
                    repo.save_app_state(&state)?;
                }
            }
            _ = &mut shutdown => {
                tracing::debug!("app state service shutdown requested");
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "app_state_service_tests.rs"]
mod tests;
