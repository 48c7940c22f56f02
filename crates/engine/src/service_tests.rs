use chrono::{DateTime, TimeZone, Utc};
use expedition_bus::BusConfig;
use expedition_core::{ExpeditionStatus, Route, RouteJump};
use expedition_tailer::{FsdJumpEvent, FuelStatus};
use tempfile::{tempdir, TempDir};

use super::*;

fn new_engine() -> (TempDir, ExpeditionEngine) {
    let dir = tempdir().expect("tempdir");
    let repo = Repo::new(dir.path().to_path_buf());
    let buses = EngineBuses::new(BusConfig::default());
    let engine = ExpeditionEngine::new(repo, buses).expect("new engine");
    (dir, engine)
}

/// Sol (start, not a jump target), Alpha Centauri, Barnard's Star,
/// Luhman 16 — the route every scenario test walks.
fn four_system_route() -> Route {
    let jumps = vec![
        jump("Sol", 1, true),
        jump("Alpha Centauri", 2, false),
        jump("Barnard's Star", 3, true),
        jump("Luhman 16", 4, false),
    ];
    Route::new("Outbound", "test-plotter", jumps)
}

fn jump(name: &str, system_id: i64, scoopable: bool) -> RouteJump {
    let mut j = RouteJump::new(name, system_id, 10.0);
    j.fuel_used_ly = Some(1.0);
    j.scoopable = scoopable;
    j
}

fn at(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + seconds, 0).unwrap()
}

fn jump_event(system_id: i64, name: &str, timestamp: DateTime<Utc>) -> FsdJumpEvent {
    FsdJumpEvent {
        timestamp,
        star_system: name.to_string(),
        system_address: system_id,
        star_pos: [0.0, 0.0, 0.0],
        jump_dist: 10.0,
        fuel_used: 1.0,
        fuel_level: 20.0,
    }
}

async fn started_engine() -> (TempDir, ExpeditionEngine) {
    let (dir, engine) = new_engine();
    let id = engine.create_expedition().await.expect("create");
    engine
        .add_route_to_expedition(id, four_system_route())
        .await
        .expect("attach route");
    engine.start_expedition(id).await.expect("start");
    (dir, engine)
}

#[tokio::test]
async fn expected_jump_advances_the_cursor() {
    let (_dir, engine) = started_engine().await;
    let (entry, completed) = engine.handle_jump(jump_event(2, "Alpha Centauri", at(1)));

    let entry = entry.expect("jump history entry");
    assert!(completed.is_none());
    assert!(entry.expected);
    assert_eq!(entry.baked_index, Some(1));

    let active = engine.load_active_expedition().await.expect("active");
    assert_eq!(active.current_baked_index, 1);
}

#[tokio::test]
async fn jump_back_to_the_start_system_is_a_detour() {
    let (_dir, engine) = started_engine().await;
    engine.handle_jump(jump_event(2, "Alpha Centauri", at(1)));

    // Sol (system 1) only ever sits at baked index 0, already passed — a
    // jump landing there now can't be the next expected position.
    let (entry, completed) = engine.handle_jump(jump_event(1, "Sol", at(2)));
    let entry = entry.expect("entry");
    assert!(completed.is_none());
    assert!(!entry.expected);
    assert_eq!(entry.baked_index, None);
}

#[tokio::test]
async fn detour_to_an_unplotted_system_is_recorded_without_a_baked_index() {
    let (_dir, engine) = started_engine().await;
    let (entry, completed) = engine.handle_jump(jump_event(999, "Unknown System", at(1)));
    let entry = entry.expect("entry");
    assert!(completed.is_none());
    assert!(!entry.expected);
    assert_eq!(entry.baked_index, None);
}

#[tokio::test]
async fn rejoining_the_route_after_a_detour_is_recognized() {
    let (_dir, engine) = started_engine().await;
    engine.handle_jump(jump_event(999, "Unknown System", at(1)));
    let (entry, _) = engine.handle_jump(jump_event(2, "Alpha Centauri", at(2)));
    let entry = entry.expect("entry");
    assert!(entry.expected);
    assert_eq!(entry.baked_index, Some(1));
}

#[tokio::test]
async fn skipping_ahead_on_the_route_is_matched_by_forward_scan() {
    let (_dir, engine) = started_engine().await;
    // Never visits system 2; jumps straight to system 3.
    let (entry, _) = engine.handle_jump(jump_event(3, "Barnard's Star", at(1)));
    let entry = entry.expect("entry");
    assert!(!entry.expected);
    assert_eq!(entry.baked_index, Some(2));

    let active = engine.load_active_expedition().await.expect("active");
    assert_eq!(active.current_baked_index, 2);
}

#[tokio::test]
async fn reaching_the_end_of_the_route_auto_completes_without_publishing_the_final_jump() {
    let (_dir, engine) = started_engine().await;
    engine.handle_jump(jump_event(2, "Alpha Centauri", at(1)));
    engine.handle_jump(jump_event(3, "Barnard's Star", at(2)));
    let (entry, completed) = engine.handle_jump(jump_event(4, "Luhman 16", at(3)));

    // The completing jump is never published on the jump-history channel —
    // only the completed expedition.
    assert!(entry.is_none());
    let completed = completed.expect("completed expedition");
    assert_eq!(completed.status, ExpeditionStatus::Completed);
    assert_eq!(completed.jump_history.len(), 3);

    assert!(engine.load_active_expedition().await.is_none());
}

#[tokio::test]
async fn fsd_charging_timeout_returns_state_to_normal() {
    let (_dir, engine) = new_engine();
    assert!(engine.handle_fsd_charging(true).is_none());
    let token = engine.handle_fsd_charging(false).expect("timeout scheduled");
    assert_eq!(engine.state.lock().jump_state.state(), ChargeState::Charging);

    engine.handle_charging_timeout(token);
    assert_eq!(engine.state.lock().jump_state.state(), ChargeState::Normal);
}

#[tokio::test]
async fn a_stale_charging_timeout_token_is_ignored() {
    let (_dir, engine) = new_engine();
    engine.handle_fsd_charging(true);
    let stale_token = engine.handle_fsd_charging(false).expect("first timeout token");

    // Charging resumes before the stale timeout fires.
    engine.handle_fsd_charging(true);
    engine.handle_charging_timeout(stale_token);
    assert_eq!(engine.state.lock().jump_state.state(), ChargeState::Charging);
}

#[tokio::test]
async fn fuel_level_mirrors_into_the_current_jump_while_not_charging() {
    let (_dir, engine) = started_engine().await;
    engine.handle_jump(jump_event(2, "Alpha Centauri", at(1)));

    let (mirrored, _) = engine.handle_fuel_change(FuelStatus {
        fuel_main: 12.5,
        fuel_reservoir: 1.0,
    });
    let mirrored = mirrored.expect("mirrored entry");
    assert_eq!(mirrored.fuel_level_ly, Some(12.5));
}

#[tokio::test]
async fn fuel_level_mirroring_is_suppressed_while_charging() {
    let (_dir, engine) = started_engine().await;
    engine.handle_jump(jump_event(2, "Alpha Centauri", at(1)));
    engine.handle_fsd_charging(true);

    let (mirrored, _) = engine.handle_fuel_change(FuelStatus {
        fuel_main: 3.0,
        fuel_reservoir: 1.0,
    });
    assert!(mirrored.is_none());
}

#[tokio::test]
async fn start_expedition_ends_whatever_was_previously_active() {
    let (_dir, engine) = new_engine();
    let first_id = engine.create_expedition().await.expect("create first");
    engine
        .add_route_to_expedition(first_id, four_system_route())
        .await
        .expect("attach route");
    engine.start_expedition(first_id).await.expect("start first");

    let second_id = engine.create_expedition().await.expect("create second");
    engine
        .add_route_to_expedition(second_id, four_system_route())
        .await
        .expect("attach route");
    engine.start_expedition(second_id).await.expect("start second");

    let first = engine.load_expedition(first_id).expect("load first");
    assert_eq!(first.status, ExpeditionStatus::Ended);

    let active = engine.load_active_expedition().await.expect("active");
    assert_eq!(active.id, second_id);
}

#[tokio::test]
async fn resume_active_recovers_in_memory_state_after_a_restart() {
    let dir = tempdir().expect("tempdir");
    let data_dir = dir.path().to_path_buf();

    let expedition_id = {
        let repo = Repo::new(data_dir.clone());
        let buses = EngineBuses::new(BusConfig::default());
        let engine = ExpeditionEngine::new(repo, buses).expect("new engine");
        let id = engine.create_expedition().await.expect("create");
        engine
            .add_route_to_expedition(id, four_system_route())
            .await
            .expect("attach route");
        engine.start_expedition(id).await.expect("start");
        engine.handle_jump(jump_event(2, "Alpha Centauri", at(1)));
        id
    };

    let repo = Repo::new(data_dir);
    let buses = EngineBuses::new(BusConfig::default());
    let resumed = ExpeditionEngine::new(repo, buses).expect("new engine");
    resumed.resume_active().expect("resume");

    let active = resumed.load_active_expedition().await.expect("active");
    assert_eq!(active.id, expedition_id);
    assert_eq!(active.current_baked_index, 1);
}
