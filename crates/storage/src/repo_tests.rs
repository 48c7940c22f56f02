use super::*;
use expedition_core::{ExpeditionStatus, ExpeditionSummary, RouteJump};
use tempfile::tempdir;

#[test]
fn load_index_defaults_when_missing() {
    let dir = tempdir().expect("tempdir");
    let repo = Repo::new(dir.path().to_path_buf());
    let index = repo.load_index().expect("load");
    assert!(index.expeditions.is_empty());
}

#[test]
fn load_app_state_defaults_when_missing() {
    let dir = tempdir().expect("tempdir");
    let repo = Repo::new(dir.path().to_path_buf());
    let state = repo.load_app_state().expect("load");
    assert!(state.last_known_loadout.is_none());
}

#[test]
fn expedition_round_trips_through_save_and_load() {
    let dir = tempdir().expect("tempdir");
    let repo = Repo::new(dir.path().to_path_buf());
    let expedition = Expedition::new(ExpeditionId::new());
    let mut index = ExpeditionIndex::new();
    index.upsert(ExpeditionSummary::from(&expedition));

    repo.save_expedition(&expedition, &index).expect("save");

    let loaded = repo.load_expedition(expedition.id).expect("load");
    assert_eq!(loaded, expedition);
    let loaded_index = repo.load_index().expect("load index");
    assert_eq!(loaded_index.expeditions.len(), 1);
}

#[test]
fn list_expedition_ids_finds_saved_expeditions() {
    let dir = tempdir().expect("tempdir");
    let repo = Repo::new(dir.path().to_path_buf());
    let expedition = Expedition::new(ExpeditionId::new());
    let index = ExpeditionIndex::new();
    repo.save_expedition(&expedition, &index).expect("save");

    let ids = repo.list_expedition_ids().expect("list");
    assert_eq!(ids, vec![expedition.id]);
}

#[test]
fn delete_expedition_removes_the_file() {
    let dir = tempdir().expect("tempdir");
    let repo = Repo::new(dir.path().to_path_buf());
    let expedition = Expedition::new(ExpeditionId::new());
    repo.save_expedition(&expedition, &ExpeditionIndex::new())
        .expect("save");

    repo.delete_expedition(expedition.id).expect("delete");
    assert!(repo.load_expedition(expedition.id).is_err());
}

#[test]
fn route_round_trips_through_save_and_load() {
    let dir = tempdir().expect("tempdir");
    let repo = Repo::new(dir.path().to_path_buf());
    let route = Route::new("Test", "baked", vec![RouteJump::new("Sol", 1, 0.0)]);
    repo.save_route(&route).expect("save");

    let loaded = repo.load_route(route.id).expect("load");
    assert_eq!(loaded, route);
    assert_eq!(repo.list_route_ids().expect("list"), vec![route.id]);
}

#[test]
fn save_start_expedition_writes_baked_route_previous_and_new_expedition() {
    let dir = tempdir().expect("tempdir");
    let repo = Repo::new(dir.path().to_path_buf());

    let mut previous = Expedition::new(ExpeditionId::new());
    previous.status = ExpeditionStatus::Active;
    let mut next = Expedition::new(ExpeditionId::new());
    next.status = ExpeditionStatus::Active;
    let baked_route = Route::new("Baked route for expedition: next", "ed-expedition-baker", vec![]);

    let mut index = ExpeditionIndex::new();
    index.upsert(ExpeditionSummary::from(&previous));
    index.upsert(ExpeditionSummary::from(&next));
    index.set_active(Some(next.id));

    repo.save_start_expedition(&baked_route, Some(&previous), &next, &index)
        .expect("save");

    assert_eq!(repo.load_route(baked_route.id).expect("load route"), baked_route);
    assert_eq!(repo.load_expedition(previous.id).expect("load previous").status, ExpeditionStatus::Active);
    assert_eq!(repo.load_expedition(next.id).expect("load next").status, ExpeditionStatus::Active);
    assert_eq!(repo.load_index().expect("load index").active, Some(next.id));
}
