use super::*;
use expedition_core::{ExpeditionStatus, RouteJump};
use tempfile::{tempdir, TempDir};

/// The returned `TempDir` must stay in scope for the test's duration or
/// the directory is removed out from under the `Repo`.
fn repo() -> (TempDir, Repo) {
    let dir = tempdir().expect("tempdir");
    let repo = Repo::new(dir.path().to_path_buf());
    (dir, repo)
}

fn route_with_jumps(name: &str, systems: &[i64]) -> Route {
    let jumps = systems
        .iter()
        .map(|id| RouteJump::new(format!("System {id}"), *id, 10.0))
        .collect();
    Route::new(name, "test-plotter", jumps)
}

#[test]
fn create_then_load_round_trips() {
    let (_dir, repo) = repo();
    let mut index = ExpeditionIndex::new();
    let id = create_expedition(&repo, &mut index).unwrap();
    let expedition = repo.load_expedition(id).unwrap();
    assert_eq!(expedition.status, ExpeditionStatus::Planned);
    assert_eq!(index.expeditions.len(), 1);
}

#[test]
fn delete_non_editable_expedition_is_rejected() {
    let (_dir, repo) = repo();
    let mut index = ExpeditionIndex::new();
    let id = create_expedition(&repo, &mut index).unwrap();
    let mut expedition = repo.load_expedition(id).unwrap();
    expedition.status = ExpeditionStatus::Active;
    repo.save_expedition(&expedition, &index).unwrap();

    let err = delete_expedition(&repo, &mut index, id).unwrap_err();
    assert!(matches!(err, EngineError::NotEditable(_)));
}

#[test]
fn delete_planned_expedition_removes_it_from_the_index() {
    let (_dir, repo) = repo();
    let mut index = ExpeditionIndex::new();
    let id = create_expedition(&repo, &mut index).unwrap();
    delete_expedition(&repo, &mut index, id).unwrap();
    assert!(index.expeditions.is_empty());
}

#[test]
fn rename_updates_expedition_and_index_summary() {
    let (_dir, repo) = repo();
    let mut index = ExpeditionIndex::new();
    let id = create_expedition(&repo, &mut index).unwrap();
    rename_expedition(&repo, &mut index, id, "Colonia run".to_string()).unwrap();

    assert_eq!(repo.load_expedition(id).unwrap().name, "Colonia run");
    assert_eq!(index.expeditions[0].name, "Colonia run");
}

#[test]
fn first_route_seeds_name_and_start() {
    let (_dir, repo) = repo();
    let mut index = ExpeditionIndex::new();
    let id = create_expedition(&repo, &mut index).unwrap();
    let route = route_with_jumps("Outbound leg", &[1, 2, 3]);

    add_route_to_expedition(&repo, &mut index, id, &route).unwrap();

    let expedition = repo.load_expedition(id).unwrap();
    assert_eq!(expedition.name, "Outbound leg");
    assert_eq!(expedition.start.unwrap().route_id, route.id);
}

#[test]
fn second_route_does_not_overwrite_the_name() {
    let (_dir, repo) = repo();
    let mut index = ExpeditionIndex::new();
    let id = create_expedition(&repo, &mut index).unwrap();
    let first = route_with_jumps("Outbound leg", &[1, 2]);
    let second = route_with_jumps("Return leg", &[2, 1]);

    add_route_to_expedition(&repo, &mut index, id, &first).unwrap();
    add_route_to_expedition(&repo, &mut index, id, &second).unwrap();

    assert_eq!(repo.load_expedition(id).unwrap().name, "Outbound leg");
}

#[test]
fn removing_the_start_route_falls_back_to_the_next_one() {
    let (_dir, repo) = repo();
    let mut index = ExpeditionIndex::new();
    let id = create_expedition(&repo, &mut index).unwrap();
    let first = route_with_jumps("First", &[1, 2]);
    let second = route_with_jumps("Second", &[3, 4]);
    add_route_to_expedition(&repo, &mut index, id, &first).unwrap();
    add_route_to_expedition(&repo, &mut index, id, &second).unwrap();

    remove_route_from_expedition(&repo, &index, id, first.id).unwrap();

    let expedition = repo.load_expedition(id).unwrap();
    assert_eq!(expedition.start.unwrap().route_id, second.id);
    assert!(!expedition.has_route(first.id));
}

#[test]
fn removing_a_route_cascades_its_links() {
    let (_dir, repo) = repo();
    let mut index = ExpeditionIndex::new();
    let id = create_expedition(&repo, &mut index).unwrap();
    let first = route_with_jumps("First", &[1, 2]);
    let second = route_with_jumps("Second", &[2, 3]);
    add_route_to_expedition(&repo, &mut index, id, &first).unwrap();
    add_route_to_expedition(&repo, &mut index, id, &second).unwrap();

    create_link(
        &repo,
        &index,
        id,
        RoutePosition::new(first.id, 1),
        RoutePosition::new(second.id, 0),
    )
    .unwrap();

    remove_route_from_expedition(&repo, &index, id, second.id).unwrap();

    assert!(repo.load_expedition(id).unwrap().links.is_empty());
}

#[test]
fn link_requires_matching_systems() {
    let (_dir, repo) = repo();
    let mut index = ExpeditionIndex::new();
    let id = create_expedition(&repo, &mut index).unwrap();
    let first = route_with_jumps("First", &[1, 2]);
    let second = route_with_jumps("Second", &[99, 3]);
    add_route_to_expedition(&repo, &mut index, id, &first).unwrap();
    add_route_to_expedition(&repo, &mut index, id, &second).unwrap();

    let err = create_link(
        &repo,
        &index,
        id,
        RoutePosition::new(first.id, 1),
        RoutePosition::new(second.id, 0),
    )
    .unwrap_err();
    assert!(matches!(err, EngineError::LinkSystemMismatch));
}

#[test]
fn link_rejects_a_second_outgoing_edge_from_the_same_position() {
    let (_dir, repo) = repo();
    let mut index = ExpeditionIndex::new();
    let id = create_expedition(&repo, &mut index).unwrap();
    let first = route_with_jumps("First", &[1, 2]);
    let second = route_with_jumps("Second", &[2, 3]);
    let third = route_with_jumps("Third", &[2, 4]);
    add_route_to_expedition(&repo, &mut index, id, &first).unwrap();
    add_route_to_expedition(&repo, &mut index, id, &second).unwrap();
    add_route_to_expedition(&repo, &mut index, id, &third).unwrap();

    create_link(
        &repo,
        &index,
        id,
        RoutePosition::new(first.id, 1),
        RoutePosition::new(second.id, 0),
    )
    .unwrap();

    let err = create_link(
        &repo,
        &index,
        id,
        RoutePosition::new(first.id, 1),
        RoutePosition::new(third.id, 0),
    )
    .unwrap_err();
    assert!(matches!(err, EngineError::DuplicateOutgoingLink(_)));
}

#[test]
fn delete_link_removes_it() {
    let (_dir, repo) = repo();
    let mut index = ExpeditionIndex::new();
    let id = create_expedition(&repo, &mut index).unwrap();
    let first = route_with_jumps("First", &[1, 2]);
    let second = route_with_jumps("Second", &[2, 3]);
    add_route_to_expedition(&repo, &mut index, id, &first).unwrap();
    add_route_to_expedition(&repo, &mut index, id, &second).unwrap();
    create_link(
        &repo,
        &index,
        id,
        RoutePosition::new(first.id, 1),
        RoutePosition::new(second.id, 0),
    )
    .unwrap();

    let link_id = repo.load_expedition(id).unwrap().links[0].id;
    delete_link(&repo, &index, id, link_id).unwrap();
    assert!(repo.load_expedition(id).unwrap().links.is_empty());
}
