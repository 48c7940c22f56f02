use super::*;
use expedition_core::{ExpeditionId, RouteId};

#[test]
fn override_dir_is_used_verbatim() {
    let dir = data_dir(Some(PathBuf::from("/tmp/custom-dir"))).expect("resolve");
    assert_eq!(dir, PathBuf::from("/tmp/custom-dir"));
}

#[test]
fn expedition_path_lives_under_expeditions_dir() {
    let dir = PathBuf::from("/data");
    let id = ExpeditionId::new();
    let path = expedition_path(&dir, id);
    assert_eq!(path.parent(), Some(expeditions_dir(&dir).as_path()));
    assert_eq!(path.file_name().unwrap(), format!("{id}.json").as_str());
}

#[test]
fn route_path_lives_under_routes_dir() {
    let dir = PathBuf::from("/data");
    let id = RouteId::new();
    let path = route_path(&dir, id);
    assert_eq!(path.parent(), Some(routes_dir(&dir).as_path()));
}
