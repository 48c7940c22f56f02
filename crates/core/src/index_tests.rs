use super::*;
use crate::id::ExpeditionId;

fn summary(id: ExpeditionId, name: &str) -> ExpeditionSummary {
    let now = Utc::now();
    ExpeditionSummary {
        id,
        name: name.into(),
        status: ExpeditionStatus::Planned,
        created_at: now,
        last_updated: now,
    }
}

#[test]
fn upsert_inserts_new_entries() {
    let mut index = ExpeditionIndex::new();
    let id = ExpeditionId::new();
    index.upsert(summary(id, "First"));
    assert_eq!(index.expeditions.len(), 1);
}

#[test]
fn upsert_replaces_existing_entry_by_id() {
    let mut index = ExpeditionIndex::new();
    let id = ExpeditionId::new();
    index.upsert(summary(id, "First"));
    index.upsert(summary(id, "Renamed"));
    assert_eq!(index.expeditions.len(), 1);
    assert_eq!(index.expeditions[0].name, "Renamed");
}

#[test]
fn remove_clears_active_if_it_was_the_active_expedition() {
    let mut index = ExpeditionIndex::new();
    let id = ExpeditionId::new();
    index.upsert(summary(id, "First"));
    index.set_active(Some(id));
    index.remove(id);
    assert!(index.expeditions.is_empty());
    assert_eq!(index.active, None);
}

#[test]
fn remove_leaves_active_untouched_for_other_ids() {
    let mut index = ExpeditionIndex::new();
    let active_id = ExpeditionId::new();
    let other_id = ExpeditionId::new();
    index.upsert(summary(active_id, "Active"));
    index.upsert(summary(other_id, "Other"));
    index.set_active(Some(active_id));
    index.remove(other_id);
    assert_eq!(index.active, Some(active_id));
}
