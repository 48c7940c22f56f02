use super::*;
use chrono::TimeZone;

fn j(name: &str) -> JournalName {
    parse_journal_name(name).expect("valid journal name")
}

#[test]
fn parses_timestamp_and_part() {
    let parsed = j("Journal.2024-03-01T120000.01.log");
    assert_eq!(parsed.part, 1);
    assert_eq!(
        parsed.time,
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    );
}

#[test]
fn rejects_non_journal_names() {
    assert!(parse_journal_name("Status.json").is_none());
    assert!(parse_journal_name("Journal.log").is_none());
}

#[test]
fn sort_orders_by_time_then_part() {
    let mut journals = vec![
        j("Journal.2024-03-01T120000.02.log"),
        j("Journal.2024-03-01T090000.01.log"),
        j("Journal.2024-03-01T120000.01.log"),
    ];
    sort_journals(&mut journals);
    let names: Vec<_> = journals.iter().map(|j| j.file_name.clone()).collect();
    assert_eq!(
        names,
        vec![
            "Journal.2024-03-01T090000.01.log",
            "Journal.2024-03-01T120000.01.log",
            "Journal.2024-03-01T120000.02.log",
        ]
    );
}

#[test]
fn cutoff_backs_up_one_journal_before_the_first_strictly_after_since() {
    let mut journals = vec![
        j("Journal.2024-03-01T090000.01.log"),
        j("Journal.2024-03-01T100000.01.log"),
        j("Journal.2024-03-01T110000.01.log"),
    ];
    sort_journals(&mut journals);
    let since = Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap();
    assert_eq!(sync_cutoff(&journals, since), 1);
}

#[test]
fn cutoff_is_zero_when_since_predates_every_journal() {
    let mut journals = vec![
        j("Journal.2024-03-01T090000.01.log"),
        j("Journal.2024-03-01T100000.01.log"),
    ];
    sort_journals(&mut journals);
    let since = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    assert_eq!(sync_cutoff(&journals, since), 0);
}

#[test]
fn cutoff_is_last_journal_when_since_postdates_every_journal() {
    let mut journals = vec![
        j("Journal.2024-03-01T090000.01.log"),
        j("Journal.2024-03-01T100000.01.log"),
    ];
    sort_journals(&mut journals);
    let since = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    assert_eq!(sync_cutoff(&journals, since), 1);
}

#[test]
fn cutoff_backs_up_to_the_start_of_a_multi_part_session() {
    let mut journals = vec![
        j("Journal.2024-03-01T090000.01.log"),
        j("Journal.2024-03-01T090000.02.log"),
        j("Journal.2024-03-01T090000.03.log"),
        j("Journal.2024-03-01T150000.01.log"),
    ];
    sort_journals(&mut journals);
    let since = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
    // first-after is index 3 (15:00); back up one -> index 2, part 3,
    // so back up 2 more to the start of the session at index 0.
    assert_eq!(sync_cutoff(&journals, since), 0);
}
