// SPDX-License-Identifier: MIT

//! Parsing and ordering of `Journal.<timestamp>.<part>.log` file names.

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;
use std::sync::OnceLock;

fn journal_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        #[allow(clippy::unwrap_used)]
        Regex::new(r"^Journal\.(\d{4}-\d{2}-\d{2}T\d{6})\.(\d+)\.log$").unwrap()
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalName {
    pub file_name: String,
    pub time: DateTime<Utc>,
    pub part: u32,
}

/// Parse a journal file name, or `None` if it doesn't match the pattern
/// Elite Dangerous writes (`Journal.2024-01-01T120000.01.log`).
pub fn parse_journal_name(file_name: &str) -> Option<JournalName> {
    let captures = journal_pattern().captures(file_name)?;
    let time = NaiveDateTime::parse_from_str(&captures[1], "%Y-%m-%dT%H%M%S").ok()?;
    let part: u32 = captures[2].parse().ok()?;
    Some(JournalName {
        file_name: file_name.to_string(),
        time: time.and_utc(),
        part,
    })
}

/// Sort journals by (timestamp, part) ascending, matching write order.
pub fn sort_journals(journals: &mut [JournalName]) {
    journals.sort_by(|a, b| a.time.cmp(&b.time).then(a.part.cmp(&b.part)));
}

/// Compute the index into a sorted `journals` slice at which startup
/// replay should begin, given the last timestamp persisted from a prior
/// run.
///
/// The filename timestamp is when the file was *opened*, not when its
/// last event was written, so the first journal strictly after `since`
/// can still be missing events from before `since`'s journal file. We
/// therefore back up one file before the first journal starting after
/// `since`, then back up further to the start of that file's part
/// sequence (a session can span `Journal.X.01.log`, `.02.log`, ...).
/// Every event is still filtered against `since` itself when read, so
/// backing up further than strictly necessary never reprocesses events
/// we've already seen.
pub fn sync_cutoff(journals: &[JournalName], since: DateTime<Utc>) -> usize {
    if journals.is_empty() {
        return 0;
    }

    let mut cutoff = match journals.iter().position(|j| j.time > since) {
        Some(0) => 0,
        Some(idx) => idx - 1,
        None => journals.len() - 1,
    };

    cutoff = cutoff.saturating_sub(journals[cutoff].part.saturating_sub(1) as usize);
    cutoff
}

#[cfg(test)]
#[path = "names_tests.rs"]
mod tests;
