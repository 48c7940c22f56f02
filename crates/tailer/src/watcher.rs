// SPDX-License-Identifier: MIT

//! Live and catch-up tailing of the journal directory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use expedition_bus::{Bus, BusConfig};
use notify::{RecommendedWatcher, RecursiveMode, Watcher as NotifyWatcher};
use serde::Deserialize;
use tokio::sync::{mpsc, oneshot};

use crate::events::{
    FsdJumpEvent, FsdTargetEvent, FuelStatus, LoadoutEvent, LocationEvent, StartJumpEvent,
    StatusPayload, FLAG_FSD_CHARGING, FLAG_IN_MAIN_SHIP, FLAG_SCOOPING_FUEL,
    FLAG2_HYPERDRIVE_CHARGING,
};
use crate::events::flag_set;
use crate::names::{parse_journal_name, sort_journals, sync_cutoff, JournalName};
use crate::reader::IncrementalReader;
use crate::TailerError;

const STATUS_FILE_NAME: &str = "Status.json";
/// Fallback poll interval used whenever the platform file watcher can't
/// attach to the journal directory (notify returns an error on some
/// network shares and sandboxed environments).
const POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Deserialize)]
struct Envelope {
    timestamp: DateTime<Utc>,
    event: String,
}

/// Per-event-type fan-out for decoded journal lines.
pub struct JournalBuses {
    pub loadout: Bus<LoadoutEvent>,
    pub fsd_jump: Bus<FsdJumpEvent>,
    pub fsd_target: Bus<FsdTargetEvent>,
    pub location: Bus<LocationEvent>,
    pub start_jump: Bus<StartJumpEvent>,
}

impl JournalBuses {
    fn new(config: BusConfig) -> Self {
        Self {
            loadout: Bus::new(config),
            fsd_jump: Bus::new(config),
            fsd_target: Bus::new(config),
            location: Bus::new(config),
            start_jump: Bus::new(config),
        }
    }
}

/// Per-flag fan-out for decoded `Status.json` updates.
pub struct StatusBuses {
    pub scooping: Bus<bool>,
    pub fsd_charging: Bus<bool>,
    pub fuel: Bus<FuelStatus>,
}

impl StatusBuses {
    fn new(config: BusConfig) -> Self {
        Self {
            scooping: Bus::new(config),
            fsd_charging: Bus::new(config),
            fuel: Bus::new(config),
        }
    }
}

/// Tails `Journal.*.log` and `Status.json` in one directory, publishing
/// decoded events on [`JournalBuses`] and [`StatusBuses`].
pub struct Watcher {
    dir: PathBuf,
    journal: JournalBuses,
    status: StatusBuses,
    last_timestamp: DateTime<Utc>,
    started: bool,
}

impl Watcher {
    pub fn new(dir: PathBuf) -> Self {
        Self::with_config(dir, BusConfig::default())
    }

    pub fn with_config(dir: PathBuf, config: BusConfig) -> Self {
        Self {
            dir,
            journal: JournalBuses::new(config),
            status: StatusBuses::new(config),
            last_timestamp: DateTime::<Utc>::MIN_UTC,
            started: false,
        }
    }

    pub fn journal(&self) -> &JournalBuses {
        &self.journal
    }

    pub fn status(&self) -> &StatusBuses {
        &self.status
    }

    /// Replay every journal event strictly newer than `since`, in file
    /// order. Must be called before [`Watcher::run`]; subscribers should
    /// already be attached so they receive the replayed events.
    pub async fn sync(&mut self, since: DateTime<Utc>) -> Result<(), TailerError> {
        if self.started {
            return Err(TailerError::AlreadyStarted);
        }

        let mut journals = read_journal_dir(&self.dir)?;
        sort_journals(&mut journals);
        self.last_timestamp = since;

        if journals.is_empty() {
            return Ok(());
        }

        let cutoff = sync_cutoff(&journals, since);
        for name in &journals[cutoff..] {
            let path = self.dir.join(&name.file_name);
            let content = std::fs::read(&path)?;
            for line in content.split(|b| *b == b'\n') {
                if line.is_empty() {
                    continue;
                }
                if let Ok(text) = std::str::from_utf8(line) {
                    self.dispatch_line(text).await;
                }
            }
        }
        Ok(())
    }

    /// Watch the directory live until `shutdown` fires. Consumes `self`
    /// since only one live pass makes sense per watcher.
    pub async fn run(mut self, mut shutdown: oneshot::Receiver<()>) -> Result<(), TailerError> {
        self.started = true;

        let (notify_tx, mut notify_rx) = mpsc::channel(64);
        let watch_result = create_file_watcher(&self.dir, notify_tx);
        let _watcher_guard = match watch_result {
            Ok(w) => Some(w),
            Err(e) => {
                tracing::warn!(error = %e, dir = %self.dir.display(), "file watcher unavailable, falling back to polling");
                None
            }
        };

        let mut current_file: Option<String> = None;
        let mut reader = IncrementalReader::new();

        loop {
            tokio::select! {
                changed = notify_rx.recv(), if _watcher_guard.is_some() => {
                    let Some(file_name) = changed else { continue };
                    self.handle_fs_change(&file_name, &mut current_file, &mut reader).await;
                }
                _ = tokio::time::sleep(POLL_INTERVAL) => {
                    if _watcher_guard.is_none() {
                        self.poll_once(&mut current_file, &mut reader).await;
                    }
                    self.handle_status_update().await;
                }
                _ = &mut shutdown => {
                    tracing::debug!("journal watcher shutdown requested");
                    break;
                }
            }
        }

        Ok(())
    }

    async fn poll_once(&mut self, current_file: &mut Option<String>, reader: &mut IncrementalReader) {
        if let Ok(mut journals) = read_journal_dir(&self.dir) {
            sort_journals(&mut journals);
            if let Some(latest) = journals.last() {
                self.handle_fs_change(&latest.file_name, current_file, reader).await;
            }
        }
    }

    async fn handle_fs_change(
        &mut self,
        file_name: &str,
        current_file: &mut Option<String>,
        reader: &mut IncrementalReader,
    ) {
        if file_name == STATUS_FILE_NAME {
            self.handle_status_update().await;
            return;
        }
        if parse_journal_name(file_name).is_none() {
            return;
        }
        if current_file.as_deref() != Some(file_name) {
            *current_file = Some(file_name.to_string());
            *reader = IncrementalReader::new();
        }
        let path = self.dir.join(file_name);
        match reader.read_new_lines(&path) {
            Ok(lines) => {
                for line in lines {
                    self.dispatch_line(&line).await;
                }
            }
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "failed to read journal update"),
        }
    }

    async fn dispatch_line(&mut self, line: &str) {
        let Ok(envelope) = serde_json::from_str::<Envelope>(line) else {
            tracing::warn!(line, "skipping malformed journal line");
            return;
        };

        if envelope.timestamp <= self.last_timestamp {
            return;
        }
        self.last_timestamp = envelope.timestamp;

        match envelope.event.as_str() {
            "Loadout" => publish_if_valid(line, &self.journal.loadout).await,
            "FSDJump" => publish_if_valid(line, &self.journal.fsd_jump).await,
            "FSDTarget" => publish_if_valid(line, &self.journal.fsd_target).await,
            "Location" => publish_if_valid(line, &self.journal.location).await,
            "StartJump" => publish_if_valid(line, &self.journal.start_jump).await,
            _ => {}
        }
    }

    async fn handle_status_update(&self) {
        let path = self.dir.join(STATUS_FILE_NAME);
        let content = match std::fs::read(&path) {
            Ok(c) => c,
            Err(_) => return,
        };
        let status: StatusPayload = match serde_json::from_slice(&content) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "failed to parse Status.json");
                return;
            }
        };

        let Some(flags) = status.flags else {
            return;
        };
        if !flag_set(flags, FLAG_IN_MAIN_SHIP) {
            return;
        }

        let scooping = flag_set(flags, FLAG_SCOOPING_FUEL);
        self.status.scooping.publish(scooping).await;

        let fsd_charging_flag = flag_set(flags, FLAG_FSD_CHARGING);
        let hyperdrive_flag = status
            .flags2
            .is_some_and(|f2| flag_set(f2, FLAG2_HYPERDRIVE_CHARGING));
        self.status
            .fsd_charging
            .publish(fsd_charging_flag || hyperdrive_flag)
            .await;

        if let Some(fuel) = status.fuel {
            self.status.fuel.publish(fuel).await;
        }
    }
}

async fn publish_if_valid<T: serde::de::DeserializeOwned + Clone + Send + 'static>(
    line: &str,
    bus: &Bus<T>,
) {
    match serde_json::from_str::<T>(line) {
        Ok(event) => bus.publish(event).await,
        Err(e) => tracing::warn!(error = %e, "failed to decode journal event, skipping"),
    }
}

fn read_journal_dir(dir: &Path) -> Result<Vec<JournalName>, TailerError> {
    let mut journals = Vec::new();
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(journals),
        Err(e) => return Err(e.into()),
    };
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if let Some(name) = entry
            .file_name()
            .to_str()
            .and_then(parse_journal_name)
        {
            journals.push(name);
        }
    }
    Ok(journals)
}

fn create_file_watcher(
    dir: &Path,
    tx: mpsc::Sender<String>,
) -> Result<RecommendedWatcher, notify::Error> {
    let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
        let Ok(event) = res else { return };
        for path in event.paths {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                let _ = tx.blocking_send(name.to_string());
            }
        }
    })?;
    watcher.watch(dir, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}

#[cfg(test)]
#[path = "watcher_tests.rs"]
mod tests;
