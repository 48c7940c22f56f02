// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Wires the journal tailer, the on-disk store, and the progress engine
//! into one running daemon, and hands back a [`Frontend`] a GUI can embed.

mod config;
mod env;
mod frontend;

pub use config::DaemonConfig;
pub use frontend::Frontend;

use chrono::{DateTime, Utc};
use expedition_engine::{EngineBuses, EngineError, ExpeditionEngine};
use expedition_storage::{Repo, StorageError};
use expedition_tailer::{JournalBuses, StatusBuses, TailerError, Watcher};
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Tailer(#[from] TailerError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

fn clone_journal_buses(buses: &JournalBuses) -> JournalBuses {
    JournalBuses {
        loadout: buses.loadout.clone(),
        fsd_jump: buses.fsd_jump.clone(),
        fsd_target: buses.fsd_target.clone(),
        location: buses.location.clone(),
        start_jump: buses.start_jump.clone(),
    }
}

fn clone_status_buses(buses: &StatusBuses) -> StatusBuses {
    StatusBuses {
        scooping: buses.scooping.clone(),
        fsd_charging: buses.fsd_charging.clone(),
        fuel: buses.fuel.clone(),
    }
}

/// The three background tasks and their shutdown handles, plus the
/// [`Frontend`] a GUI embeds. Dropping this without calling
/// [`Daemon::shutdown`] abandons the tasks; they keep running detached.
pub struct Daemon {
    frontend: Frontend,
    watcher_shutdown: oneshot::Sender<()>,
    app_state_shutdown: oneshot::Sender<()>,
    engine_shutdown: oneshot::Sender<()>,
    watcher_task: JoinHandle<Result<(), TailerError>>,
    app_state_task: JoinHandle<Result<(), StorageError>>,
    engine_task: JoinHandle<Result<(), EngineError>>,
}

impl Daemon {
    pub fn frontend(&self) -> Frontend {
        self.frontend.clone()
    }

    /// Signals all three background tasks and waits for them to exit.
    /// Errors from a task that had already failed on its own are
    /// swallowed; `shutdown` reports only join failures (task panics).
    pub async fn shutdown(self) -> Result<(), tokio::task::JoinError> {
        let _ = self.watcher_shutdown.send(());
        let _ = self.app_state_shutdown.send(());
        let _ = self.engine_shutdown.send(());
        if let Err(e) = self.watcher_task.await? {
            tracing::warn!(error = %e, "journal watcher exited with an error during shutdown");
        }
        if let Err(e) = self.app_state_task.await? {
            tracing::warn!(error = %e, "app state service exited with an error during shutdown");
        }
        if let Err(e) = self.engine_task.await? {
            tracing::warn!(error = %e, "engine exited with an error during shutdown");
        }
        Ok(())
    }
}

/// The watermark journal replay resumes from on startup: the last-known
/// loadout timestamp recorded in `AppState`, or the dawn of time if none
/// has ever been seen. `current_location` carries no timestamp of its own,
/// so it can't contribute a watermark.
fn sync_watermark(app_state: &expedition_core::AppState) -> DateTime<Utc> {
    app_state
        .last_known_loadout
        .as_ref()
        .map(|l| l.timestamp)
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Starts tailing `config.journal_dir` and persisting into
/// `config.data_dir`. Journal replay resumes from the watermark in
/// `AppState` (see [`sync_watermark`]); replaying an event at or before the
/// engine's own `last_seen_jump_timestamp` is additionally a no-op by that
/// guard, so a watermark that's slightly stale only costs a few redundant
/// reads, never double-counted state.
pub async fn start(config: &DaemonConfig) -> Result<Daemon, DaemonError> {
    let repo = Repo::new(config.data_dir.clone());

    let engine_buses = EngineBuses::new(config.bus_config);
    let engine = ExpeditionEngine::new(repo.clone(), engine_buses)?;
    engine.resume_active()?;

    let since = sync_watermark(&repo.load_app_state()?);
    let mut watcher = Watcher::with_config(config.journal_dir.clone(), config.bus_config);
    watcher.sync(since).await?;

    let journal_buses_for_app_state = clone_journal_buses(watcher.journal());
    let journal_buses_for_engine = clone_journal_buses(watcher.journal());
    let status_buses_for_engine = clone_status_buses(watcher.status());

    let (watcher_shutdown, watcher_shutdown_rx) = oneshot::channel();
    let watcher_task = tokio::spawn(watcher.run(watcher_shutdown_rx));

    let app_state_repo = repo.clone();
    let (app_state_shutdown, app_state_shutdown_rx) = oneshot::channel();
    let app_state_task = tokio::spawn(async move {
        expedition_engine::run_app_state_service(
            app_state_repo,
            &journal_buses_for_app_state,
            app_state_shutdown_rx,
        )
        .await
    });

    let engine_for_task = engine.clone();
    let (engine_shutdown, engine_shutdown_rx) = oneshot::channel();
    let engine_task = tokio::spawn(async move {
        engine_for_task
            .run(
                &journal_buses_for_engine,
                &status_buses_for_engine,
                engine_shutdown_rx,
            )
            .await
    });

    Ok(Daemon {
        frontend: Frontend::new(engine),
        watcher_shutdown,
        app_state_shutdown,
        engine_shutdown,
        watcher_task,
        app_state_task,
        engine_task,
    })
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
