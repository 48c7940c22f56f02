// SPDX-License-Identifier: MIT

//! `ed-expedition` - background companion for the journal tailer, store,
//! and progress engine. Meant to be launched once per session and left
//! running; a GUI frontend talks to it in-process via [`expedition_daemon::Frontend`].

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

#[derive(Parser)]
#[command(name = "ed-expedition", version, about = "Elite Dangerous expedition companion daemon")]
struct Cli {
    /// Directory containing the Elite Dangerous journal files
    #[arg(short = 'j', long = "journal-dir", value_name = "DIR")]
    journal_dir: PathBuf,

    /// Override the platform-default data directory (also settable via
    /// ED_EXPEDITION_DATA_DIR)
    #[arg(long = "data-dir", value_name = "DIR")]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(e) = run().await {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    if !cli.journal_dir.is_dir() {
        bail!(
            "journal directory {} does not exist or is not a directory",
            cli.journal_dir.display()
        );
    }

    let config = expedition_daemon::DaemonConfig::load(cli.journal_dir, cli.data_dir)
        .context("resolving daemon configuration")?;
    std::fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("creating data directory {}", config.data_dir.display()))?;

    tracing::info!(journal_dir = %config.journal_dir.display(), data_dir = %config.data_dir.display(), "starting ed-expedition");

    let daemon = expedition_daemon::start(&config)
        .await
        .context("starting the daemon")?;

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to wait for ctrl-c, shutting down anyway");
    }

    tracing::info!("shutdown requested, stopping background tasks");
    daemon
        .shutdown()
        .await
        .context("a background task panicked during shutdown")?;

    Ok(())
}
