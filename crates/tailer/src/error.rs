// SPDX-License-Identifier: MIT

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TailerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("file watcher error: {0}")]
    Notify(#[from] notify::Error),
    #[error("sync() called after the watcher was already started")]
    AlreadyStarted,
}
