// SPDX-License-Identifier: MIT

//! Atomic multi-file writes.
//!
//! A [`Txn`] stages each write to a unique temp file in the same
//! directory as its destination, then renames every temp file into place.
//! Rename is atomic per-file on the filesystems we target, so a crash
//! mid-commit leaves every touched file either in its old state or its
//! new one, never truncated or partially written. There is no
//! cross-file atomicity guarantee: a crash between two renames can leave
//! one file updated and the other not. Callers that write `index.json`
//! alongside an `expeditions/<id>.json` rely on the index being
//! reconcilable against whatever expedition files actually exist at
//! startup, not on both landing together.
//!
//! A transient I/O error (the kind that clears up on retry — a sharing
//! violation on Windows, a momentarily-busy handle) gets one retry before
//! the transaction gives up and rewinds the temp files it already wrote.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use uuid::Uuid;

use crate::StorageError;

struct Staged {
    tmp_path: PathBuf,
    final_path: PathBuf,
}

/// A batch of writes committed together.
pub struct Txn {
    staged: Vec<Staged>,
}

impl Txn {
    pub fn new() -> Self {
        Self { staged: Vec::new() }
    }

    /// Serialize `value` as pretty JSON and stage it for write to
    /// `final_path`. The parent directory is created if missing.
    pub fn stage_json<T: Serialize>(
        &mut self,
        final_path: PathBuf,
        value: &T,
    ) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.stage_bytes(final_path, bytes)
    }

    pub fn stage_bytes(&mut self, final_path: PathBuf, bytes: Vec<u8>) -> Result<(), StorageError> {
        let parent = final_path
            .parent()
            .ok_or_else(|| StorageError::InvalidPath(final_path.clone()))?;
        fs::create_dir_all(parent)?;

        let tmp_path = parent.join(format!(".{}.tmp", Uuid::new_v4()));
        write_with_retry(&tmp_path, &bytes)?;

        self.staged.push(Staged {
            tmp_path,
            final_path,
        });
        Ok(())
    }

    /// Rename every staged temp file into place. On the first failure the
    /// remaining (not-yet-renamed) temp files are cleaned up and the
    /// error is returned; temp files already renamed stay renamed.
    pub fn commit(mut self) -> Result<(), StorageError> {
        let mut err = None;
        let mut remaining = std::mem::take(&mut self.staged).into_iter().peekable();

        while let Some(entry) = remaining.next() {
            match rename_with_retry(&entry.tmp_path, &entry.final_path) {
                Ok(()) => continue,
                Err(e) => {
                    err = Some(e);
                    break;
                }
            }
        }

        if let Some(e) = err {
            for leftover in remaining {
                let _ = fs::remove_file(&leftover.tmp_path);
            }
            return Err(e);
        }

        Ok(())
    }

    /// Discards every temp file staged so far and forgets about them,
    /// leaving this `Txn` empty. Called automatically on drop, so a
    /// `stage_json`/`stage_bytes` failure (or any other early return via
    /// `?`) cleans up the temp files staged by the calls that came
    /// before it without the caller having to do anything.
    pub fn rewind(&mut self) {
        for staged in self.staged.drain(..) {
            let _ = fs::remove_file(&staged.tmp_path);
        }
    }
}

impl Default for Txn {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Txn {
    fn drop(&mut self) {
        self.rewind();
    }
}

fn write_with_retry(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    match fs::write(path, bytes) {
        Ok(()) => Ok(()),
        Err(first) => {
            tracing::warn!(path = %path.display(), error = %first, "retrying staged write after transient failure");
            fs::write(path, bytes).map_err(StorageError::Io)
        }
    }
}

fn rename_with_retry(from: &Path, to: &Path) -> Result<(), StorageError> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(first) => {
            tracing::warn!(from = %from.display(), to = %to.display(), error = %first, "retrying rename after transient failure");
            fs::rename(from, to).map_err(StorageError::Io)
        }
    }
}

#[cfg(test)]
#[path = "txn_tests.rs"]
mod tests;
