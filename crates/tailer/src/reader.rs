// SPDX-License-Identifier: MIT

//! Incremental line reading for append-only journal files.

use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::Path;

/// Tracks how far into a file we've already read, so repeated calls only
/// return lines appended since the last read.
pub struct IncrementalReader {
    offset: u64,
}

impl IncrementalReader {
    pub fn new() -> Self {
        Self { offset: 0 }
    }

    /// Read whole lines appended to `path` since the last call. A
    /// trailing partial line (the writer hasn't flushed a newline yet)
    /// is left unread and picked up on the next call.
    pub fn read_new_lines(&mut self, path: &Path) -> std::io::Result<Vec<String>> {
        let file = File::open(path)?;
        let len = file.metadata()?.len();
        if len < self.offset {
            // File was truncated or replaced; restart from the top.
            self.offset = 0;
        }
        if len == self.offset {
            return Ok(Vec::new());
        }

        let mut reader = BufReader::new(file);
        reader.seek(SeekFrom::Start(self.offset))?;

        let mut lines = Vec::new();
        let mut advance = 0u64;
        loop {
            let mut line = String::new();
            let read = reader.read_line(&mut line)?;
            if read == 0 {
                break;
            }
            if !line.ends_with('\n') {
                // Partial line; don't advance past it.
                break;
            }
            advance += read as u64;
            let trimmed = line.trim_end();
            if !trimmed.is_empty() {
                lines.push(trimmed.to_string());
            }
        }
        self.offset += advance;
        Ok(lines)
    }
}

impl Default for IncrementalReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "reader_tests.rs"]
mod tests;
