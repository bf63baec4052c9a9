//! Incremental reader for the active day's log.

use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use wl_log::{log_path_for, parse_complete, LogLine};

use crate::FeedResult;

/// Follows `<dir>/YYYY-MM-DD.jsonl` for the current UTC date.
///
/// `cursor` is the byte offset just past the last newline already handed
/// out.  It only moves after a read succeeded, and only over complete lines,
/// so a failed or partial read is retried from the same place on the next
/// poll.
#[derive(Debug)]
pub struct LogTailer {
    dir:    PathBuf,
    path:   Option<PathBuf>,
    cursor: u64,
}

impl LogTailer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), path: None, cursor: 0 }
    }

    /// File currently being followed (set by the first poll).
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    /// Read every complete line appended since the last poll.
    ///
    /// On a date change the previous day's file is drained from the cursor
    /// first, then the new day's file is followed from offset zero.  A
    /// missing file yields nothing.  A file shorter than the cursor is
    /// re-read from the start.
    pub fn poll(&mut self, now: DateTime<Utc>) -> FeedResult<Vec<LogLine>> {
        let path = log_path_for(&self.dir, now.date_naive());
        let mut lines = Vec::new();
        if self.path.as_ref() != Some(&path) {
            if let Some(old) = self.path.clone() {
                lines = self.read_new(&old)?;
                info!(from = %old.display(), to = %path.display(), "log rotated; following new file");
            }
            self.path = Some(path.clone());
            self.cursor = 0;
        }

        match self.read_new(&path) {
            Ok(new) => lines.extend(new),
            // The old day's tail is already consumed; hand it out and retry
            // the new file next time.
            Err(e) if !lines.is_empty() => {
                warn!(path = %path.display(), error = %e, "new log unreadable; retrying next poll");
            }
            Err(e) => return Err(e),
        }
        Ok(lines)
    }

    /// Complete lines of `path` past the cursor, advancing it.
    fn read_new(&mut self, path: &Path) -> FeedResult<Vec<LogLine>> {
        let mut file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let len = file.metadata()?.len();
        if len < self.cursor {
            warn!(path = %path.display(), len, cursor = self.cursor, "log shrank; rereading from start");
            self.cursor = 0;
        }
        if len == self.cursor {
            return Ok(Vec::new());
        }

        file.seek(SeekFrom::Start(self.cursor))?;
        let mut buf = Vec::new();
        file.take(len - self.cursor).read_to_end(&mut buf)?;

        let parsed = parse_complete(&buf);
        if parsed.malformed > 0 {
            warn!(path = %path.display(), skipped = parsed.malformed, "skipped malformed log lines");
        }
        self.cursor += parsed.consumed as u64;
        Ok(parsed.lines)
    }
}
