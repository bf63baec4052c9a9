//! Daily-rotating JSONL backend.
//!
//! Each line goes to `<dir>/YYYY-MM-DD.jsonl` for the UTC date of the line's
//! own timestamp.  The target path is recomputed before every append, so a
//! run that crosses midnight switches files on the first record of the new
//! day and no record ever lands in the wrong day's file.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::{log_path_for, LogLine, LogResult, LogWriter};

struct ActiveFile {
    date: NaiveDate,
    path: PathBuf,
    file: File,
}

/// Appends log lines to one file per calendar date.
///
/// Files are opened lazily in append mode and the directory is created on
/// first use.  Exactly one file is open at a time.  A file found ending
/// mid-line (a crash, or an earlier failed write) is newline-terminated
/// before anything else is appended, so the fragment stays one malformed
/// line of its own.
pub struct DailyLogWriter {
    dir:    PathBuf,
    active: Option<ActiveFile>,
}

impl DailyLogWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), active: None }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The file currently open for append, if any.
    pub fn active_path(&self) -> Option<&Path> {
        self.active.as_ref().map(|a| a.path.as_path())
    }

    fn file_for(&mut self, date: NaiveDate) -> LogResult<&mut File> {
        let active = match self.active.take() {
            Some(active) if active.date == date => active,
            previous => {
                let path = log_path_for(&self.dir, date);
                fs::create_dir_all(&self.dir)?;
                let mut file = OpenOptions::new().create(true).read(true).append(true).open(&path)?;
                terminate_torn_tail(&mut file, &path)?;
                if previous.is_some() {
                    info!(path = %path.display(), "new day, switching log file");
                } else {
                    info!(path = %path.display(), "logging perceptions");
                }
                ActiveFile { date, path, file }
            }
        };
        Ok(&mut self.active.insert(active).file)
    }
}

fn terminate_torn_tail(file: &mut File, path: &Path) -> LogResult<()> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(());
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::Start(len - 1))?;
    file.read_exact(&mut last)?;
    if last[0] != b'\n' {
        warn!(path = %path.display(), "log ends mid-line; terminating the fragment");
        file.write_all(b"\n")?;
    }
    Ok(())
}

impl LogWriter for DailyLogWriter {
    fn append(&mut self, line: &LogLine) -> LogResult<()> {
        let text = line.to_line()?;
        let file = self.file_for(line.t().date_naive())?;
        // Whole line in a single write call.  On failure the file is
        // reopened, and its tail checked, before the next record.
        if let Err(e) = file.write_all(text.as_bytes()) {
            self.active = None;
            return Err(e.into());
        }
        Ok(())
    }

    fn finish(&mut self) -> LogResult<()> {
        if let Some(mut active) = self.active.take() {
            active.file.flush()?;
            active.file.sync_data()?;
        }
        Ok(())
    }
}
