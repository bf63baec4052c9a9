//! Where log files live.

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};

/// `<dir>/YYYY-MM-DD.jsonl`.
pub fn log_path_for(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(format!("{}.jsonl", date.format("%Y-%m-%d")))
}

/// The directory tree under one log root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogLayout {
    root: PathBuf,
}

impl LogLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn perceptions_dir(&self) -> PathBuf {
        self.root.join("perceptions")
    }

    pub fn screenshots_dir(&self) -> PathBuf {
        self.root.join("screenshots")
    }

    pub fn resources_path(&self) -> PathBuf {
        self.root.join("resources.jsonl")
    }

    /// Perception log for a calendar date.
    pub fn day_path(&self, date: NaiveDate) -> PathBuf {
        log_path_for(&self.perceptions_dir(), date)
    }

    /// Perception log for the UTC date of `now`.
    pub fn path_at(&self, now: DateTime<Utc>) -> PathBuf {
        self.day_path(now.date_naive())
    }
}
