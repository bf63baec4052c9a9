//! Best-effort process memory sampling.

use std::collections::VecDeque;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use wl_core::{SimClock, SimConfig, Tick};
use wl_sim::SimObserver;

use crate::{LogError, LogResult};

/// Samples kept in memory.
pub const RESOURCE_HISTORY: usize = 100;

const MB: usize = 1024 * 1024;

/// One memory reading.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResourceSample {
    pub timestamp:   DateTime<Utc>,
    pub tick:        u64,
    pub physical_mb: u64,
    pub virtual_mb:  u64,
}

/// Returns `(physical, virtual)` bytes, or `None` if unsupported.
pub type MemorySampler = fn() -> Option<(usize, usize)>;

fn process_memory() -> Option<(usize, usize)> {
    memory_stats::memory_stats().map(|m| (m.physical_mem, m.virtual_mem))
}

/// A [`SimObserver`] that reads process memory every `interval` ticks, keeps
/// the last [`RESOURCE_HISTORY`] readings, and appends each to a JSONL file.
///
/// Nothing here can fail the run: unavailable statistics and write errors are
/// logged and skipped.
pub struct ResourceMonitor {
    path:       PathBuf,
    clock:      SimClock,
    every:      u64,
    sampler:    MemorySampler,
    history:    VecDeque<ResourceSample>,
    last_error: Option<LogError>,
}

impl ResourceMonitor {
    /// Sample every `interval_secs` of simulated time, starting at tick 0.
    pub fn new(path: impl Into<PathBuf>, config: &SimConfig, interval_secs: f64) -> Self {
        let clock = config.make_clock();
        Self {
            path: path.into(),
            every: clock.ticks_for_secs(interval_secs),
            clock,
            sampler: process_memory,
            history: VecDeque::with_capacity(RESOURCE_HISTORY),
            last_error: None,
        }
    }

    /// Replace the memory sampler (tests, unsupported platforms).
    pub fn with_sampler(mut self, sampler: MemorySampler) -> Self {
        self.sampler = sampler;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Oldest first.
    pub fn history(&self) -> impl Iterator<Item = &ResourceSample> {
        self.history.iter()
    }

    pub fn latest(&self) -> Option<&ResourceSample> {
        self.history.back()
    }

    pub fn take_error(&mut self) -> Option<LogError> {
        self.last_error.take()
    }

    /// Take one reading now.
    pub fn sample(&mut self, tick: Tick) {
        let Some((physical, virtual_)) = (self.sampler)() else {
            warn!("memory statistics unavailable on this platform");
            return;
        };
        let sample = ResourceSample {
            timestamp:   self.clock.at(tick),
            tick:        tick.0,
            physical_mb: (physical / MB) as u64,
            virtual_mb:  (virtual_ / MB) as u64,
        };
        info!("Resources: {} MB physical, {} MB virtual", sample.physical_mb, sample.virtual_mb);

        if let Err(e) = self.append(&sample) {
            warn!(path = %self.path.display(), error = %e, "failed to append resource sample");
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }

        if self.history.len() == RESOURCE_HISTORY {
            self.history.pop_front();
        }
        self.history.push_back(sample);
    }

    fn append(&self, sample: &ResourceSample) -> LogResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut line = serde_json::to_string(sample)?;
        line.push('\n');
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }
}

impl SimObserver for ResourceMonitor {
    fn on_tick_end(&mut self, tick: Tick, _moving: bool) {
        if tick.0.is_multiple_of(self.every) {
            self.sample(tick);
        }
    }
}
