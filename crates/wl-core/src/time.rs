//! Simulation time model.
//!
//! # Design
//!
//! Time is represented as a monotonically increasing `Tick` counter.  The
//! mapping to wall-clock time is held in `SimClock`:
//!
//!   wall_time = start + tick * tick_millis
//!
//! Using an integer tick as the canonical time unit means dwell and sampling
//! arithmetic is exact (no floating-point drift between the scheduler and the
//! recorder) and a run started at a fixed `start` is fully reproducible.
//!
//! The default tick is 16 ms (~60 Hz).  Perception timestamps are derived
//! from the clock, never from the host clock, so a paced run tracks wall time
//! while a test run can cross midnight in microseconds.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult, Point};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize)]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Converts between tick counts and UTC wall-clock instants.
#[derive(Clone, Debug)]
pub struct SimClock {
    /// Wall-clock instant of tick 0.
    pub start: DateTime<Utc>,
    /// How many milliseconds one tick represents.  Default: 16.
    pub tick_millis: u32,
    /// The current tick: advanced by `SimClock::advance()` each iteration.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(start: DateTime<Utc>, tick_millis: u32) -> Self {
        Self {
            start,
            tick_millis,
            current_tick: Tick::ZERO,
        }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Elapsed simulated milliseconds since tick 0.
    #[inline]
    pub fn elapsed_millis(&self) -> i64 {
        self.current_tick.0 as i64 * self.tick_millis as i64
    }

    /// Wall-clock instant corresponding to `current_tick`.
    #[inline]
    pub fn now(&self) -> DateTime<Utc> {
        self.at(self.current_tick)
    }

    /// Wall-clock instant corresponding to an arbitrary tick.
    pub fn at(&self, tick: Tick) -> DateTime<Utc> {
        self.start + Duration::milliseconds(tick.0 as i64 * self.tick_millis as i64)
    }

    /// Length of one tick in seconds; the `delta_secs` handed to the scheduler.
    #[inline]
    pub fn delta_secs(&self) -> f64 {
        self.tick_millis as f64 / 1_000.0
    }

    /// How many ticks span `secs` seconds?  Rounds up, never returns zero.
    pub fn ticks_for_secs(&self, secs: f64) -> u64 {
        let ticks = (secs * 1_000.0 / self.tick_millis as f64).ceil();
        if ticks.is_finite() && ticks >= 1.0 {
            ticks as u64
        } else {
            1
        }
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_secs = self.elapsed_millis().max(0) / 1_000;
        let (h, m, s) = (total_secs / 3_600, (total_secs % 3_600) / 60, total_secs % 60);
        write!(f, "{} (+{:02}:{:02}:{:02})", self.current_tick, h, m, s)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Typically loaded from a JSON file by the application crate and passed to
/// the simulation builder.  Every field has a default, so a partial file is
/// valid.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Wall-clock instant of tick 0.  Defaults to "now" so timestamps of a
    /// paced run track the host clock.
    #[serde(default = "Utc::now")]
    pub start: DateTime<Utc>,

    /// Milliseconds per tick.  Default: 16 (~60 Hz).
    pub tick_millis: u32,

    /// Total ticks to simulate.  `None` runs until stopped.
    pub total_ticks: Option<u64>,

    /// Master RNG seed.  The same seed always produces the same wander path.
    pub seed: u64,

    /// Seconds of simulated time between perception samples.  Default: 30.
    pub sample_interval_secs: f64,

    /// Where the agent stands at tick 0.
    pub initial_position: Point,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            start:                Utc::now(),
            tick_millis:          16,
            total_ticks:          None,
            seed:                 0,
            sample_interval_secs: 30.0,
            initial_position:     Point::new(2.0, 2.0),
        }
    }
}

impl SimConfig {
    /// The tick at which the simulation ends (exclusive upper bound), if any.
    #[inline]
    pub fn end_tick(&self) -> Option<Tick> {
        self.total_ticks.map(Tick)
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.start, self.tick_millis)
    }

    /// Sampling cadence expressed in ticks (at least 1).
    pub fn sample_interval_ticks(&self) -> u64 {
        self.make_clock().ticks_for_secs(self.sample_interval_secs)
    }

    /// Reject values the tick loop cannot work with.
    pub fn validate(&self) -> CoreResult<()> {
        if self.tick_millis == 0 {
            return Err(CoreError::Config("tick_millis must be positive".into()));
        }
        if !(self.sample_interval_secs.is_finite() && self.sample_interval_secs > 0.0) {
            return Err(CoreError::Config(format!(
                "sample_interval_secs must be a positive number, got {}",
                self.sample_interval_secs
            )));
        }
        if !self.initial_position.is_finite() {
            return Err(CoreError::Config(format!(
                "initial_position must be finite, got {:?}",
                self.initial_position
            )));
        }
        Ok(())
    }
}
