//! Simulation observer trait for recording and progress reporting.

use chrono::{DateTime, Utc};

use wl_brain::{Brain, Location};
use wl_core::{Point, Tick};
use wl_zones::Sense;

/// Everything a recorder needs at a sampling instant.
pub struct Sample<'a> {
    pub tick:     Tick,
    /// Simulated wall-clock instant of `tick`.
    pub at:       DateTime<Utc>,
    /// Unrounded agent position.
    pub position: Point,
    pub moving:   bool,
    pub sense:    Sense<'a>,
    pub brain:    &'a Brain,
}

impl Sample<'_> {
    pub fn activity(&self) -> Option<&str> {
        self.brain.activity()
    }
}

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: arrival counter
///
/// ```rust,ignore
/// struct Arrivals(usize);
///
/// impl SimObserver for Arrivals {
///     fn on_arrival(&mut self, _tick: Tick, _at: DateTime<Utc>, _loc: &Location, _activity: &str) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before the scheduler steps.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick.  `moving` is the scheduler's verdict
    /// for this tick.
    fn on_tick_end(&mut self, _tick: Tick, _moving: bool) {}

    /// A new destination and activity were chosen.
    fn on_departure(&mut self, _tick: Tick, _at: DateTime<Utc>, _to: &Location, _activity: &str) {}

    /// The agent reached its destination.  Fires once per visit.
    fn on_arrival(&mut self, _tick: Tick, _at: DateTime<Utc>, _location: &Location, _activity: &str) {}

    /// Called every `sample_interval_ticks` ticks, starting at tick 0.
    fn on_sample(&mut self, _sample: &Sample<'_>) {}

    /// Called once after the final tick completes (or the run is stopped).
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

impl<O: SimObserver + ?Sized> SimObserver for &mut O {
    fn on_tick_start(&mut self, tick: Tick) {
        (**self).on_tick_start(tick)
    }
    fn on_tick_end(&mut self, tick: Tick, moving: bool) {
        (**self).on_tick_end(tick, moving)
    }
    fn on_departure(&mut self, tick: Tick, at: DateTime<Utc>, to: &Location, activity: &str) {
        (**self).on_departure(tick, at, to, activity)
    }
    fn on_arrival(&mut self, tick: Tick, at: DateTime<Utc>, location: &Location, activity: &str) {
        (**self).on_arrival(tick, at, location, activity)
    }
    fn on_sample(&mut self, sample: &Sample<'_>) {
        (**self).on_sample(sample)
    }
    fn on_sim_end(&mut self, final_tick: Tick) {
        (**self).on_sim_end(final_tick)
    }
}

/// Fan every callback out to two observers, left first.
impl<A: SimObserver, B: SimObserver> SimObserver for (A, B) {
    fn on_tick_start(&mut self, tick: Tick) {
        self.0.on_tick_start(tick);
        self.1.on_tick_start(tick);
    }
    fn on_tick_end(&mut self, tick: Tick, moving: bool) {
        self.0.on_tick_end(tick, moving);
        self.1.on_tick_end(tick, moving);
    }
    fn on_departure(&mut self, tick: Tick, at: DateTime<Utc>, to: &Location, activity: &str) {
        self.0.on_departure(tick, at, to, activity);
        self.1.on_departure(tick, at, to, activity);
    }
    fn on_arrival(&mut self, tick: Tick, at: DateTime<Utc>, location: &Location, activity: &str) {
        self.0.on_arrival(tick, at, location, activity);
        self.1.on_arrival(tick, at, location, activity);
    }
    fn on_sample(&mut self, sample: &Sample<'_>) {
        self.0.on_sample(sample);
        self.1.on_sample(sample);
    }
    fn on_sim_end(&mut self, final_tick: Tick) {
        self.0.on_sim_end(final_tick);
        self.1.on_sim_end(final_tick);
    }
}
