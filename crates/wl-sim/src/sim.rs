//! The `Sim` struct and its tick loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tracing::info;

use wl_brain::{Brain, Step, Visit};
use wl_core::{AgentRng, Point, RandomSource, SimClock, SimConfig, Tick};
use wl_zones::{Classifier, Sense};

use crate::{Sample, SimError, SimObserver, SimResult};

/// The main simulation runner.
///
/// Holds the single agent's position plus everything that decides how it
/// changes.  The position is owned here and only here; the brain proposes a
/// displacement and the loop applies it.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<R: RandomSource = AgentRng> {
    pub config: SimConfig,

    /// Simulation clock: tracks the current tick and maps it to wall time.
    pub clock: SimClock,

    pub(crate) position:     Point,
    pub(crate) sample_every: u64,
    pub(crate) brain:        Brain,
    pub(crate) classifier:   Classifier,
    pub(crate) rng:          R,
}

impl<R: RandomSource> Sim<R> {
    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn brain(&self) -> &Brain {
        &self.brain
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Classification of the current position.
    pub fn sense(&self) -> Sense<'_> {
        self.classifier.classify(self.position)
    }

    /// Ticks between perception samples.
    pub fn sample_interval_ticks(&self) -> u64 {
        self.sample_every
    }

    // ── Running ───────────────────────────────────────────────────────────

    /// Run from the current tick to `config.end_tick()`.
    ///
    /// Unbounded configurations (`total_ticks: None`) must use
    /// [`run_paced`](Self::run_paced) instead.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let Some(end) = self.config.end_tick() else {
            return Err(SimError::Config("run() needs total_ticks; use run_paced for an open-ended run".into()));
        };
        while self.clock.current_tick < end {
            self.process_tick(observer);
        }
        observer.on_sim_end(self.clock.current_tick);
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    ///
    /// Useful for tests and incremental stepping.  Does not call `on_sim_end`.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) {
        for _ in 0..n {
            self.process_tick(observer);
        }
    }

    /// Run in real time, one tick every `tick_millis`, until `stop` is set or
    /// `end_tick` is reached.
    ///
    /// The loop sleeps toward an absolute deadline so a slow observer call
    /// does not accumulate drift.  If the loop falls behind by more than one
    /// tick it resynchronises instead of bursting.
    pub fn run_paced<O: SimObserver>(&mut self, observer: &mut O, stop: &AtomicBool) {
        let period = Duration::from_millis(self.config.tick_millis as u64);
        let end = self.config.end_tick();
        let mut deadline = Instant::now();

        while !stop.load(Ordering::Relaxed) {
            if end.is_some_and(|end| self.clock.current_tick >= end) {
                break;
            }
            self.process_tick(observer);

            deadline += period;
            let now = Instant::now();
            if deadline > now {
                std::thread::sleep(deadline - now);
            } else if now - deadline > period {
                deadline = now;
            }
        }
        info!(tick = %self.clock.current_tick, "simulation stopped");
        observer.on_sim_end(self.clock.current_tick);
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn process_tick<O: SimObserver>(&mut self, observer: &mut O) {
        let now = self.clock.current_tick;
        let at = self.clock.now();
        observer.on_tick_start(now);

        let step = self.brain.update(self.clock.delta_secs(), self.position, &mut self.rng);
        self.position = self.position.offset(step.displacement);
        self.emit_events(now, &step, observer);

        if now.0.is_multiple_of(self.sample_every) {
            let sample = Sample {
                tick:     now,
                at,
                position: self.position,
                moving:   step.moving,
                sense:    self.classifier.classify(self.position),
                brain:    &self.brain,
            };
            observer.on_sample(&sample);
        }

        observer.on_tick_end(now, step.moving);
        self.clock.advance();
    }

    /// Report destination changes.  When the first choice is reached on the
    /// same tick, the departure is reported before the arrival.
    fn emit_events<O: SimObserver>(&self, now: Tick, step: &Step, observer: &mut O) {
        let depart_first = matches!(
            (&step.headed_for, &step.arrived),
            (Some(to), Some(reached)) if to.location == reached.location
        );
        if depart_first {
            self.emit_departure(now, step.headed_for.as_ref(), observer);
            self.emit_arrival(now, step.arrived.as_ref(), observer);
        } else {
            self.emit_arrival(now, step.arrived.as_ref(), observer);
            self.emit_departure(now, step.headed_for.as_ref(), observer);
        }
    }

    fn emit_departure<O: SimObserver>(&self, now: Tick, visit: Option<&Visit>, observer: &mut O) {
        let Some(visit) = visit else { return };
        let to = self.brain.location(visit.location);
        info!("Going to {} to {}", to.name, visit.activity);
        observer.on_departure(now, self.clock.at(now), to, &visit.activity);
    }

    fn emit_arrival<O: SimObserver>(&self, now: Tick, visit: Option<&Visit>, observer: &mut O) {
        let Some(visit) = visit else { return };
        let location = self.brain.location(visit.location);
        info!("{} at {}", capitalize(&visit.activity), location.name);
        observer.on_arrival(now, self.clock.at(now), location, &visit.activity);
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
