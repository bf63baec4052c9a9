//! The wander/dwell activity scheduler.
//!
//! `Brain` owns the agent's intent (where it is heading, what it will do
//! there, how long it has left to do it) but not its position: the caller
//! passes the position into [`Brain::update`] and applies the returned
//! displacement itself.  This keeps the scheduler a pure state machine over
//! `(delta_secs, position, rng)`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use wl_core::{Displacement, LocationId, Point, RandomSource};

use crate::{BrainError, BrainResult, Location, LocationCatalog};

// ── MotionConfig ──────────────────────────────────────────────────────────────

/// Movement parameters.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// World units per simulated second.  Default: 3.0 (0.05 per 60 Hz tick).
    pub speed: f64,
    /// A destination is reached once the agent is strictly closer than this.
    pub arrival_threshold: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            speed:             3.0,
            arrival_threshold: 0.5,
        }
    }
}

impl MotionConfig {
    pub fn validate(&self) -> BrainResult<()> {
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return Err(BrainError::Motion(format!("speed must be positive, got {}", self.speed)));
        }
        if !(self.arrival_threshold.is_finite() && self.arrival_threshold > 0.0) {
            return Err(BrainError::Motion(format!(
                "arrival_threshold must be positive, got {}",
                self.arrival_threshold
            )));
        }
        Ok(())
    }
}

// ── Step ──────────────────────────────────────────────────────────────────────

/// A location paired with the activity chosen for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Visit {
    pub location: LocationId,
    pub activity: String,
}

/// Result of one [`Brain::update`].
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    pub displacement: Displacement,
    pub moving:       bool,
    /// Set on the first tick within the arrival threshold of a destination.
    pub arrived:      Option<Visit>,
    /// Set whenever a new destination was chosen this tick.
    pub headed_for:   Option<Visit>,
}

/// Coarse scheduler state, for display and tests.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No destination chosen yet.
    Idle,
    Traveling,
    Dwelling,
}

// ── Brain ─────────────────────────────────────────────────────────────────────

pub struct Brain {
    catalog:         LocationCatalog,
    motion:          MotionConfig,
    current:         Option<LocationId>,
    next:            Option<Visit>,
    dwell_remaining: f64,
}

impl Brain {
    /// Build a scheduler.  The first destination is chosen on the first
    /// [`update`](Self::update).
    pub fn new(catalog: LocationCatalog, motion: MotionConfig) -> BrainResult<Self> {
        motion.validate()?;
        if catalog.len() < 2 {
            return Err(BrainError::CatalogTooSmall(catalog.len()));
        }
        Ok(Self {
            catalog,
            motion,
            current: None,
            next: None,
            dwell_remaining: 0.0,
        })
    }

    pub fn catalog(&self) -> &LocationCatalog {
        &self.catalog
    }

    pub fn motion(&self) -> MotionConfig {
        self.motion
    }

    /// The location the agent last arrived at.
    pub fn current(&self) -> Option<LocationId> {
        self.current
    }

    /// The destination and the activity planned there.
    pub fn next(&self) -> Option<&Visit> {
        self.next.as_ref()
    }

    pub fn activity(&self) -> Option<&str> {
        self.next.as_ref().map(|v| v.activity.as_str())
    }

    /// Seconds of dwelling left at the destination.
    pub fn dwell_remaining(&self) -> f64 {
        self.dwell_remaining
    }

    pub fn phase(&self) -> Phase {
        match (&self.next, self.current) {
            (None, _) => Phase::Idle,
            (Some(v), Some(c)) if v.location == c => Phase::Dwelling,
            (Some(_), _) => Phase::Traveling,
        }
    }

    /// Pick a new destination uniformly among every location except the
    /// current one, then an activity uniformly among its activities, and
    /// reset the dwell timer to the destination's duration.
    pub fn choose_new_destination(&mut self, rng: &mut impl RandomSource) -> Visit {
        let len = self.catalog.len();
        let index = match self.current {
            // Draw from the `len - 1` candidates and skip over the current slot.
            Some(current) => {
                let i = pick(rng, len - 1);
                if i >= current.index() { i + 1 } else { i }
            }
            None => pick(rng, len),
        };
        let location = LocationId(index as u16);
        let place = self.catalog.location(location);
        let activity = place.activities[pick(rng, place.activities.len())].clone();

        debug!(destination = %place.name, %activity, dwell = place.duration, "destination chosen");

        self.dwell_remaining = place.duration;
        let visit = Visit { location, activity };
        self.next = Some(visit.clone());
        visit
    }

    /// Advance the scheduler by `delta_secs` with the agent standing at `pos`.
    ///
    /// Traveling returns a displacement of `speed * delta_secs` toward the
    /// destination, clamped so it never overshoots.  Within the arrival
    /// threshold the displacement is exactly zero, the dwell timer runs down,
    /// and once it reaches zero a new destination is chosen.
    pub fn update(&mut self, delta_secs: f64, pos: Point, rng: &mut impl RandomSource) -> Step {
        let mut headed_for = None;
        let target_id = match &self.next {
            Some(visit) => visit.location,
            None => {
                let visit = self.choose_new_destination(rng);
                let id = visit.location;
                headed_for = Some(visit);
                id
            }
        };

        let target = self.catalog.location(target_id).position();
        let distance = pos.distance(target);

        if distance < self.motion.arrival_threshold {
            let arrived = if self.current != Some(target_id) {
                self.current = Some(target_id);
                self.next.clone()
            } else {
                None
            };

            self.dwell_remaining -= delta_secs;
            if self.dwell_remaining <= 0.0 {
                headed_for = Some(self.choose_new_destination(rng));
            }

            return Step {
                displacement: Displacement::ZERO,
                moving: false,
                arrived,
                headed_for,
            };
        }

        let scale = (self.motion.speed * delta_secs).min(distance) / distance;
        Step {
            displacement: Displacement {
                dx: (target.x - pos.x) * scale,
                dz: (target.z - pos.z) * scale,
            },
            moving: true,
            arrived: None,
            headed_for,
        }
    }

    /// One-line description of what the agent is up to.
    pub fn current_thought(&self) -> String {
        let Some(visit) = &self.next else {
            return "Exploring...".to_string();
        };
        let name = &self.location(visit.location).name;
        if self.current == Some(visit.location) {
            format!("{} at {}", visit.activity, name)
        } else {
            format!("Heading to {} to {}", name, visit.activity)
        }
    }

    pub fn location(&self, id: LocationId) -> &Location {
        self.catalog.location(id)
    }
}

/// `rng.pick(len)` reduced into range.
#[inline]
fn pick(rng: &mut impl RandomSource, len: usize) -> usize {
    rng.pick(len) % len
}
