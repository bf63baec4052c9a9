//! Fluent builder for constructing a [`Sim`].

use wl_brain::{Brain, LocationCatalog, MotionConfig};
use wl_core::{AgentRng, RandomSource, SimConfig};
use wl_zones::Classifier;

use crate::{Sim, SimResult};

/// Fluent builder for [`Sim<R>`].
///
/// # Optional inputs (have defaults)
///
/// | Method            | Default                                   |
/// |-------------------|-------------------------------------------|
/// | `.catalog(c)`     | `LocationCatalog::city()`                 |
/// | `.motion(m)`      | `MotionConfig::default()` (3 u/s, 0.5)    |
/// | `.classifier(c)`  | `Classifier::city()`                      |
/// | `.rng(r)`         | `AgentRng::new(config.seed)`              |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config)
///     .catalog(LocationCatalog::studio())
///     .rng(ScriptedRng::new([0, 1]))
///     .build()?;
/// ```
pub struct SimBuilder<R: RandomSource = AgentRng> {
    config:     SimConfig,
    catalog:    Option<LocationCatalog>,
    motion:     MotionConfig,
    classifier: Option<Classifier>,
    rng:        R,
}

impl SimBuilder<AgentRng> {
    pub fn new(config: SimConfig) -> Self {
        let rng = AgentRng::new(config.seed);
        Self {
            config,
            catalog: None,
            motion: MotionConfig::default(),
            classifier: None,
            rng,
        }
    }
}

impl<R: RandomSource> SimBuilder<R> {
    pub fn catalog(mut self, catalog: LocationCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn motion(mut self, motion: MotionConfig) -> Self {
        self.motion = motion;
        self
    }

    pub fn classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Replace the random source (e.g. with a scripted one in tests).
    pub fn rng<R2: RandomSource>(self, rng: R2) -> SimBuilder<R2> {
        SimBuilder {
            config:     self.config,
            catalog:    self.catalog,
            motion:     self.motion,
            classifier: self.classifier,
            rng,
        }
    }

    /// Validate every input and return a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim<R>> {
        self.config.validate()?;

        let sample_every = self.config.sample_interval_ticks();
        let classifier = self.classifier.unwrap_or_default();
        classifier.validate()?;

        let brain = Brain::new(self.catalog.unwrap_or_default(), self.motion)?;

        Ok(Sim {
            clock: self.config.make_clock(),
            position: self.config.initial_position,
            config: self.config,
            sample_every,
            brain,
            classifier,
            rng: self.rng,
        })
    }
}
