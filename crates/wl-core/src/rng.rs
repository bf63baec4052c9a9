//! Injectable randomness for destination and activity choice.
//!
//! # Determinism strategy
//!
//! Every random decision the scheduler makes is "pick one of `len` options".
//! That single operation is the [`RandomSource`] seam:
//!
//! - [`AgentRng`] wraps a seeded `SmallRng`.  The same seed always produces
//!   the same wander path, so whole runs are reproducible.
//! - [`ScriptedRng`] replays a fixed list of indices, letting tests force a
//!   specific destination/activity sequence.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Source of uniform choices.
pub trait RandomSource {
    /// Return an index uniformly distributed in `0..len`.
    ///
    /// Callers guarantee `len > 0`.
    fn pick(&mut self, len: usize) -> usize;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    #[inline]
    fn pick(&mut self, len: usize) -> usize {
        (**self).pick(len)
    }
}

// ── AgentRng ──────────────────────────────────────────────────────────────────

/// Deterministic per-agent RNG.
pub struct AgentRng(SmallRng);

impl AgentRng {
    /// Seed deterministically from the run's global seed.
    pub fn new(seed: u64) -> Self {
        AgentRng(SmallRng::seed_from_u64(seed ^ MIXING_CONSTANT))
    }
}

impl RandomSource for AgentRng {
    #[inline]
    fn pick(&mut self, len: usize) -> usize {
        self.0.gen_range(0..len)
    }
}

// ── ScriptedRng ───────────────────────────────────────────────────────────────

/// A [`RandomSource`] that replays a fixed script of indices, cycling when it
/// runs out.  Each scripted value is reduced modulo `len`.
#[derive(Clone, Debug)]
pub struct ScriptedRng {
    script: Vec<usize>,
    cursor: usize,
}

impl ScriptedRng {
    /// An empty script always picks index 0.
    pub fn new(script: impl Into<Vec<usize>>) -> Self {
        Self {
            script: script.into(),
            cursor: 0,
        }
    }

    /// How many picks have been served so far.
    pub fn picks(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRng {
    fn pick(&mut self, len: usize) -> usize {
        let value = if self.script.is_empty() {
            0
        } else {
            self.script[self.cursor % self.script.len()]
        };
        self.cursor += 1;
        value % len
    }
}
