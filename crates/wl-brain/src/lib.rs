//! `wl-brain`: where the agent goes next and what it does there.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                   |
//! |-------------|------------------------------------------------------------|
//! | [`catalog`] | `Location`, `LocationCatalog` (validated, immutable)       |
//! | [`loader`]  | `load_catalog_csv`, `load_catalog_reader`                  |
//! | [`brain`]   | `Brain`, `MotionConfig`, `Step`, `Visit`, `Phase`          |
//! | [`error`]   | `BrainError`, `BrainResult<T>`                             |
//!
//! # Wander model (summary)
//!
//! ```text
//! traveling: distance(pos, next) >= arrival_threshold
//!            → move straight toward `next` at `speed`
//! dwelling:  distance(pos, next) <  arrival_threshold
//!            → first tick: current = next (arrival)
//!            → dwell -= delta; dwell <= 0 → choose a new (next, activity)
//!              uniformly, never the current location
//! ```

pub mod brain;
pub mod catalog;
pub mod error;
pub mod loader;

#[cfg(test)]
mod tests;

pub use brain::{Brain, MotionConfig, Phase, Step, Visit};
pub use catalog::{Location, LocationCatalog};
pub use error::{BrainError, BrainResult};
pub use loader::{load_catalog_csv, load_catalog_reader};
