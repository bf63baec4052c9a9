//! `wl-core`: foundational types for the wanderlog agent simulation.
//!
//! This crate is a dependency of every other `wl-*` crate.  It has no `wl-*`
//! dependencies and only a handful of external ones (`rand`, `thiserror`,
//! `serde`, `chrono`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                 |
//! |-------------|----------------------------------------------------------|
//! | [`ids`]     | `LocationId`, `ZoneId`                                   |
//! | [`geo`]     | `Point` on the (x, z) ground plane, `Displacement`       |
//! | [`time`]    | `Tick`, `SimClock`, `SimConfig`                          |
//! | [`rng`]     | `RandomSource` seam, `AgentRng`, `ScriptedRng`           |
//! | [`error`]   | `CoreError`, `CoreResult`                                |

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::{Displacement, Point};
pub use ids::{LocationId, ZoneId};
pub use rng::{AgentRng, RandomSource, ScriptedRng};
pub use time::{SimClock, SimConfig, Tick};
