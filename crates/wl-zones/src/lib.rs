//! `wl-zones`: map a ground-plane position to its semantic context.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                   |
//! |----------------|------------------------------------------------------------|
//! | [`zone`]       | `Region`, `ZoneRule`, `ZoneTable` (ordered, first match wins) |
//! | [`roads`]      | `RoadLine`, `RoadNetwork` (distance-to-road test)          |
//! | [`classifier`] | `Classifier`, `Sense`, `Ground`, `Landmark`                |
//! | [`error`]      | `ZoneError`, `ZoneResult<T>`                               |
//!
//! # Classification model
//!
//! ```text
//! district   = first rule in table order whose region contains (x, z),
//!              else the table's fallback zone
//! mood       = district's mood, else DEFAULT_MOOD
//! on_road    = min distance to any road line < road threshold
//! ```
//!
//! Points beyond the world's extent sense the fallback zone and no road.
//!
//! Classification is a pure, total function: every finite point yields
//! exactly one district and the same input always yields the same output.
//! A single table drives every caller, so the live and headless paths can
//! never disagree about boundaries.

pub mod classifier;
pub mod error;
pub mod roads;
pub mod zone;


pub use classifier::{Classifier, Ground, Landmark, Sense, NEAR_BUILDING_RADIUS, WORLD_EXTENT};
pub use error::{ZoneError, ZoneResult};
pub use roads::{RoadLine, RoadNetwork};
pub use zone::{FallbackZone, Region, ZoneRule, ZoneTable, DEFAULT_ATMOSPHERE, DEFAULT_MOOD};
