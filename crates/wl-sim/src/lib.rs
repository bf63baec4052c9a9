//! `wl-sim`: tick loop orchestrator for the wanderlog simulation.
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks (or until stopped):
//!   ① Step     : Brain::update(delta_secs, position, rng)
//!   ② Move     : position += displacement
//!   ③ Events   : on_departure / on_arrival for destination changes
//!   ④ Sample   : every sample_interval_ticks (tick 0 included):
//!                 classify(position) and hand a `Sample` to the observer
//! ```
//!
//! The simulation never writes anything itself; logging to disk, echoing
//! to the console, and resource sampling are all observers.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use wl_core::SimConfig;
//! use wl_sim::{NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::new(SimConfig { total_ticks: Some(10_000), ..Default::default() })
//!     .build()?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, Sample, SimObserver};
pub use sim::Sim;
