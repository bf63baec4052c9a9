//! `wl-log`: the perception log: what gets written, where, and how it is
//! read back.
//!
//! # On-disk layout
//!
//! ```text
//! <root>/
//!   perceptions/2024-03-01.jsonl   one JSON object per line, UTC date of `t`
//!   perceptions/2024-03-02.jsonl
//!   screenshots/<file>             binary assets referenced by marker lines
//!   resources.jsonl                memory samples from `ResourceMonitor`
//! ```
//!
//! A line is either a perception record
//! `{"t":…,"pos":{"x":…,"z":…},"district":…,"activity":…,"ground":…,"mood":…}`
//! or a screenshot marker `{"type":"screenshot","t":…,"file":…}`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use wl_log::{DailyLogWriter, LogLayout, PerceptionRecorder};
//!
//! let layout = LogLayout::new("./logs");
//! let mut recorder = PerceptionRecorder::new(DailyLogWriter::new(layout.perceptions_dir()));
//! sim.run(&mut recorder)?;
//! recorder.take_error().map(|e| eprintln!("log error: {e}"));
//! ```

pub mod error;
pub mod jsonl;
pub mod layout;
pub mod observer;
pub mod reader;
pub mod record;
pub mod resources;
pub mod writer;

#[cfg(test)]
mod tests;

pub use error::{LogError, LogResult};
pub use jsonl::DailyLogWriter;
pub use layout::{log_path_for, LogLayout};
pub use observer::PerceptionRecorder;
pub use reader::{parse_complete, read_day, read_recent, ParsedLines};
pub use record::{LogLine, PerceptionRecord, ScreenshotRecord};
pub use resources::{MemorySampler, ResourceMonitor, ResourceSample, RESOURCE_HISTORY};
pub use writer::LogWriter;
