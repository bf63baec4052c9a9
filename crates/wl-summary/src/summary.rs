//! Aggregation of one day's log.

use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use wl_log::{read_day, LogLine, PerceptionRecord};

use crate::{SummaryError, SummaryResult};

/// Inputs that are not in the log itself.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Seconds one perception stands for.  Default 30.
    pub sample_interval_secs: f64,
    /// Perceptions kept verbatim as "recent moments".  Default 5.
    pub recent: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self { sample_interval_secs: 30.0, recent: 5 }
    }
}

impl SummaryConfig {
    pub fn validate(&self) -> SummaryResult<()> {
        if !(self.sample_interval_secs.is_finite() && self.sample_interval_secs > 0.0) {
            return Err(SummaryError::Config(format!(
                "sample_interval_secs must be positive, got {}",
                self.sample_interval_secs
            )));
        }
        Ok(())
    }
}

/// One row of a frequency table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    pub name:    String,
    pub count:   usize,
    /// `count / total` as a whole percentage, rounded half up.
    pub percent: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    /// Perception records (screenshot markers excluded).
    pub total:         usize,
    /// `total × sample_interval_secs`.
    pub duration_secs: f64,
    /// Sorted by count, descending; ties by name.
    pub districts:     Vec<Share>,
    pub activities:    Vec<Share>,
    pub moods:         Vec<Share>,
    /// Last few perceptions, oldest first.
    pub recent:        Vec<PerceptionRecord>,
    /// Every screenshot file referenced, in log order.
    pub screenshots:   Vec<String>,
}

impl DaySummary {
    pub fn duration_minutes(&self) -> u64 {
        (self.duration_secs / 60.0).round() as u64
    }
}

/// Summarize one day's lines.  `None` when there is no perception to
/// summarize.
pub fn summarize(lines: &[LogLine], config: &SummaryConfig) -> Option<DaySummary> {
    let perceptions: Vec<&PerceptionRecord> = lines.iter().filter_map(LogLine::as_perception).collect();
    if perceptions.is_empty() {
        return None;
    }
    let total = perceptions.len();

    let screenshots = lines
        .iter()
        .filter_map(LogLine::as_screenshot)
        .map(|s| s.file.clone())
        .collect();

    let skip = total.saturating_sub(config.recent);
    let recent = perceptions[skip..].iter().map(|&p| p.clone()).collect();

    Some(DaySummary {
        total,
        duration_secs: total as f64 * config.sample_interval_secs,
        districts: shares(perceptions.iter().map(|p| p.district.as_str()), total),
        activities: shares(perceptions.iter().map(|p| p.activity.as_str()), total),
        moods: shares(perceptions.iter().map(|p| p.mood.as_str()), total),
        recent,
        screenshots,
    })
}

/// Read and summarize a day file.  A missing file and a file without
/// perceptions are both `Ok(None)`.
pub fn summarize_file(path: &Path, config: &SummaryConfig) -> SummaryResult<Option<DaySummary>> {
    config.validate()?;
    let Some(lines) = read_day(path)? else {
        return Ok(None);
    };
    Ok(summarize(&lines, config))
}

fn shares<'a>(names: impl Iterator<Item = &'a str>, total: usize) -> Vec<Share> {
    let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
    for name in names {
        *counts.entry(name).or_default() += 1;
    }

    let mut table: Vec<Share> = counts
        .into_iter()
        .map(|(name, count)| Share {
            name: name.to_string(),
            count,
            percent: (count as f64 * 100.0 / total as f64).round() as u32,
        })
        .collect();
    table.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    table
}
