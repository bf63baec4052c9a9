//! Application configuration file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use wl_brain::{load_catalog_csv, LocationCatalog, MotionConfig};
use wl_core::SimConfig;
use wl_feed::FeedConfig;
use wl_log::LogLayout;
use wl_summary::SummaryConfig;
use wl_zones::Classifier;

/// Everything the binary can be told.  Every field has a default, so an
/// empty JSON object (or no file at all) gives the stock city.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Holds `perceptions/`, `screenshots/` and `resources.jsonl`.
    pub log_root:               PathBuf,
    pub sim:                    SimConfig,
    pub motion:                 MotionConfig,
    pub catalog:                LocationCatalog,
    /// Overrides `catalog` when set.
    pub catalog_csv:            Option<PathBuf>,
    pub classifier:             Classifier,
    pub weather:                Option<String>,
    /// Echo each perception to the log output.
    pub echo:                   bool,
    pub resource_interval_secs: f64,
    pub recent_moments:         usize,
    pub feed:                   FeedConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_root:               PathBuf::from("logs"),
            sim:                    SimConfig::default(),
            motion:                 MotionConfig::default(),
            catalog:                LocationCatalog::city(),
            catalog_csv:            None,
            classifier:             Classifier::city(),
            weather:                Some("rainy".to_string()),
            echo:                   true,
            resource_interval_secs: 300.0,
            recent_moments:         5,
            feed:                   FeedConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read a JSON config file, or use the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn catalog(&self) -> Result<LocationCatalog> {
        match &self.catalog_csv {
            Some(path) => load_catalog_csv(path)
                .with_context(|| format!("loading location catalog {}", path.display())),
            None => Ok(self.catalog.clone()),
        }
    }

    pub fn layout(&self) -> LogLayout {
        LogLayout::new(&self.log_root)
    }

    pub fn summary(&self) -> SummaryConfig {
        SummaryConfig {
            sample_interval_secs: self.sim.sample_interval_secs,
            recent:               self.recent_moments,
        }
    }
}
