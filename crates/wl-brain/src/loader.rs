//! CSV location-catalog loader.
//!
//! # CSV format
//!
//! One row per location, in catalog order.  Activities are `|`-separated.
//!
//! ```csv
//! name,x,z,activities,duration
//! Workspace,5,5,working|thinking,15
//! Ideas,15,5,brainstorming|dreaming,10
//! ```
//!
//! The resulting catalog goes through [`LocationCatalog::new`], so a file
//! with fewer than two rows is rejected just like a hand-built one.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::{BrainError, BrainResult, Location, LocationCatalog};

#[derive(Deserialize)]
struct LocationRecord {
    name:       String,
    x:          f64,
    z:          f64,
    activities: String,
    duration:   f64,
}

/// Load a catalog from a CSV file.
pub fn load_catalog_csv(path: &Path) -> BrainResult<LocationCatalog> {
    let file = std::fs::File::open(path)?;
    load_catalog_reader(file)
}

/// Like [`load_catalog_csv`] but accepts any `Read` source.
pub fn load_catalog_reader<R: Read>(reader: R) -> BrainResult<LocationCatalog> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut locations = Vec::new();
    for result in csv_reader.deserialize::<LocationRecord>() {
        let row = result.map_err(|e| BrainError::Parse(e.to_string()))?;
        locations.push(Location {
            name:       row.name,
            x:          row.x,
            z:          row.z,
            activities: split_activities(&row.activities),
            duration:   row.duration,
        });
    }

    LocationCatalog::new(locations)
}

fn split_activities(s: &str) -> Vec<String> {
    s.split('|')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect()
}
