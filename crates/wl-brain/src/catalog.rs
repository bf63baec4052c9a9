//! The immutable location catalog.
//!
//! A catalog is loaded once at startup and never changes.  Construction
//! validates every entry, and a catalog with fewer than two locations is
//! rejected outright: the scheduler never picks the location it is leaving,
//! so a single-entry catalog would leave it nowhere to go.

use serde::{Deserialize, Serialize};

use wl_core::{LocationId, Point};

use crate::{BrainError, BrainResult};

// ── Location ──────────────────────────────────────────────────────────────────

/// A named point of interest with the activities done there.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name:       String,
    pub x:          f64,
    pub z:          f64,
    /// Candidate activity labels; one is chosen uniformly per visit.
    pub activities: Vec<String>,
    /// Dwell time on arrival, in seconds.
    pub duration:   f64,
}

impl Location {
    pub fn new(name: &str, x: f64, z: f64, activities: &[&str], duration: f64) -> Self {
        Self {
            name:       name.to_string(),
            x,
            z,
            activities: activities.iter().map(|a| a.to_string()).collect(),
            duration,
        }
    }

    #[inline]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.z)
    }

    fn check(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name is empty".into());
        }
        if !self.position().is_finite() {
            return Err(format!("coordinate ({}, {}) is not finite", self.x, self.z));
        }
        if self.activities.is_empty() {
            return Err("no activities".into());
        }
        if self.activities.iter().any(|a| a.trim().is_empty()) {
            return Err("empty activity label".into());
        }
        if !(self.duration.is_finite() && self.duration > 0.0) {
            return Err(format!("duration {} must be a positive number of seconds", self.duration));
        }
        Ok(())
    }
}

// ── LocationCatalog ───────────────────────────────────────────────────────────

/// Validated, ordered set of locations.  `LocationId(i)` is the `i`-th entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Location>", into = "Vec<Location>")]
pub struct LocationCatalog {
    locations: Vec<Location>,
}

impl LocationCatalog {
    pub fn new(locations: Vec<Location>) -> BrainResult<Self> {
        if locations.len() < 2 {
            return Err(BrainError::CatalogTooSmall(locations.len()));
        }
        if locations.len() > u16::MAX as usize {
            return Err(BrainError::Parse(format!("{} locations exceed the id space", locations.len())));
        }
        for (index, location) in locations.iter().enumerate() {
            location.check().map_err(|reason| BrainError::InvalidLocation {
                index,
                name: location.name.clone(),
                reason,
            })?;
        }
        Ok(Self { locations })
    }

    /// Seven districts of the rainy city.
    pub fn city() -> Self {
        Self {
            locations: vec![
                Location::new("Downtown", 0.0, 0.0, &["exploring", "observing"], 15.0),
                Location::new("Business District", 30.0, 0.0, &["working", "networking"], 12.0),
                Location::new("Residential Area", -30.0, 0.0, &["wandering", "thinking"], 18.0),
                Location::new("Tech Quarter", 0.0, 30.0, &["building", "creating"], 14.0),
                Location::new("Industrial Zone", 0.0, -30.0, &["investigating", "learning"], 10.0),
                Location::new("Suburbs", 25.0, 25.0, &["reflecting", "resting"], 20.0),
                Location::new("Old Town", -25.0, -25.0, &["discovering", "contemplating"], 16.0),
            ],
        }
    }

    /// Five spots of the small studio world.
    pub fn studio() -> Self {
        Self {
            locations: vec![
                Location::new("Workspace", 5.0, 5.0, &["working", "thinking"], 15.0),
                Location::new("Ideas", 15.0, 5.0, &["brainstorming", "dreaming"], 10.0),
                Location::new("Thinking Space", 5.0, 15.0, &["contemplating", "reflecting"], 20.0),
                Location::new("Projects", 15.0, 15.0, &["building", "creating"], 12.0),
                Location::new("Monument", 10.0, 10.0, &["observing", "pondering"], 8.0),
            ],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Always `false`: a valid catalog holds at least two locations.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    #[inline]
    pub fn get(&self, id: LocationId) -> Option<&Location> {
        self.locations.get(id.index())
    }

    /// Panics on an ID not produced by this catalog.
    #[inline]
    pub fn location(&self, id: LocationId) -> &Location {
        &self.locations[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (LocationId, &Location)> {
        self.locations
            .iter()
            .enumerate()
            .map(|(i, loc)| (LocationId(i as u16), loc))
    }

    pub fn find(&self, name: &str) -> Option<LocationId> {
        self.iter().find(|(_, loc)| loc.name == name).map(|(id, _)| id)
    }
}

impl Default for LocationCatalog {
    fn default() -> Self {
        Self::city()
    }
}

impl TryFrom<Vec<Location>> for LocationCatalog {
    type Error = BrainError;

    fn try_from(locations: Vec<Location>) -> BrainResult<Self> {
        Self::new(locations)
    }
}

impl From<LocationCatalog> for Vec<Location> {
    fn from(catalog: LocationCatalog) -> Self {
        catalog.locations
    }
}
