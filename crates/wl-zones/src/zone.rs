//! The ordered zone table.
//!
//! Regions may overlap at their edges (the city's Suburbs quadrant touches
//! both the Business District and the Tech Quarter), so rule order is part
//! of the table's meaning: the first rule whose region contains a point wins.
//! All bounds are strict, so a point lying exactly on an edge belongs to
//! neither side of it.

use serde::{Deserialize, Serialize};

use wl_core::{Point, ZoneId};

use crate::{ZoneError, ZoneResult};

/// Mood reported for a district that has none configured.
pub const DEFAULT_MOOD: &str = "exploring";

/// Atmosphere reported for a district that has none configured.
pub const DEFAULT_ATMOSPHERE: &str = "exploring, discovering";

// ── Region ────────────────────────────────────────────────────────────────────

/// A predicate over the ground plane.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Region {
    /// Axis-aligned box with open bounds.  A missing bound is unbounded, so a
    /// rect with one bound per axis is a quadrant and a rect with a single
    /// bound is a half-plane.
    Rect {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_x: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_x: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_z: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_z: Option<f64>,
    },
    /// Open disc around `center`.
    Disc { center: Point, radius: f64 },
}

impl Region {
    /// Rect bounded on every side.
    pub fn rect(min_x: f64, max_x: f64, min_z: f64, max_z: f64) -> Self {
        Region::Rect {
            min_x: Some(min_x),
            max_x: Some(max_x),
            min_z: Some(min_z),
            max_z: Some(max_z),
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        match *self {
            Region::Rect { min_x, max_x, min_z, max_z } => {
                min_x.is_none_or(|b| p.x > b)
                    && max_x.is_none_or(|b| p.x < b)
                    && min_z.is_none_or(|b| p.z > b)
                    && max_z.is_none_or(|b| p.z < b)
            }
            Region::Disc { center, radius } => center.distance(p) < radius,
        }
    }

    fn validate(&self) -> Result<(), String> {
        match *self {
            Region::Rect { min_x, max_x, min_z, max_z } => {
                for bound in [min_x, max_x, min_z, max_z].into_iter().flatten() {
                    if !bound.is_finite() {
                        return Err(format!("bound {bound} is not finite"));
                    }
                }
                if let (Some(lo), Some(hi)) = (min_x, max_x) {
                    if lo >= hi {
                        return Err(format!("min_x {lo} must be below max_x {hi}"));
                    }
                }
                if let (Some(lo), Some(hi)) = (min_z, max_z) {
                    if lo >= hi {
                        return Err(format!("min_z {lo} must be below max_z {hi}"));
                    }
                }
                Ok(())
            }
            Region::Disc { center, radius } => {
                if !center.is_finite() {
                    return Err("disc center is not finite".into());
                }
                if !(radius.is_finite() && radius > 0.0) {
                    return Err(format!("disc radius {radius} must be positive"));
                }
                Ok(())
            }
        }
    }
}

// ── ZoneRule ──────────────────────────────────────────────────────────────────

/// One named district.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZoneRule {
    pub name: String,
    pub region: Region,
    /// `None` reports [`DEFAULT_MOOD`].
    #[serde(default)]
    pub mood: Option<String>,
    /// `None` reports [`DEFAULT_ATMOSPHERE`].
    #[serde(default)]
    pub atmosphere: Option<String>,
    /// Representative point (the district's centre building), used by the
    /// proximity sense.
    #[serde(default)]
    pub landmark: Option<Point>,
}

/// The district reported when no rule matches.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FallbackZone {
    pub name: String,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub atmosphere: Option<String>,
}

// ── ZoneTable ─────────────────────────────────────────────────────────────────

/// An ordered list of zone rules plus a catch-all fallback.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZoneTable {
    rules:    Vec<ZoneRule>,
    fallback: FallbackZone,
}

impl ZoneTable {
    /// Validate and build a table.  Rule order is preserved.
    pub fn new(rules: Vec<ZoneRule>, fallback: FallbackZone) -> ZoneResult<Self> {
        let table = Self { rules, fallback };
        table.validate()?;
        Ok(table)
    }

    /// Check every rule; used after deserializing a table from config.
    pub fn validate(&self) -> ZoneResult<()> {
        for (index, rule) in self.rules.iter().enumerate() {
            if rule.name.trim().is_empty() {
                return Err(ZoneError::EmptyName { index });
            }
            rule.region
                .validate()
                .map_err(|reason| ZoneError::InvalidRegion { name: rule.name.clone(), reason })?;
            if rule.landmark.is_some_and(|p| !p.is_finite()) {
                return Err(ZoneError::InvalidRegion {
                    name:   rule.name.clone(),
                    reason: "landmark is not finite".into(),
                });
            }
        }
        if self.fallback.name.trim().is_empty() {
            return Err(ZoneError::EmptyName { index: self.rules.len() });
        }
        Ok(())
    }

    /// The seven-district city layout.
    pub fn city() -> Self {
        fn rule(name: &str, region: Region, mood: &str, atmosphere: &str, landmark: (f64, f64)) -> ZoneRule {
            ZoneRule {
                name:       name.to_string(),
                region,
                mood:       Some(mood.to_string()),
                atmosphere: Some(atmosphere.to_string()),
                landmark:   Some(Point::new(landmark.0, landmark.1)),
            }
        }

        let rules = vec![
            rule(
                "Downtown",
                Region::rect(-10.0, 10.0, -10.0, 10.0),
                "alert",
                "busy, electric, neon lights reflecting off wet surfaces, ambient hum of the city",
                (0.0, 0.0),
            ),
            rule(
                "Business District",
                Region::Rect { min_x: Some(20.0), max_x: None, min_z: Some(-15.0), max_z: Some(15.0) },
                "focused",
                "structured, purposeful, glass and steel, slightly sterile",
                (30.0, 0.0),
            ),
            rule(
                "Residential",
                Region::Rect { min_x: None, max_x: Some(-20.0), min_z: Some(-15.0), max_z: Some(15.0) },
                "calm",
                "quieter, lived-in, softer lighting, sense of routine and rest",
                (-30.0, 0.0),
            ),
            rule(
                "Tech Quarter",
                Region::Rect { min_x: Some(-15.0), max_x: Some(15.0), min_z: Some(20.0), max_z: None },
                "curious",
                "innovative, bright screens glowing, energy of creation",
                (0.0, 30.0),
            ),
            rule(
                "Industrial",
                Region::Rect { min_x: Some(-15.0), max_x: Some(15.0), min_z: None, max_z: Some(-20.0) },
                "grounded",
                "raw, mechanical, rougher textures, functional rather than aesthetic",
                (0.0, -30.0),
            ),
            rule(
                "Suburbs",
                Region::Rect { min_x: Some(15.0), max_x: None, min_z: Some(15.0), max_z: None },
                "peaceful",
                "peaceful, spacious, gentle, room to think",
                (25.0, 25.0),
            ),
            rule(
                "Old Town",
                Region::Rect { min_x: None, max_x: Some(-15.0), min_z: None, max_z: Some(-15.0) },
                "thoughtful",
                "historical, textured, layers of time, stories in the architecture",
                (-25.0, -25.0),
            ),
        ];

        Self {
            rules,
            fallback: FallbackZone {
                name:       "Between zones".to_string(),
                mood:       Some("wandering".to_string()),
                atmosphere: None,
            },
        }
    }

    pub fn rules(&self) -> &[ZoneRule] {
        &self.rules
    }

    pub fn fallback(&self) -> &FallbackZone {
        &self.fallback
    }

    /// First rule containing `p`, in table order.
    pub fn locate(&self, p: Point) -> Option<(ZoneId, &ZoneRule)> {
        self.rules
            .iter()
            .enumerate()
            .find(|(_, rule)| rule.region.contains(p))
            .map(|(i, rule)| (ZoneId(i as u16), rule))
    }

    /// Mood for a district name; [`DEFAULT_MOOD`] if the name is unknown or
    /// has no mood configured.
    pub fn mood_of(&self, district: &str) -> &str {
        if district == self.fallback.name {
            return self.fallback.mood.as_deref().unwrap_or(DEFAULT_MOOD);
        }
        self.rules
            .iter()
            .find(|rule| rule.name == district)
            .and_then(|rule| rule.mood.as_deref())
            .unwrap_or(DEFAULT_MOOD)
    }

    /// Every district name this table can report, fallback last.
    pub fn district_names(&self) -> impl Iterator<Item = &str> {
        self.rules
            .iter()
            .map(|rule| rule.name.as_str())
            .chain(std::iter::once(self.fallback.name.as_str()))
    }
}

impl Default for ZoneTable {
    fn default() -> Self {
        Self::city()
    }
}
