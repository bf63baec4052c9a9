//! `Classifier`: the pure `(x, z) -> Sense` function.

use serde::{Deserialize, Serialize};

use wl_core::{Point, ZoneId};

use crate::{RoadNetwork, ZoneError, ZoneResult, ZoneTable, DEFAULT_ATMOSPHERE, DEFAULT_MOOD};

/// Radius within which a landmark counts as a nearby building.
pub const NEAR_BUILDING_RADIUS: f64 = 5.0;

/// Half-size of the city's square ground plane.
pub const WORLD_EXTENT: f64 = 100.0;

/// Surface under the agent's feet.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ground {
    Road,
    Terrain,
}

impl Ground {
    pub fn as_str(self) -> &'static str {
        match self {
            Ground::Road => "road",
            Ground::Terrain => "terrain",
        }
    }
}

impl std::fmt::Display for Ground {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The nearest district landmark.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Landmark<'a> {
    pub district: &'a str,
    pub distance: f64,
}

impl Landmark<'_> {
    /// `true` when the landmark's building looms over the agent.
    #[inline]
    pub fn is_near(&self) -> bool {
        self.distance < NEAR_BUILDING_RADIUS
    }
}

/// Everything the agent senses about its spatial context at one point.
#[derive(Clone, Debug, PartialEq)]
pub struct Sense<'a> {
    /// Matching rule, `None` for the fallback zone.
    pub zone:       Option<ZoneId>,
    pub district:   &'a str,
    pub on_road:    bool,
    pub ground:     Ground,
    pub mood:       &'a str,
    pub atmosphere: &'a str,
    pub landmark:   Option<Landmark<'a>>,
}

/// Zone table, road network, and the edge of the world.
///
/// Points outside the square `|x| < extent, |z| < extent` are off the
/// ground plane: no rule matches them and no road reaches them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Classifier {
    pub zones:  ZoneTable,
    pub roads:  RoadNetwork,
    /// `None` makes the plane unbounded.
    pub extent: Option<f64>,
}

impl Classifier {
    pub fn new(zones: ZoneTable, roads: RoadNetwork, extent: Option<f64>) -> ZoneResult<Self> {
        let classifier = Self { zones, roads, extent };
        classifier.validate()?;
        Ok(classifier)
    }

    /// The city layout with the cross-and-diagonals road network.
    pub fn city() -> Self {
        Self {
            zones:  ZoneTable::city(),
            roads:  RoadNetwork::cross_and_diagonals(),
            extent: Some(WORLD_EXTENT),
        }
    }

    pub fn validate(&self) -> ZoneResult<()> {
        if let Some(extent) = self.extent {
            if !(extent.is_finite() && extent > 0.0) {
                return Err(ZoneError::InvalidExtent(extent));
            }
        }
        self.zones.validate()?;
        self.roads.validate()
    }

    /// `true` if `p` lies on the ground plane.
    #[inline]
    pub fn in_world(&self, p: Point) -> bool {
        self.extent.is_none_or(|e| p.x.abs() < e && p.z.abs() < e)
    }

    /// Classify a point.  Total over finite input; never fails.
    pub fn classify(&self, p: Point) -> Sense<'_> {
        let in_world = self.in_world(p);
        let on_road = in_world && self.roads.is_on_road(p);
        let ground = if on_road { Ground::Road } else { Ground::Terrain };

        let located = if in_world { self.zones.locate(p) } else { None };
        let (zone, district, mood, atmosphere) = match located {
            Some((id, rule)) => (Some(id), rule.name.as_str(), rule.mood.as_deref(), rule.atmosphere.as_deref()),
            None => {
                let fallback = self.zones.fallback();
                (None, fallback.name.as_str(), fallback.mood.as_deref(), fallback.atmosphere.as_deref())
            }
        };

        Sense {
            zone,
            district,
            on_road,
            ground,
            mood:       mood.unwrap_or(DEFAULT_MOOD),
            atmosphere: atmosphere.unwrap_or(DEFAULT_ATMOSPHERE),
            landmark:   self.nearest_landmark(p),
        }
    }

    fn nearest_landmark(&self, p: Point) -> Option<Landmark<'_>> {
        self.zones
            .rules()
            .iter()
            .filter_map(|rule| rule.landmark.map(|at| Landmark { district: &rule.name, distance: at.distance(p) }))
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::city()
    }
}
