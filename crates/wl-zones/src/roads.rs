//! The road network as a set of infinite straight lines.
//!
//! The city's roads are two orthogonal avenues and two diagonals through the
//! origin.  A point counts as "on the road" when its perpendicular distance
//! to the nearest line is below the road threshold, independent of which
//! district it lies in.

use serde::{Deserialize, Serialize};

use wl_core::Point;

use crate::{ZoneError, ZoneResult};

/// An infinite straight road through `through` with direction `(dir_x, dir_z)`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoadLine {
    pub through: Point,
    pub dir_x:   f64,
    pub dir_z:   f64,
}

impl RoadLine {
    pub fn through_origin(dir_x: f64, dir_z: f64) -> Self {
        Self { through: Point::ORIGIN, dir_x, dir_z }
    }

    /// Perpendicular distance from `p` to the line.
    #[inline]
    pub fn distance(&self, p: Point) -> f64 {
        let rx = p.x - self.through.x;
        let rz = p.z - self.through.z;
        (rx * self.dir_z - rz * self.dir_x).abs() / self.dir_x.hypot(self.dir_z)
    }
}

/// All roads plus the on-road threshold.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoadNetwork {
    lines:     Vec<RoadLine>,
    threshold: f64,
}

impl RoadNetwork {
    pub fn new(lines: Vec<RoadLine>, threshold: f64) -> ZoneResult<Self> {
        let network = Self { lines, threshold };
        network.validate()?;
        Ok(network)
    }

    /// East-west and north-south avenues plus both diagonals, 1.5 units wide
    /// either side.
    pub fn cross_and_diagonals() -> Self {
        Self {
            lines: vec![
                RoadLine::through_origin(1.0, 0.0),
                RoadLine::through_origin(0.0, 1.0),
                RoadLine::through_origin(1.0, 1.0),
                RoadLine::through_origin(1.0, -1.0),
            ],
            threshold: 1.5,
        }
    }

    pub fn validate(&self) -> ZoneResult<()> {
        if !(self.threshold.is_finite() && self.threshold > 0.0) {
            return Err(ZoneError::InvalidThreshold(self.threshold));
        }
        for (index, line) in self.lines.iter().enumerate() {
            if !line.through.is_finite() || !line.dir_x.is_finite() || !line.dir_z.is_finite() {
                return Err(ZoneError::InvalidRoad { index, reason: "non-finite component".into() });
            }
            if line.dir_x == 0.0 && line.dir_z == 0.0 {
                return Err(ZoneError::InvalidRoad { index, reason: "zero direction".into() });
            }
        }
        Ok(())
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Distance to the nearest road; infinite when there are no roads.
    pub fn distance_to_road(&self, p: Point) -> f64 {
        self.lines
            .iter()
            .map(|line| line.distance(p))
            .fold(f64::INFINITY, f64::min)
    }

    #[inline]
    pub fn is_on_road(&self, p: Point) -> bool {
        self.distance_to_road(p) < self.threshold
    }
}

impl Default for RoadNetwork {
    fn default() -> Self {
        Self::cross_and_diagonals()
    }
}
