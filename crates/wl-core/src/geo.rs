//! Planar coordinates on the world's ground plane.
//!
//! The world is flat: an agent's position is `(x, z)`, with `y` (height)
//! belonging to the renderer.  Coordinates are `f64` in world units.

use serde::{Deserialize, Serialize};

/// A position on the (x, z) ground plane.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub z: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, z: 0.0 };

    #[inline]
    pub fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.z - self.z)
    }

    /// Round both coordinates to one decimal place (the precision written to
    /// perception logs).
    #[inline]
    pub fn rounded(self) -> Point {
        Point {
            x: (self.x * 10.0).round() / 10.0,
            z: (self.z * 10.0).round() / 10.0,
        }
    }

    /// `true` if both coordinates are finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.z.is_finite()
    }

    #[inline]
    pub fn offset(self, d: Displacement) -> Point {
        Point {
            x: self.x + d.dx,
            z: self.z + d.dz,
        }
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.z)
    }
}

/// A per-tick movement vector.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Displacement {
    pub dx: f64,
    pub dz: f64,
}

impl Displacement {
    pub const ZERO: Displacement = Displacement { dx: 0.0, dz: 0.0 };

    /// Length of the vector.
    #[inline]
    pub fn magnitude(self) -> f64 {
        self.dx.hypot(self.dz)
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.dx == 0.0 && self.dz == 0.0
    }
}
