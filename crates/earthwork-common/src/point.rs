//! Survey points and boundary vertices.

use serde::{Deserialize, Serialize};

/// Geographic offset vector: easting, northing, elevation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3D {
    pub const ZERO: Point3D = Point3D {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Component-wise sum, used to lift origin-relative offsets to global.
    pub fn offset_by(&self, other: &Point3D) -> Point3D {
        Point3D::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// One vertex of a site boundary polygon.
///
/// Survey files list northing before easting; this type always stores
/// `x = easting`, `y = northing`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryPoint {
    pub id: String,
    /// Easting
    pub x: f64,
    /// Northing
    pub y: f64,
}

impl BoundaryPoint {
    pub fn new(id: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            x,
            y,
        }
    }

    /// Build from survey order (northing first).
    pub fn from_survey(id: impl Into<String>, northing: f64, easting: f64) -> Self {
        Self::new(id, easting, northing)
    }
}

/// Boundary vertices as a plain `(x, y)` polygon in global coordinates.
pub fn boundary_polygon(boundary: &[BoundaryPoint]) -> Vec<(f64, f64)> {
    boundary.iter().map(|p| (p.x, p.y)).collect()
}
