//! Coordinate frames for height grids.
//!
//! A grid lives either in an unrotated frame anchored at the survey origin,
//! or in a local frame whose X axis runs parallel to the first boundary edge
//! (the CASS convention that lines grid rows up with the site). Local
//! coordinates are `R(-rotation) * (global - anchor)`.

use serde::{Deserialize, Serialize};

use crate::point::{BoundaryPoint, Point3D};

/// Frames whose anchor and rotation differ by less than this are the same frame.
pub const FRAME_TOLERANCE: f64 = 1e-9;

/// Planar rotation by a fixed angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation2D {
    cos: f64,
    sin: f64,
}

impl Rotation2D {
    pub fn new(angle: f64) -> Self {
        Self {
            cos: angle.cos(),
            sin: angle.sin(),
        }
    }

    /// Rotate a vector counter-clockwise by the angle.
    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (x * self.cos - y * self.sin, x * self.sin + y * self.cos)
    }

    /// The opposite rotation.
    pub fn inverse(&self) -> Self {
        Self {
            cos: self.cos,
            sin: -self.sin,
        }
    }
}

/// Frame tag carried by every grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridFrame {
    /// Global point mapped to local origin. `anchor.z` is the elevation datum.
    pub anchor: Point3D,
    /// Rotation of the local X axis relative to global east, radians.
    pub rotation: f64,
}

impl GridFrame {
    /// Unrotated frame anchored at the survey origin.
    pub fn unrotated(origin: Point3D) -> Self {
        Self {
            anchor: origin,
            rotation: 0.0,
        }
    }

    /// Frame aligned to the first edge of `boundary`.
    ///
    /// Falls back to [`GridFrame::unrotated`] when the boundary has fewer than
    /// two vertices. The anchor takes its elevation from `origin.z`.
    pub fn aligned_to_boundary(boundary: &[BoundaryPoint], origin: Point3D) -> Self {
        if boundary.len() < 2 {
            return Self::unrotated(origin);
        }
        let b0 = &boundary[0];
        let b1 = &boundary[1];
        Self {
            anchor: Point3D::new(b0.x, b0.y, origin.z),
            rotation: (b1.y - b0.y).atan2(b1.x - b0.x),
        }
    }

    pub fn is_rotated(&self) -> bool {
        self.rotation.abs() > FRAME_TOLERANCE
    }

    /// Global to local.
    #[inline]
    pub fn to_local(&self, gx: f64, gy: f64) -> (f64, f64) {
        Rotation2D::new(-self.rotation).apply(gx - self.anchor.x, gy - self.anchor.y)
    }

    /// Local to global.
    #[inline]
    pub fn to_global(&self, lx: f64, ly: f64) -> (f64, f64) {
        let (dx, dy) = Rotation2D::new(self.rotation).apply(lx, ly);
        (dx + self.anchor.x, dy + self.anchor.y)
    }

    /// Reusable global-to-local transform for hot loops.
    pub fn local_transform(&self) -> LocalTransform {
        LocalTransform {
            anchor_x: self.anchor.x,
            anchor_y: self.anchor.y,
            inverse: Rotation2D::new(-self.rotation),
        }
    }

    pub fn same_rotation(&self, other: &GridFrame) -> bool {
        (self.rotation - other.rotation).abs() < FRAME_TOLERANCE
    }

    /// Same anchor (planar) and same rotation.
    pub fn is_compatible(&self, other: &GridFrame) -> bool {
        self.same_rotation(other)
            && (self.anchor.x - other.anchor.x).abs() < FRAME_TOLERANCE
            && (self.anchor.y - other.anchor.y).abs() < FRAME_TOLERANCE
    }

    /// Offset to add to local coordinates in `self` to express them in `other`.
    ///
    /// Only meaningful when both frames share a rotation.
    pub fn translation_to(&self, other: &GridFrame) -> (f64, f64) {
        Rotation2D::new(-self.rotation).apply(
            self.anchor.x - other.anchor.x,
            self.anchor.y - other.anchor.y,
        )
    }
}

impl Default for GridFrame {
    fn default() -> Self {
        Self::unrotated(Point3D::ZERO)
    }
}

/// Precomputed global-to-local transform.
#[derive(Debug, Clone, Copy)]
pub struct LocalTransform {
    anchor_x: f64,
    anchor_y: f64,
    inverse: Rotation2D,
}

impl LocalTransform {
    #[inline]
    pub fn apply(&self, gx: f64, gy: f64) -> (f64, f64) {
        self.inverse.apply(gx - self.anchor_x, gy - self.anchor_y)
    }
}
