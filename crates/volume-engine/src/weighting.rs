//! Boundary weighting strategies.
//!
//! A boundary polygon decides how much of each overlap cell counts toward
//! the integration. One strategy is picked per computation:
//!
//! | Strategy       | Weight                                         |
//! |----------------|------------------------------------------------|
//! | `PointSample`  | 1 if the cell centre is inside, else 0         |
//! | `Supersample`  | fraction of `n x n` sub-cell centres inside    |
//! | `ExactClip`    | area of the cell clipped by the boundary       |
//!
//! `ExactClip` is the reference. It needs a convex boundary; the other two
//! accept any simple polygon.

use std::fmt;
use std::str::FromStr;

use earthwork_common::{
    cell_square, clip_polygon, is_convex, is_point_in_polygon, polygon_area, polygon_bounds,
    signed_area, BoundaryPoint, Extent, GridFrame, Polygon,
};
use serde::{Deserialize, Serialize};

use crate::error::{Result, VolumeError};

/// Sub-grid resolution used when exact clipping is not possible.
pub const DEFAULT_SUPERSAMPLE: usize = 10;

/// How a boundary weights partially covered cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BoundaryWeighting {
    PointSample,
    Supersample { n: usize },
    #[default]
    ExactClip,
}

impl fmt::Display for BoundaryWeighting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PointSample => write!(f, "point"),
            Self::Supersample { n } => write!(f, "supersample:{}", n),
            Self::ExactClip => write!(f, "exact"),
        }
    }
}

impl FromStr for BoundaryWeighting {
    type Err = String;

    /// Accepts `exact`, `point`, `supersample` and `supersample:<n>`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "exact" | "exact_clip" | "clip" => Ok(Self::ExactClip),
            "point" | "point_sample" => Ok(Self::PointSample),
            "supersample" => Ok(Self::Supersample {
                n: DEFAULT_SUPERSAMPLE,
            }),
            other => match other.strip_prefix("supersample:") {
                Some(n) => match n.parse::<usize>() {
                    Ok(n) if n > 0 => Ok(Self::Supersample { n }),
                    _ => Err(format!("invalid supersample resolution: {}", n)),
                },
                None => Err(format!("unknown boundary weighting: {}", other)),
            },
        }
    }
}

impl TryFrom<String> for BoundaryWeighting {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BoundaryWeighting> for String {
    fn from(value: BoundaryWeighting) -> Self {
        value.to_string()
    }
}

/// Boundary expressed in a grid's local frame, wound counter-clockwise.
#[derive(Debug, Clone)]
pub struct LocalBoundary {
    polygon: Polygon,
    bounds: Extent,
    convex: bool,
}

impl LocalBoundary {
    /// Transform `boundary` into `frame` and orient it counter-clockwise.
    pub fn new(boundary: &[BoundaryPoint], frame: &GridFrame) -> Result<Self> {
        if boundary.len() < 3 {
            return Err(VolumeError::InvalidBoundary(format!(
                "need at least 3 vertices, got {}",
                boundary.len()
            )));
        }

        let mut polygon: Polygon = boundary.iter().map(|b| frame.to_local(b.x, b.y)).collect();
        if polygon.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
            return Err(VolumeError::InvalidBoundary(
                "non-finite vertex coordinate".to_string(),
            ));
        }

        let area = signed_area(&polygon);
        if area.abs() < f64::EPSILON {
            return Err(VolumeError::InvalidBoundary(
                "boundary encloses no area".to_string(),
            ));
        }
        if area < 0.0 {
            polygon.reverse();
        }

        let (min_x, min_y, max_x, max_y) = polygon_bounds(&polygon)
            .ok_or_else(|| VolumeError::InvalidBoundary("empty boundary".to_string()))?;
        let convex = is_convex(&polygon);

        Ok(Self {
            polygon,
            bounds: Extent::new(min_x, min_y, max_x, max_y),
            convex,
        })
    }

    pub fn polygon(&self) -> &[(f64, f64)] {
        &self.polygon
    }

    pub fn bounds(&self) -> Extent {
        self.bounds
    }

    pub fn is_convex(&self) -> bool {
        self.convex
    }

    pub fn area(&self) -> f64 {
        polygon_area(&self.polygon)
    }

    /// Effective area of the cell `[x0, x0+gs] x [y0, y0+gs]`.
    pub fn cell_area(&self, weighting: BoundaryWeighting, x0: f64, y0: f64, gs: f64) -> f64 {
        match weighting {
            BoundaryWeighting::PointSample => {
                if is_point_in_polygon(x0 + gs / 2.0, y0 + gs / 2.0, &self.polygon) {
                    gs * gs
                } else {
                    0.0
                }
            }
            BoundaryWeighting::Supersample { n } => self.supersample(x0, y0, gs, n) * gs * gs,
            BoundaryWeighting::ExactClip => self.clipped_area(x0, y0, gs),
        }
    }

    fn supersample(&self, x0: f64, y0: f64, gs: f64, n: usize) -> f64 {
        let n = n.max(1);
        let step = gs / n as f64;
        let mut inside = 0usize;
        for j in 0..n {
            let y = y0 + (j as f64 + 0.5) * step;
            for i in 0..n {
                let x = x0 + (i as f64 + 0.5) * step;
                if is_point_in_polygon(x, y, &self.polygon) {
                    inside += 1;
                }
            }
        }
        inside as f64 / (n * n) as f64
    }

    fn clipped_area(&self, x0: f64, y0: f64, gs: f64) -> f64 {
        let square = cell_square(x0, y0, gs);
        // Convex boundary: all four corners inside means the whole cell is.
        if square
            .iter()
            .all(|&(x, y)| is_point_in_polygon(x, y, &self.polygon))
        {
            return gs * gs;
        }
        polygon_area(&clip_polygon(&square, &self.polygon))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f64, y0: f64, size: f64) -> Vec<BoundaryPoint> {
        vec![
            BoundaryPoint::new("1", x0, y0),
            BoundaryPoint::new("2", x0 + size, y0),
            BoundaryPoint::new("3", x0 + size, y0 + size),
            BoundaryPoint::new("4", x0, y0 + size),
        ]
    }

    #[test]
    fn test_parse_weighting() {
        assert_eq!("exact".parse(), Ok(BoundaryWeighting::ExactClip));
        assert_eq!("Point".parse(), Ok(BoundaryWeighting::PointSample));
        assert_eq!(
            "supersample".parse(),
            Ok(BoundaryWeighting::Supersample { n: 10 })
        );
        assert_eq!(
            "supersample:4".parse(),
            Ok(BoundaryWeighting::Supersample { n: 4 })
        );
        assert!("supersample:0".parse::<BoundaryWeighting>().is_err());
        assert!("nearest".parse::<BoundaryWeighting>().is_err());
    }

    #[test]
    fn test_weighting_display_roundtrip() {
        for w in [
            BoundaryWeighting::ExactClip,
            BoundaryWeighting::PointSample,
            BoundaryWeighting::Supersample { n: 7 },
        ] {
            assert_eq!(w.to_string().parse(), Ok(w));
        }
    }

    #[test]
    fn test_clockwise_boundary_reoriented() {
        let mut b = square(0.0, 0.0, 2.0);
        b.reverse();
        let local = LocalBoundary::new(&b, &GridFrame::default()).unwrap();
        assert!(signed_area(local.polygon()) > 0.0);
        assert!((local.area() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_boundaries_rejected() {
        let frame = GridFrame::default();
        let two = &square(0.0, 0.0, 1.0)[..2];
        assert!(matches!(
            LocalBoundary::new(two, &frame),
            Err(VolumeError::InvalidBoundary(_))
        ));

        let collinear = vec![
            BoundaryPoint::new("1", 0.0, 0.0),
            BoundaryPoint::new("2", 1.0, 1.0),
            BoundaryPoint::new("3", 2.0, 2.0),
        ];
        assert!(LocalBoundary::new(&collinear, &frame).is_err());
    }

    #[test]
    fn test_cell_area_strategies() {
        let local = LocalBoundary::new(&square(0.0, 0.0, 2.5), &GridFrame::default()).unwrap();

        // Fully inside
        for w in [
            BoundaryWeighting::PointSample,
            BoundaryWeighting::Supersample { n: 10 },
            BoundaryWeighting::ExactClip,
        ] {
            assert!((local.cell_area(w, 0.0, 0.0, 1.0) - 1.0).abs() < 1e-12);
        }

        // Half covered cell [2, 3] x [0, 1]
        assert!((local.cell_area(BoundaryWeighting::ExactClip, 2.0, 0.0, 1.0) - 0.5).abs() < 1e-12);
        assert!(
            (local.cell_area(BoundaryWeighting::Supersample { n: 10 }, 2.0, 0.0, 1.0) - 0.5).abs()
                < 1e-12
        );
        assert_eq!(local.cell_area(BoundaryWeighting::PointSample, 2.0, 0.0, 1.0), 0.0);

        // Outside
        assert_eq!(local.cell_area(BoundaryWeighting::ExactClip, 5.0, 5.0, 1.0), 0.0);
    }

    #[test]
    fn test_boundary_in_rotated_frame() {
        let frame = GridFrame {
            anchor: earthwork_common::Point3D::new(10.0, 10.0, 0.0),
            rotation: std::f64::consts::FRAC_PI_2,
        };
        // Global square [10, 12] x [10, 12] rotated a quarter turn lands on
        // local [0, 2] x [-2, 0].
        let local = LocalBoundary::new(&square(10.0, 10.0, 2.0), &frame).unwrap();
        let b = local.bounds();
        assert!((b.min_x - 0.0).abs() < 1e-9);
        assert!((b.max_x - 2.0).abs() < 1e-9);
        assert!((b.min_y + 2.0).abs() < 1e-9);
        assert!((b.max_y - 0.0).abs() < 1e-9);
        assert!((local.area() - 4.0).abs() < 1e-9);
    }
}
