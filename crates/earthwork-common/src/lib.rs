//! Common types shared by the earthwork crates.
//!
//! - [`Point3D`] and [`BoundaryPoint`] for survey coordinates
//! - [`GridFrame`] for unrotated and boundary-aligned grid frames
//! - [`GridData`] dense height fields with the [`NO_DATA`] sentinel
//! - [`VolumeResult`] and its [`HeightDiffGrid`]
//! - planar polygon primitives in [`geometry`]

pub mod error;
pub mod frame;
pub mod geometry;
pub mod grid;
pub mod point;
pub mod volume;

pub use error::{GridError, GridResult};
pub use frame::{GridFrame, LocalTransform, Rotation2D, FRAME_TOLERANCE};
pub use geometry::{
    cell_square, clip_polygon, get_intersection, is_convex, is_counter_clockwise,
    is_point_in_polygon, polygon_area, polygon_bounds, signed_area, Polygon,
};
pub use grid::{is_valid_height, Extent, GridData, HeightDiffGrid, NO_DATA};
pub use point::{boundary_polygon, BoundaryPoint, Point3D};
pub use volume::VolumeResult;
