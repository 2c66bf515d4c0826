//! Cut/fill volume computation between two survey epochs.
//!
//! Given two [`GridData`](earthwork_common::GridData) in the same frame and
//! an optional boundary, [`VolumeCalculator::compute`] walks every cell of
//! their overlap, looks up both heights (with a one-cell fallback for empty
//! bins), weights the cell by boundary coverage and accumulates:
//!
//! - **fill**: `diff > 0`, material added
//! - **cut**: `diff < 0`, reported as a positive magnitude
//! - **area**: every cell where both heights resolved
//!
//! Differences below the noise threshold count toward area only.

pub mod calculator;
pub mod config;
pub mod error;
pub mod overlap;
pub mod sampling;
pub mod weighting;

pub use calculator::{compute_volume, VolumeCalculator};
pub use config::VolumeConfig;
pub use error::{Result, VolumeError};
pub use overlap::Overlap;
pub use sampling::sample_height;
pub use weighting::{BoundaryWeighting, LocalBoundary, DEFAULT_SUPERSAMPLE};
