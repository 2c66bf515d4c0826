//! Streaming rasterization of survey vertex files into height grids.
//!
//! Each epoch of a survey arrives as one or more OBJ-style files holding
//! tens of millions of `v x y z` records, expressed as offsets from a shared
//! geographic origin. The [`Rasterizer`] turns them into one regular
//! [`GridData`](earthwork_common::GridData):
//!
//! - **Pass 1** streams every source and records the extent in the grid's
//!   frame (unrotated, or aligned to the first boundary edge)
//! - the planned `rows * cols` is checked against a ceiling **before**
//!   allocation
//! - **Pass 2** streams again and keeps the highest z per cell
//! - small holes are closed by 8-neighbour averaging
//!
//! Memory is bounded by the grid, not the input: sources are read in fixed
//! chunks and only the partial trailing line is buffered.
//!
//! # Example
//!
//! ```ignore
//! use gridifier::{FileSource, Rasterizer, GridifierConfig};
//! use earthwork_common::Point3D;
//!
//! let rasterizer = Rasterizer::new(GridifierConfig::from_env());
//! let sources = vec![FileSource::new("epoch1/tile_0.obj")];
//! let grid = rasterizer.rasterize(&sources, origin, 0.5, None).await?;
//! ```

pub mod config;
pub mod error;
pub mod hole_fill;
pub mod layout;
pub mod progress;
pub mod rasterizer;
pub mod reader;
pub mod source;

pub use config::GridifierConfig;
pub use error::{RasterError, Result};
pub use hole_fill::fill_holes;
pub use layout::GridLayout;
pub use progress::{ProgressReporter, RasterPhase, RasterProgress};
pub use rasterizer::{rasterize, Rasterizer};
pub use reader::{parse_record, ReadStats, Record, VertexReader};
pub use source::{BytesSource, FileSource, SourceReader, VertexSource};
