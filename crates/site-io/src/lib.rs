//! Survey site inputs and grid persistence.
//!
//! - [`parse_origin`] / [`read_origin`]: survey origin from `metadata.xml`
//! - [`parse_boundary`] / [`read_boundary`]: boundary polygon from CSV
//! - [`GridStore`]: keyed storage for rasterized grids

pub mod boundary;
pub mod error;
pub mod origin;
pub mod store;

pub use boundary::{parse_boundary, read_boundary, BoundaryFile};
pub use error::{Result, SiteIoError};
pub use origin::{parse_origin, read_origin};
pub use store::{
    grid_key, FsGridStore, GridStore, InputFingerprint, MemoryGridStore, StoreStats,
};
