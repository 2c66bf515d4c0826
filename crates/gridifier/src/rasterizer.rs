//! Two-pass streaming rasterizer.
//!
//! ```text
//! sources ──► pass 1: extent scan (local frame) ──► GridLayout::plan
//!                                                        │ ceiling check
//!                                                        ▼
//!                                              allocate NO_DATA grid
//!                                                        │
//! sources ──► pass 2: bin by max z per cell ─────────────┤
//!                                                        ▼
//!                                                   fill_holes
//!                                                        │
//!                                                        ▼
//!                                                    GridData
//! ```

use std::time::Instant;

use earthwork_common::{
    BoundaryPoint, Extent, GridData, GridFrame, LocalTransform, Point3D, NO_DATA,
};
use metrics::{counter, histogram};
use tracing::{debug, info, instrument, warn};

use crate::config::GridifierConfig;
use crate::error::{RasterError, Result};
use crate::hole_fill::fill_holes;
use crate::layout::GridLayout;
use crate::progress::{ProgressReporter, RasterPhase, RasterProgress};
use crate::reader::{ReadStats, VertexReader};
use crate::source::VertexSource;

/// Converts vertex sources into a single max-height grid.
pub struct Rasterizer {
    config: GridifierConfig,
    progress: ProgressReporter,
}

impl Rasterizer {
    pub fn new(config: GridifierConfig) -> Self {
        let progress = ProgressReporter::new(config.progress_interval);
        Self { config, progress }
    }

    pub fn config(&self) -> &GridifierConfig {
        &self.config
    }

    /// Receive progress snapshots. Dropping the receiver never stalls a run.
    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<RasterProgress> {
        self.progress.subscribe()
    }

    /// Rasterize `sources` into one grid.
    ///
    /// Vertex records are offsets from `origin`. When `boundary` has at least
    /// two vertices the grid is built in a frame aligned to its first edge;
    /// otherwise in the unrotated frame anchored at `origin`.
    #[instrument(skip_all, fields(sources = sources.len(), grid_size = grid_size))]
    pub async fn rasterize<S: VertexSource>(
        &self,
        sources: &[S],
        origin: Point3D,
        grid_size: f64,
        boundary: Option<&[BoundaryPoint]>,
    ) -> Result<GridData> {
        if grid_size <= 0.0 || !grid_size.is_finite() {
            return Err(RasterError::InvalidGridSize(grid_size));
        }
        if sources.is_empty() {
            return Err(RasterError::NoSources);
        }

        let started = Instant::now();
        let frame = match boundary {
            Some(b) if b.len() >= 2 => GridFrame::aligned_to_boundary(b, origin),
            _ => GridFrame::unrotated(origin),
        };
        info!(
            rotation_deg = frame.rotation.to_degrees(),
            anchor_x = frame.anchor.x,
            anchor_y = frame.anchor.y,
            "Rasterizing in {} frame",
            if frame.is_rotated() { "boundary-aligned" } else { "unrotated" }
        );

        let (scanned, scan_stats) = self.scan_extent(sources, origin, &frame).await?;
        if scan_stats.vertices == 0 {
            warn!(skipped = scan_stats.skipped, "No valid vertices in any source");
            return Err(RasterError::NoData {
                sources: sources.len(),
            });
        }

        let layout = GridLayout::plan(scanned, grid_size, self.config.max_cells)?;
        info!(
            vertices = scan_stats.vertices,
            skipped = scan_stats.skipped,
            rows = layout.rows,
            cols = layout.cols,
            "Extent scan complete"
        );

        let mut heights = vec![NO_DATA; layout.cells()];
        let bin_stats = self
            .bin_vertices(sources, origin, &frame, &layout, &mut heights)
            .await?;

        self.progress.phase(RasterPhase::FillingHoles, sources.len());
        let filled = fill_holes(
            &mut heights,
            layout.rows,
            layout.cols,
            self.config.hole_fill_min_neighbors,
            self.config.hole_fill_passes,
        );
        counter!("gridifier_holes_filled_total").increment(filled as u64);

        let grid = GridData::from_parts(
            layout.extent,
            grid_size,
            layout.rows,
            layout.cols,
            heights,
            frame,
        )?;

        let elapsed = started.elapsed();
        histogram!("gridifier_rasterize_duration_seconds").record(elapsed.as_secs_f64());
        self.progress.phase(RasterPhase::Done, sources.len());
        info!(
            binned = bin_stats.vertices,
            filled,
            valid_cells = grid.valid_count(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Rasterization complete"
        );

        Ok(grid)
    }

    /// Pass 1: bounding box of every vertex in the grid's local frame.
    async fn scan_extent<S: VertexSource>(
        &self,
        sources: &[S],
        origin: Point3D,
        frame: &GridFrame,
    ) -> Result<(Extent, ReadStats)> {
        self.progress.phase(RasterPhase::ScanningExtent, sources.len());
        let transform = frame.local_transform();
        let mut extent = Extent::empty();
        let mut total = ReadStats::default();

        for (index, source) in sources.iter().enumerate() {
            self.progress.source(index, source.name());
            let base = total.vertices;
            let stats = self
                .stream_source(source, base, |x, y, _z| {
                    let (lx, ly) = to_local(&transform, &origin, x, y);
                    extent.include(lx, ly);
                })
                .await?;
            debug!(source = source.name(), vertices = stats.vertices, "Scanned source");
            total.merge(&stats);
        }

        counter!("gridifier_records_skipped_total").increment(total.skipped);
        Ok((extent, total))
    }

    /// Pass 2: keep the highest z per cell.
    ///
    /// Max is commutative, so the result does not depend on source order.
    async fn bin_vertices<S: VertexSource>(
        &self,
        sources: &[S],
        origin: Point3D,
        frame: &GridFrame,
        layout: &GridLayout,
        heights: &mut [f32],
    ) -> Result<ReadStats> {
        self.progress.phase(RasterPhase::Binning, sources.len());
        let transform = frame.local_transform();
        let mut total = ReadStats::default();
        let mut binned = 0u64;

        for (index, source) in sources.iter().enumerate() {
            self.progress.source(index, source.name());
            let base = total.vertices;
            let stats = self
                .stream_source(source, base, |x, y, z| {
                    let (lx, ly) = to_local(&transform, &origin, x, y);
                    if let Some(idx) = layout.cell_index(lx, ly) {
                        let z = (z + origin.z) as f32;
                        let cell = &mut heights[idx];
                        if *cell == NO_DATA || z > *cell {
                            *cell = z;
                        }
                        binned += 1;
                    }
                })
                .await?;
            debug!(source = source.name(), vertices = stats.vertices, "Binned source");
            total.merge(&stats);
        }

        counter!("gridifier_vertices_binned_total").increment(binned);
        Ok(ReadStats {
            vertices: binned,
            ..total
        })
    }

    /// Open one source and stream its vertices, publishing progress.
    async fn stream_source<S, F>(
        &self,
        source: &S,
        base: u64,
        mut on_vertex: F,
    ) -> Result<ReadStats>
    where
        S: VertexSource,
        F: FnMut(f64, f64, f64),
    {
        let reader = source
            .open()
            .await
            .map_err(|e| RasterError::io(source.name(), e))?;

        let progress = &self.progress;
        let mut seen = base;
        let stats = VertexReader::new(reader, self.config.read_chunk_bytes)
            .for_each_vertex(|x, y, z| {
                on_vertex(x, y, z);
                seen += 1;
                progress.vertices(seen);
            })
            .await
            .map_err(|e| RasterError::io(source.name(), e))?;

        progress.flush_vertices(seen);
        Ok(stats)
    }
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new(GridifierConfig::default())
    }
}

#[inline]
fn to_local(transform: &LocalTransform, origin: &Point3D, x: f64, y: f64) -> (f64, f64) {
    transform.apply(x + origin.x, y + origin.y)
}

/// Rasterize with the default configuration.
pub async fn rasterize<S: VertexSource>(
    sources: &[S],
    origin: Point3D,
    grid_size: f64,
    boundary: Option<&[BoundaryPoint]>,
) -> Result<GridData> {
    Rasterizer::default()
        .rasterize(sources, origin, grid_size, boundary)
        .await
}
