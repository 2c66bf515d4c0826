//! Epoch rasterization with caching, and the volume step.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::UNIX_EPOCH;

use anyhow::{bail, Context, Result};
use earthwork_common::{BoundaryPoint, GridData, GridFrame, Point3D, VolumeResult};
use gridifier::{FileSource, GridifierConfig, RasterPhase, RasterProgress, Rasterizer};
use site_io::{grid_key, GridStore, InputFingerprint};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use volume_engine::{VolumeCalculator, VolumeConfig};
use walkdir::WalkDir;

/// Expand files and directories into a sorted list of `.obj` sources.
pub fn discover_sources(inputs: &[PathBuf]) -> Result<Vec<FileSource>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_file() {
            files.push(input.clone());
            continue;
        }
        if !input.is_dir() {
            bail!("input not found: {}", input.display());
        }
        for entry in WalkDir::new(input).follow_links(true) {
            let entry = entry.with_context(|| format!("Failed to walk {}", input.display()))?;
            if entry.file_type().is_file() && is_obj(entry.path()) {
                files.push(entry.into_path());
            }
        }
    }

    files.sort();
    files.dedup();
    if files.is_empty() {
        bail!("no .obj files found in {:?}", inputs);
    }
    debug!(count = files.len(), "Discovered vertex files");
    Ok(files.into_iter().map(FileSource::new).collect())
}

fn is_obj(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("obj"))
        .unwrap_or(false)
}

/// One epoch to rasterize.
pub struct EpochJob<'a> {
    pub name: &'a str,
    pub inputs: &'a [PathBuf],
    pub origin: Point3D,
    pub grid_size: f64,
    pub boundary: Option<&'a [BoundaryPoint]>,
}

/// A rasterized epoch and the store key it lives under.
#[derive(Debug, Clone)]
pub struct EpochGrid {
    pub key: String,
    pub grid: GridData,
}

/// Fingerprint of the vertex files and the settings that shape the grid.
///
/// File size and modification time stand in for content, so an edited tile
/// invalidates the stored grid without rereading it.
fn fingerprint_inputs(sources: &[FileSource], config: &GridifierConfig) -> Result<u32> {
    let mut fp = InputFingerprint::new();
    fp.u64(config.hole_fill_passes as u64)
        .u64(config.hole_fill_min_neighbors as u64);
    for source in sources {
        let path = source.path();
        let meta = std::fs::metadata(path)
            .with_context(|| format!("Failed to stat {}", path.display()))?;
        let modified = meta
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .unwrap_or_default();
        fp.str(&path.to_string_lossy())
            .u64(meta.len())
            .u64(modified.as_secs())
            .u64(modified.subsec_nanos() as u64);
    }
    Ok(fp.finish())
}

/// Rasterize an epoch, reusing a stored grid for the same key unless `refresh`.
pub async fn rasterize_epoch(
    job: &EpochJob<'_>,
    config: &GridifierConfig,
    store: &dyn GridStore,
    refresh: bool,
) -> Result<EpochGrid> {
    let sources = discover_sources(job.inputs)?;
    let frame = match job.boundary {
        Some(b) if b.len() >= 2 => GridFrame::aligned_to_boundary(b, job.origin),
        _ => GridFrame::unrotated(job.origin),
    };
    let inputs = fingerprint_inputs(&sources, config)?;
    let key = grid_key(job.name, job.grid_size, &frame, &job.origin, inputs);

    if !refresh {
        if let Some(grid) = store.load(&key).await? {
            info!(epoch = job.name, key = %key, "Using cached grid");
            return Ok(EpochGrid { key, grid });
        }
    }

    info!(epoch = job.name, files = sources.len(), "Rasterizing epoch");
    let rasterizer = Rasterizer::new(config.clone());
    let logger = spawn_progress_logger(rasterizer.subscribe(), job.name.to_string());
    let result = rasterizer
        .rasterize(&sources, job.origin, job.grid_size, job.boundary)
        .await;
    drop(rasterizer);
    if let Err(e) = logger.await {
        warn!(error = %e, "Progress logger stopped abnormally");
    }

    let grid = result.with_context(|| format!("Failed to rasterize epoch '{}'", job.name))?;
    store
        .save(&key, &grid)
        .await
        .with_context(|| format!("Failed to store grid '{}'", key))?;
    Ok(EpochGrid { key, grid })
}

/// Log progress snapshots until the run finishes or the rasterizer is dropped.
fn spawn_progress_logger(mut rx: watch::Receiver<RasterProgress>, epoch: String) -> JoinHandle<()> {
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let p = rx.borrow_and_update().clone();
            info!(
                epoch = %epoch,
                phase = %p.phase,
                source = p.source_index + 1,
                sources = p.source_count,
                file = %p.source_name,
                vertices = p.vertices,
                "Rasterization progress"
            );
            if p.phase == RasterPhase::Done {
                break;
            }
        }
    })
}

/// Bring `after` into the frame of `before` when only the anchor differs.
pub fn align_frames(before: &GridData, after: GridData) -> Result<GridData> {
    if before.frame.is_compatible(&after.frame) {
        return Ok(after);
    }
    info!(
        from_x = after.frame.anchor.x,
        from_y = after.frame.anchor.y,
        to_x = before.frame.anchor.x,
        to_y = before.frame.anchor.y,
        "Reanchoring later epoch"
    );
    after
        .reanchored(&before.frame)
        .context("Epoch grids use different rotations; rasterize both with the same boundary")
}

/// Run the volume engine on a blocking thread.
pub async fn compute_volumes(
    before: Arc<GridData>,
    after: Arc<GridData>,
    boundary: Option<Arc<Vec<BoundaryPoint>>>,
    config: VolumeConfig,
) -> Result<VolumeResult> {
    let result = tokio::task::spawn_blocking(move || {
        let boundary = boundary.as_deref().map(|b| b.as_slice());
        VolumeCalculator::new(config).compute(&before, &after, boundary)
    })
    .await
    .context("Volume task panicked")?;
    Ok(result?)
}
