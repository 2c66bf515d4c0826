//! Persistence of computed grids between runs.
//!
//! Rasterizing an epoch is the expensive step, so hosts keep finished
//! grids in a [`GridStore`] keyed by [`grid_key`]. Two implementations:
//!
//! - [`FsGridStore`]: `<key>.json` metadata plus `<key>.bin` heights
//!   (little-endian `f32`), one pair per grid under a root directory
//! - [`MemoryGridStore`]: bounded LRU for a single process

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use earthwork_common::{Extent, GridData, GridFrame, Point3D};
use lru::LruCache;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::{Result, SiteIoError};

/// Keyed grid repository.
#[async_trait]
pub trait GridStore: Send + Sync {
    async fn save(&self, key: &str, grid: &GridData) -> Result<()>;

    /// `Ok(None)` when nothing is stored under `key`.
    async fn load(&self, key: &str) -> Result<Option<GridData>>;

    /// Returns whether an entry existed.
    async fn remove(&self, key: &str) -> Result<bool>;
}

/// Stable key for an epoch rasterized at `grid_size` in `frame`.
///
/// `origin` is the offset the vertex records were read against; it differs
/// from the frame anchor whenever the frame follows a boundary. `inputs`
/// comes from [`InputFingerprint`] and covers everything else that shapes
/// the grid (source files, rasterizer settings).
///
/// Only `[A-Za-z0-9._-]` survive from `epoch`; everything else becomes `_`.
pub fn grid_key(
    epoch: &str,
    grid_size: f64,
    frame: &GridFrame,
    origin: &Point3D,
    inputs: u32,
) -> String {
    let epoch: String = epoch
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!(
        "{}_gs{:.4}_r{:.9}_a{:.3}_{:.3}_o{:.3}_{:.3}_{:.3}_{:08x}",
        epoch,
        grid_size,
        frame.rotation,
        frame.anchor.x,
        frame.anchor.y,
        origin.x,
        origin.y,
        origin.z,
        inputs
    )
}

/// CRC32 over the inputs of a rasterization run, for [`grid_key`].
#[derive(Debug, Clone, Default)]
pub struct InputFingerprint {
    hasher: crc32fast::Hasher,
}

impl InputFingerprint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bytes(&mut self, bytes: &[u8]) -> &mut Self {
        // Length prefix keeps ("ab", "c") and ("a", "bc") apart
        self.hasher.update(&(bytes.len() as u64).to_le_bytes());
        self.hasher.update(bytes);
        self
    }

    pub fn str(&mut self, value: &str) -> &mut Self {
        self.bytes(value.as_bytes())
    }

    pub fn u64(&mut self, value: u64) -> &mut Self {
        self.bytes(&value.to_le_bytes())
    }

    pub fn finish(&self) -> u32 {
        self.hasher.clone().finalize()
    }
}

// ============================================================================
// Filesystem store
// ============================================================================

/// Metadata written beside the height blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GridHeader {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
    rows: usize,
    cols: usize,
    grid_size: f64,
    frame: GridFrame,
    /// Byte length of the `.bin` file.
    height_bytes: usize,
}

/// Grid store under a local directory.
#[derive(Debug, Clone)]
pub struct FsGridStore {
    root: PathBuf,
}

impl FsGridStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn paths(&self, key: &str) -> (PathBuf, PathBuf) {
        (
            self.root.join(format!("{}.json", key)),
            self.root.join(format!("{}.bin", key)),
        )
    }
}

#[async_trait]
impl GridStore for FsGridStore {
    async fn save(&self, key: &str, grid: &GridData) -> Result<()> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| SiteIoError::io(&self.root, e))?;

        let (json_path, bin_path) = self.paths(key);
        let bytes = encode_heights(&grid.heights);
        let header = GridHeader {
            min_x: grid.min_x,
            min_y: grid.min_y,
            max_x: grid.max_x,
            max_y: grid.max_y,
            rows: grid.rows,
            cols: grid.cols,
            grid_size: grid.grid_size,
            frame: grid.frame,
            height_bytes: bytes.len(),
        };

        // Blob first; the header marks the entry complete.
        write_atomic(&bin_path, &bytes).await?;
        write_atomic(&json_path, &serde_json::to_vec_pretty(&header)?).await?;

        info!(key, rows = grid.rows, cols = grid.cols, bytes = bytes.len(), "Saved grid");
        Ok(())
    }

    async fn load(&self, key: &str) -> Result<Option<GridData>> {
        let (json_path, bin_path) = self.paths(key);

        let header_bytes = match tokio::fs::read(&json_path).await {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(key, "Grid not in store");
                return Ok(None);
            }
            Err(e) => return Err(SiteIoError::io(&json_path, e)),
        };
        let header: GridHeader = serde_json::from_slice(&header_bytes)?;

        let bytes = tokio::fs::read(&bin_path)
            .await
            .map_err(|e| SiteIoError::io(&bin_path, e))?;
        if bytes.len() != header.height_bytes {
            return Err(SiteIoError::corrupt(
                key,
                format!("expected {} height bytes, found {}", header.height_bytes, bytes.len()),
            ));
        }
        let heights = decode_heights(&bytes).ok_or_else(|| {
            SiteIoError::corrupt(key, format!("{} bytes is not a whole number of f32", bytes.len()))
        })?;

        let extent = Extent::new(header.min_x, header.min_y, header.max_x, header.max_y);
        let grid = GridData::from_parts(
            extent,
            header.grid_size,
            header.rows,
            header.cols,
            heights,
            header.frame,
        )
        .map_err(|e| SiteIoError::corrupt(key, e.to_string()))?;

        debug!(key, rows = grid.rows, cols = grid.cols, "Loaded grid");
        Ok(Some(grid))
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        let (json_path, bin_path) = self.paths(key);
        let mut existed = false;
        for path in [json_path, bin_path] {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => existed = true,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(SiteIoError::io(&path, e)),
            }
        }
        Ok(existed)
    }
}

async fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    let tmp = path.with_file_name(name);
    tokio::fs::write(&tmp, data)
        .await
        .map_err(|e| SiteIoError::io(&tmp, e))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| SiteIoError::io(path, e))
}

fn encode_heights(heights: &[f32]) -> Vec<u8> {
    let le: Vec<u32> = heights.iter().map(|h| h.to_bits().to_le()).collect();
    bytemuck::cast_slice(&le).to_vec()
}

fn decode_heights(bytes: &[u8]) -> Option<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return None;
    }
    let words: Vec<u32> = bytemuck::pod_collect_to_vec(bytes);
    Some(words.into_iter().map(|w| f32::from_bits(u32::from_le(w))).collect())
}

// ============================================================================
// In-memory store
// ============================================================================

/// Hit/miss counters for [`MemoryGridStore`].
#[derive(Debug, Default, Clone)]
pub struct StoreStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

impl StoreStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

/// Process-local LRU of grids.
pub struct MemoryGridStore {
    cache: RwLock<LruCache<String, Arc<GridData>>>,
    stats: RwLock<StoreStats>,
    capacity: usize,
}

impl MemoryGridStore {
    pub fn new(capacity: usize) -> Self {
        let size = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: RwLock::new(LruCache::new(size)),
            stats: RwLock::new(StoreStats::default()),
            capacity: size.get(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Shared handle without copying the heights.
    pub async fn get_shared(&self, key: &str) -> Option<Arc<GridData>> {
        let mut cache = self.cache.write().await;
        let found = cache.get(key).cloned();
        let mut stats = self.stats.write().await;
        if found.is_some() {
            stats.hits += 1;
        } else {
            stats.misses += 1;
        }
        found
    }

    pub async fn stats(&self) -> StoreStats {
        let cache = self.cache.read().await;
        let mut stats = self.stats.write().await;
        stats.entries = cache.len();
        stats.clone()
    }

    pub async fn len(&self) -> usize {
        self.cache.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.cache.read().await.is_empty()
    }
}

#[async_trait]
impl GridStore for MemoryGridStore {
    async fn save(&self, key: &str, grid: &GridData) -> Result<()> {
        let mut cache = self.cache.write().await;
        cache.put(key.to_string(), Arc::new(grid.clone()));
        self.stats.write().await.entries = cache.len();
        Ok(())
    }

    async fn load(&self, key: &str) -> Result<Option<GridData>> {
        Ok(self.get_shared(key).await.map(|g| (*g).clone()))
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        let mut cache = self.cache.write().await;
        let existed = cache.pop(key).is_some();
        self.stats.write().await.entries = cache.len();
        Ok(existed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use earthwork_common::{Point3D, NO_DATA};

    #[test]
    fn test_heights_codec() {
        let heights = vec![1.5f32, NO_DATA, -0.25, f32::MAX];
        let bytes = encode_heights(&heights);
        assert_eq!(bytes.len(), 16);
        assert_eq!(&bytes[..4], &1.5f32.to_le_bytes());
        assert_eq!(decode_heights(&bytes).unwrap(), heights);
        assert!(decode_heights(&bytes[..5]).is_none());
    }

    #[test]
    fn test_grid_key_is_filename_safe() {
        let origin = Point3D::new(500000.0, 3400000.0, 12.0);
        let frame = GridFrame::unrotated(origin);
        let key = grid_key("site A/epoch 1", 0.5, &frame, &origin, 0xab);
        assert_eq!(
            key,
            "site_A_epoch_1_gs0.5000_r0.000000000_a500000.000_3400000.000\
             _o500000.000_3400000.000_12.000_000000ab"
        );
    }

    #[test]
    fn test_grid_key_distinguishes_frames() {
        let a = GridFrame::default();
        let b = GridFrame {
            rotation: 0.25,
            ..GridFrame::default()
        };
        let o = Point3D::ZERO;
        assert_ne!(grid_key("e1", 1.0, &a, &o, 0), grid_key("e1", 1.0, &b, &o, 0));
        assert_ne!(grid_key("e1", 1.0, &a, &o, 0), grid_key("e1", 0.5, &a, &o, 0));
    }

    #[test]
    fn test_grid_key_distinguishes_origin_and_inputs() {
        // Boundary-aligned frame: the anchor hides the metadata origin
        let frame = GridFrame {
            anchor: Point3D::new(10.0, 20.0, 0.0),
            rotation: 0.5,
        };
        let low = Point3D::new(0.0, 0.0, 0.0);
        let high = Point3D::new(0.0, 0.0, 50.0);
        let shifted = Point3D::new(1.0, 0.0, 0.0);

        let base = grid_key("e1", 1.0, &frame, &low, 7);
        assert_ne!(base, grid_key("e1", 1.0, &frame, &high, 7));
        assert_ne!(base, grid_key("e1", 1.0, &frame, &shifted, 7));
        assert_ne!(base, grid_key("e1", 1.0, &frame, &low, 8));
    }

    #[test]
    fn test_input_fingerprint() {
        let mut a = InputFingerprint::new();
        a.str("tile.obj").u64(42);
        let mut b = InputFingerprint::new();
        b.str("tile.obj").u64(42);
        assert_eq!(a.finish(), b.finish());

        b.u64(1);
        assert_ne!(a.finish(), b.finish());

        let mut split1 = InputFingerprint::new();
        split1.str("ab").str("c");
        let mut split2 = InputFingerprint::new();
        split2.str("a").str("bc");
        assert_ne!(split1.finish(), split2.finish());
    }
}
