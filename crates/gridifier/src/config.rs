//! Configuration for the rasterizer.

use serde::{Deserialize, Serialize};

/// Configuration for the rasterizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridifierConfig {
    /// Hard ceiling on `rows * cols`, checked before allocation.
    pub max_cells: usize,

    /// Number of hole-filling generations.
    pub hole_fill_passes: usize,

    /// Valid 8-connected neighbours required before a hole is filled.
    pub hole_fill_min_neighbors: usize,

    /// Bytes requested per read from a vertex source.
    pub read_chunk_bytes: usize,

    /// Vertices between progress snapshots.
    pub progress_interval: u64,
}

impl Default for GridifierConfig {
    fn default() -> Self {
        Self {
            max_cells: 10_000_000,
            hole_fill_passes: 2,
            hole_fill_min_neighbors: 3,
            read_chunk_bytes: 64 * 1024,
            progress_interval: 1_000_000,
        }
    }
}

impl GridifierConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("GRIDIFIER_MAX_CELLS") {
            if let Ok(n) = val.parse() {
                config.max_cells = n;
            }
        }

        if let Ok(val) = std::env::var("GRIDIFIER_HOLE_FILL_PASSES") {
            if let Ok(n) = val.parse() {
                config.hole_fill_passes = n;
            }
        }

        if let Ok(val) = std::env::var("GRIDIFIER_HOLE_FILL_MIN_NEIGHBORS") {
            if let Ok(n) = val.parse() {
                config.hole_fill_min_neighbors = n;
            }
        }

        if let Ok(val) = std::env::var("GRIDIFIER_READ_CHUNK_BYTES") {
            if let Ok(n) = val.parse() {
                config.read_chunk_bytes = n;
            }
        }

        if let Ok(val) = std::env::var("GRIDIFIER_PROGRESS_INTERVAL") {
            if let Ok(n) = val.parse() {
                config.progress_interval = n;
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_cells == 0 {
            return Err("max_cells must be > 0".to_string());
        }

        if self.hole_fill_min_neighbors == 0 || self.hole_fill_min_neighbors > 8 {
            return Err("hole_fill_min_neighbors must be 1-8".to_string());
        }

        if self.read_chunk_bytes == 0 {
            return Err("read_chunk_bytes must be > 0".to_string());
        }

        if self.progress_interval == 0 {
            return Err("progress_interval must be > 0".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GridifierConfig::default();
        assert_eq!(config.max_cells, 10_000_000);
        assert_eq!(config.hole_fill_passes, 2);
        assert_eq!(config.hole_fill_min_neighbors, 3);
        assert_eq!(config.read_chunk_bytes, 65536);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = GridifierConfig::default();
        config.max_cells = 0;
        assert!(config.validate().is_err());

        config = GridifierConfig::default();
        config.hole_fill_min_neighbors = 9;
        assert!(config.validate().is_err());

        config = GridifierConfig::default();
        config.hole_fill_min_neighbors = 0;
        assert!(config.validate().is_err());

        config = GridifierConfig::default();
        config.read_chunk_bytes = 0;
        assert!(config.validate().is_err());

        // Zero passes disables hole filling and is allowed
        config = GridifierConfig::default();
        config.hole_fill_passes = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: GridifierConfig =
            serde_json::from_str(r#"{"max_cells": 4000000}"#).unwrap();
        assert_eq!(config.max_cells, 4_000_000);
        assert_eq!(config.hole_fill_passes, 2);
    }
}
