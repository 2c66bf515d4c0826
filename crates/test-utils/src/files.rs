//! Temporary on-disk site layouts.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::generators::obj_text;

/// Write `vertices` as an OBJ file under `dir`.
pub fn write_obj(dir: &Path, name: &str, vertices: &[[f64; 3]]) -> io::Result<PathBuf> {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, obj_text(vertices))?;
    Ok(path)
}

/// A temporary directory removed on drop.
pub struct TempSite {
    dir: TempDir,
}

impl TempSite {
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a text file relative to the site root.
    pub fn write(&self, name: &str, contents: &str) -> io::Result<PathBuf> {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn write_obj(&self, name: &str, vertices: &[[f64; 3]]) -> io::Result<PathBuf> {
        write_obj(self.dir.path(), name, vertices)
    }
}
