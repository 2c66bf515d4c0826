//! Re-openable vertex sources.
//!
//! The rasterizer streams every source twice (extent scan, then binning),
//! so a source hands out a fresh reader on each [`VertexSource::open`].

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::AsyncRead;

/// Boxed async byte stream returned by a source.
pub type SourceReader = Box<dyn AsyncRead + Send + Unpin>;

/// A named stream of `v x y z` records that can be read from the start again.
#[async_trait]
pub trait VertexSource: Send + Sync {
    /// Label used in logs, progress and errors.
    fn name(&self) -> &str;

    /// Open a new reader positioned at the first byte.
    async fn open(&self) -> io::Result<SourceReader>;
}

#[async_trait]
impl<T: VertexSource + ?Sized> VertexSource for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn open(&self) -> io::Result<SourceReader> {
        (**self).open().await
    }
}

/// Vertex file on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    name: String,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path.display().to_string();
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl VertexSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn open(&self) -> io::Result<SourceReader> {
        let file = tokio::fs::File::open(&self.path).await?;
        Ok(Box::new(file))
    }
}

/// In-memory vertex data, e.g. an upload already held in a buffer.
#[derive(Debug, Clone)]
pub struct BytesSource {
    name: String,
    data: Bytes,
}

impl BytesSource {
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }
}

#[async_trait]
impl VertexSource for BytesSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn open(&self) -> io::Result<SourceReader> {
        Ok(Box::new(io::Cursor::new(self.data.clone())))
    }
}
