//! Chunked, line-oriented vertex parsing.
//!
//! Sources are read in fixed-size chunks into a `BytesMut`. Complete lines
//! are split off and parsed; the partial trailing line stays buffered until
//! the next chunk completes it. A final unterminated line is parsed at EOF.

use std::io;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Classification of one input line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Record {
    /// `v x y z [...]` with three finite coordinates.
    Vertex(f64, f64, f64),
    /// Starts with `v` but lacks three parsable finite coordinates.
    Malformed,
    /// Anything else (faces, normals, comments, blanks).
    Other,
}

/// Parse a single line (without its terminator).
pub fn parse_record(line: &[u8]) -> Record {
    let line = line.trim_ascii();
    let is_vertex = matches!(line, [b'v', b' ' | b'\t', ..]);
    if !is_vertex {
        return Record::Other;
    }

    let Ok(text) = std::str::from_utf8(&line[1..]) else {
        return Record::Malformed;
    };

    let mut parts = text.split_ascii_whitespace();
    let mut coord = || parts.next().and_then(|t| t.parse::<f64>().ok());
    match (coord(), coord(), coord()) {
        (Some(x), Some(y), Some(z)) if x.is_finite() && y.is_finite() && z.is_finite() => {
            Record::Vertex(x, y, z)
        }
        _ => Record::Malformed,
    }
}

/// Per-source read counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadStats {
    pub bytes: u64,
    pub lines: u64,
    pub vertices: u64,
    pub skipped: u64,
}

impl ReadStats {
    pub fn merge(&mut self, other: &ReadStats) {
        self.bytes += other.bytes;
        self.lines += other.lines;
        self.vertices += other.vertices;
        self.skipped += other.skipped;
    }
}

/// Streams vertices from an async reader without holding the whole input.
pub struct VertexReader<R> {
    inner: R,
    buf: BytesMut,
    chunk_bytes: usize,
    stats: ReadStats,
}

impl<R: AsyncRead + Unpin> VertexReader<R> {
    pub fn new(inner: R, chunk_bytes: usize) -> Self {
        let chunk_bytes = chunk_bytes.max(1);
        Self {
            inner,
            buf: BytesMut::with_capacity(chunk_bytes),
            chunk_bytes,
            stats: ReadStats::default(),
        }
    }

    /// Call `on_vertex(x, y, z)` for every vertex record, in input order.
    ///
    /// Suspends only while waiting on the underlying reader.
    pub async fn for_each_vertex<F>(mut self, mut on_vertex: F) -> io::Result<ReadStats>
    where
        F: FnMut(f64, f64, f64),
    {
        loop {
            self.drain_lines(&mut on_vertex);

            self.buf.reserve(self.chunk_bytes);
            let n = self.inner.read_buf(&mut self.buf).await?;
            if n == 0 {
                break;
            }
            self.stats.bytes += n as u64;
        }

        if !self.buf.is_empty() {
            let tail = self.buf.split();
            self.handle_line(&tail, &mut on_vertex);
        }

        Ok(self.stats)
    }

    fn drain_lines<F: FnMut(f64, f64, f64)>(&mut self, on_vertex: &mut F) {
        while let Some(pos) = self.buf.iter().position(|b| *b == b'\n') {
            let line = self.buf.split_to(pos + 1);
            self.handle_line(&line[..pos], on_vertex);
        }
    }

    fn handle_line<F: FnMut(f64, f64, f64)>(&mut self, line: &[u8], on_vertex: &mut F) {
        self.stats.lines += 1;
        match parse_record(line) {
            Record::Vertex(x, y, z) => {
                self.stats.vertices += 1;
                on_vertex(x, y, z);
            }
            Record::Malformed => self.stats.skipped += 1,
            Record::Other => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vertex_line() {
        assert_eq!(
            parse_record(b"v 1.5 -2 3e2"),
            Record::Vertex(1.5, -2.0, 300.0)
        );
        assert_eq!(
            parse_record(b"v\t1 2 3 0.5 0.5 0.5"),
            Record::Vertex(1.0, 2.0, 3.0)
        );
        assert_eq!(parse_record(b"  v 1 2 3\r"), Record::Vertex(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_parse_non_vertex_lines() {
        assert_eq!(parse_record(b"vn 0 0 1"), Record::Other);
        assert_eq!(parse_record(b"vt 0.5 0.5"), Record::Other);
        assert_eq!(parse_record(b"f 1 2 3"), Record::Other);
        assert_eq!(parse_record(b"# comment"), Record::Other);
        assert_eq!(parse_record(b""), Record::Other);
        assert_eq!(parse_record(b"v"), Record::Other);
    }

    #[test]
    fn test_parse_malformed_vertex() {
        assert_eq!(parse_record(b"v 1 2"), Record::Malformed);
        assert_eq!(parse_record(b"v 1 two 3"), Record::Malformed);
        assert_eq!(parse_record(b"v 1 2 NaN"), Record::Malformed);
        assert_eq!(parse_record(b"v 1 2 inf"), Record::Malformed);
        assert_eq!(parse_record(b"v \xff\xfe 1 2"), Record::Malformed);
    }
}
