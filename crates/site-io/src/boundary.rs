//! Site boundary from a survey CSV.
//!
//! Rows are `id,northing,easting[,...]` in survey order. Northing/easting
//! are swapped into `x = easting, y = northing`. Header lines, blank lines
//! and rows without two numeric coordinates are skipped.

use std::path::Path;

use earthwork_common::BoundaryPoint;
use tracing::{debug, warn};

use crate::error::{Result, SiteIoError};

/// Parsed boundary and the number of rows that were skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundaryFile {
    pub points: Vec<BoundaryPoint>,
    pub skipped: usize,
}

/// Parse boundary CSV text.
pub fn parse_boundary(text: &str) -> BoundaryFile {
    let mut out = BoundaryFile::default();

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim().trim_start_matches('\u{feff}');
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match parse_row(line, out.points.len()) {
            Some(point) => out.points.push(point),
            None => {
                debug!(line = line_no + 1, "Skipping boundary row");
                out.skipped += 1;
            }
        }
    }

    if out.skipped > 0 {
        warn!(
            skipped = out.skipped,
            points = out.points.len(),
            "Skipped malformed boundary rows"
        );
    }
    out
}

/// Read and parse a boundary file.
pub async fn read_boundary(path: impl AsRef<Path>) -> Result<Vec<BoundaryPoint>> {
    let path = path.as_ref();
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| SiteIoError::io(path, e))?;
    Ok(parse_boundary(&text).points)
}

/// `id,northing,easting` or bare `northing,easting`.
fn parse_row(line: &str, index: usize) -> Option<BoundaryPoint> {
    let fields: Vec<&str> = if line.contains(',') {
        line.split(',').map(str::trim).collect()
    } else {
        line.split_whitespace().collect()
    };

    let num = |s: &str| s.parse::<f64>().ok().filter(|v| v.is_finite());

    match fields.as_slice() {
        [id, n, e, ..] if !id.is_empty() => match (num(n), num(e)) {
            (Some(n), Some(e)) => Some(BoundaryPoint::from_survey(*id, n, e)),
            _ => None,
        },
        [n, e] => match (num(n), num(e)) {
            (Some(n), Some(e)) => Some(BoundaryPoint::from_survey(format!("P{}", index + 1), n, e)),
            _ => None,
        },
        _ => None,
    }
}
