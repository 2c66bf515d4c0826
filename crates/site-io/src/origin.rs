//! Survey origin from photogrammetry `metadata.xml`.
//!
//! Only the `<SRSOrigin>x,y,z</SRSOrigin>` element is read. Model vertices
//! are offsets from this point.

use std::path::Path;

use earthwork_common::Point3D;
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{debug, warn};

use crate::error::{Result, SiteIoError};

const ORIGIN_TAG: &[u8] = b"SRSOrigin";

/// Parse the origin out of a metadata document.
///
/// A document without `SRSOrigin` yields [`Point3D::ZERO`]. Malformed XML or
/// an unparsable origin value is an error.
pub fn parse_origin(xml: &str) -> Result<Point3D> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut in_origin = false;
    let mut content = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.local_name().as_ref() == ORIGIN_TAG => {
                in_origin = true;
                content.clear();
            }
            Ok(Event::Text(t)) if in_origin => {
                content.push_str(&t.unescape()?);
            }
            Ok(Event::End(e)) if in_origin && e.local_name().as_ref() == ORIGIN_TAG => {
                let origin = parse_triplet(&content)?;
                debug!(x = origin.x, y = origin.y, z = origin.z, "Parsed SRS origin");
                return Ok(origin);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(SiteIoError::Xml(format!(
                    "error at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    warn!("No SRSOrigin element in metadata; using zero origin");
    Ok(Point3D::ZERO)
}

/// Read and parse a metadata file.
pub async fn read_origin(path: impl AsRef<Path>) -> Result<Point3D> {
    let path = path.as_ref();
    let xml = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| SiteIoError::io(path, e))?;
    parse_origin(&xml)
}

/// `x,y[,z]`, separated by commas and/or whitespace.
fn parse_triplet(text: &str) -> Result<Point3D> {
    let parts: Vec<&str> = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect();

    let values: Vec<f64> = parts
        .iter()
        .map(|p| p.parse::<f64>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|_| SiteIoError::InvalidOrigin(text.trim().to_string()))?;

    let origin = match values.as_slice() {
        [x, y] => Point3D::new(*x, *y, 0.0),
        [x, y, z] => Point3D::new(*x, *y, *z),
        _ => return Err(SiteIoError::InvalidOrigin(text.trim().to_string())),
    };

    if !origin.is_finite() {
        return Err(SiteIoError::InvalidOrigin(text.trim().to_string()));
    }
    Ok(origin)
}
