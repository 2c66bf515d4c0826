//! Common survey fixtures.

use earthwork_common::{BoundaryPoint, Point3D};

/// A projected-coordinate origin typical of a UTM/CGCS2000 site.
pub const SITE_ORIGIN: Point3D = Point3D {
    x: 500_000.0,
    y: 3_400_000.0,
    z: 120.0,
};

/// Photogrammetry `metadata.xml` with an SRS origin.
pub const METADATA_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<ModelMetadata version="1">
    <!--Spatial Reference System-->
    <SRS>EPSG:4547</SRS>
    <!--Origin in Spatial Reference System-->
    <SRSOrigin>500000,3400000,120</SRSOrigin>
    <Texture>
        <ColorSource>Visible</ColorSource>
    </Texture>
</ModelMetadata>
"#;

/// Metadata without any origin element.
pub const METADATA_XML_NO_ORIGIN: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<ModelMetadata version="1">
    <SRS>ENU:31.2,121.4</SRS>
</ModelMetadata>
"#;

/// Boundary CSV in survey order (id, northing, easting) with a header row.
pub const BOUNDARY_CSV: &str = "\
id,northing,easting
J1,3400010.0,500010.0
J2,3400010.0,500050.0
J3,3400040.0,500050.0
J4,3400040.0,500010.0
";

/// Axis-aligned square boundary, counter-clockwise, in global coordinates.
pub fn square_boundary(x0: f64, y0: f64, size: f64) -> Vec<BoundaryPoint> {
    vec![
        BoundaryPoint::new("J1", x0, y0),
        BoundaryPoint::new("J2", x0 + size, y0),
        BoundaryPoint::new("J3", x0 + size, y0 + size),
        BoundaryPoint::new("J4", x0, y0 + size),
    ]
}

/// Square boundary rotated by `angle` about its first vertex (CCW).
pub fn rotated_square_boundary(x0: f64, y0: f64, size: f64, angle: f64) -> Vec<BoundaryPoint> {
    let (s, c) = angle.sin_cos();
    [(0.0, 0.0), (size, 0.0), (size, size), (0.0, size)]
        .iter()
        .enumerate()
        .map(|(i, &(dx, dy))| {
            BoundaryPoint::new(
                format!("J{}", i + 1),
                x0 + dx * c - dy * s,
                y0 + dx * s + dy * c,
            )
        })
        .collect()
}
