use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::GeometryError;
use super::point::Point2d;
use super::region::Region;
use super::surface::{BoundaryKind, Surface};
use super::vector::Vec3;

/// Orientation of a hexagonal prism or lattice.
///
/// `PointyTop` puts a vertex at the top and face normals at polar angles
/// 0, 60, ..., 300 degrees; its lattice rows run along the x axis.
/// `FlatTop` is the same rotated by 30 degrees (a flat side up, rows along
/// the 30-degree direction).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HexOrientation {
    FlatTop,
    PointyTop,
}

impl HexOrientation {
    /// Polar angles (degrees) of the outward face normals.
    pub fn face_normal_angles(&self) -> [f64; 6] {
        let base = match self {
            HexOrientation::PointyTop => 0.0,
            HexOrientation::FlatTop => 30.0,
        };
        [
            base,
            base + 60.0,
            base + 120.0,
            base + 180.0,
            base + 240.0,
            base + 300.0,
        ]
    }
}

/// The interior of an infinite hexagonal prism about the vertical axis:
/// the intersection of six negative plane half-spaces.
///
/// `edge_length` is the hexagon side; the flat-to-flat width is
/// `edge_length * sqrt(3)`. Every face plane carries the given boundary tag.
pub fn hexagonal_prism(
    orientation: HexOrientation,
    edge_length: f64,
    center: Point2d,
    boundary: BoundaryKind,
) -> Result<Region, GeometryError> {
    if !edge_length.is_finite() || edge_length <= 0.0 {
        return Err(GeometryError::InvalidEdgeLength { edge_length });
    }
    let apothem = edge_length * 3.0f64.sqrt() / 2.0;

    let mut region: Option<Region> = None;
    for angle in orientation.face_normal_angles() {
        let (s, c) = angle.to_radians().sin_cos();
        let normal = Vec3::new(c, s, 0.0);
        let offset = apothem + normal.x * center.x + normal.y * center.y;
        let plane = Arc::new(Surface::plane(normal, offset)?.with_boundary(boundary));
        let half = Region::negative(&plane);
        region = Some(match region {
            Some(r) => r & half,
            None => half,
        });
    }
    Ok(region.expect("six faces"))
}

/// The infinite azimuthal wedge between two polar angles, apex on the z axis.
///
/// `start` and `end` are in degrees, counterclockwise; the span `end - start`
/// must lie strictly between 0 and 180 (wider sectors are built by unioning
/// wedges or by replication).
pub fn azimuthal_wedge(start_degrees: f64, end_degrees: f64) -> Result<Region, GeometryError> {
    let span = end_degrees - start_degrees;
    if !(span > 0.0 && span < 180.0) {
        return Err(GeometryError::InvalidWedgeSpan { span });
    }
    // Negative side of each plane keeps angles in [start, start + 180] and
    // [end - 180, end] respectively; the intersection is [start, end].
    let lower = Arc::new(Surface::vertical_plane(start_degrees - 90.0));
    let upper = Arc::new(Surface::vertical_plane(end_degrees + 90.0));
    Ok(Region::negative(&lower) & Region::negative(&upper))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::point::Point3d;

    fn at_angle(r: f64, degrees: f64) -> Point3d {
        let (s, c) = degrees.to_radians().sin_cos();
        Point3d::new(r * c, r * s, 0.0)
    }

    #[test]
    fn test_prism_rejects_bad_edge() {
        assert!(hexagonal_prism(
            HexOrientation::PointyTop,
            0.0,
            Point2d::ORIGIN,
            BoundaryKind::Transmission
        )
        .is_err());
    }

    #[test]
    fn test_prism_flat_to_flat() {
        // Edge length chosen so flat-to-flat is exactly 2.0.
        let edge = 2.0 / 3.0f64.sqrt();
        let hex = hexagonal_prism(
            HexOrientation::PointyTop,
            edge,
            Point2d::ORIGIN,
            BoundaryKind::Transmission,
        )
        .unwrap();

        // Flats are along the face normals (0 degrees for pointy-top).
        assert!(hex.contains(&at_angle(0.999, 0.0)));
        assert!(!hex.contains(&at_angle(1.001, 0.0)));
        // Corners reach out to the full edge length (30 degrees off a flat).
        assert!(hex.contains(&at_angle(edge * 0.999, 30.0)));
        assert!(!hex.contains(&at_angle(edge * 1.001, 30.0)));
    }

    #[test]
    fn test_prism_is_infinite_in_z() {
        let hex = hexagonal_prism(
            HexOrientation::FlatTop,
            1.0,
            Point2d::ORIGIN,
            BoundaryKind::Transmission,
        )
        .unwrap();
        assert!(hex.contains(&Point3d::new(0.0, 0.0, 1e6)));
        assert!(hex.contains(&Point3d::new(0.0, 0.0, -1e6)));
    }

    #[test]
    fn test_offset_prism() {
        let hex = hexagonal_prism(
            HexOrientation::PointyTop,
            1.0,
            Point2d::new(10.0, 0.0),
            BoundaryKind::Transmission,
        )
        .unwrap();
        assert!(hex.contains(&Point3d::new(10.0, 0.0, 0.0)));
        assert!(!hex.contains(&Point3d::new(0.0, 0.0, 0.0)));
    }

    #[test]
    fn test_wedge_membership() {
        let wedge = azimuthal_wedge(-15.0, 15.0).unwrap();
        assert!(wedge.contains(&at_angle(5.0, 0.0)));
        assert!(wedge.contains(&at_angle(5.0, 14.0)));
        assert!(!wedge.contains(&at_angle(5.0, 20.0)));
        assert!(!wedge.contains(&at_angle(5.0, 180.0)));
    }

    #[test]
    fn test_wedge_span_validation() {
        assert!(azimuthal_wedge(0.0, 0.0).is_err());
        assert!(azimuthal_wedge(0.0, 180.0).is_err());
        assert!(azimuthal_wedge(30.0, 10.0).is_err());
        assert!(azimuthal_wedge(170.0, 200.0).is_ok());
    }

    #[test]
    fn test_rotated_wedge() {
        let wedge = azimuthal_wedge(-60.0, 60.0).unwrap().rotate_z(90.0);
        assert!(wedge.contains(&at_angle(1.0, 90.0)));
        assert!(wedge.contains(&at_angle(1.0, 45.0)));
        assert!(!wedge.contains(&at_angle(1.0, 0.0)));
    }
}
