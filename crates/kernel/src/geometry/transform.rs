use serde::{Deserialize, Serialize};

use super::point::{Point2d, Point3d};
use super::region::Region;
use super::surface::{Surface, SurfaceKind};
use super::vector::{Vec2, Vec3};
use std::sync::Arc;

impl Surface {
    /// Rigid translation in the XY plane. Boundary tags are preserved.
    pub fn translated(&self, v: Vec2) -> Surface {
        let kind = match self.kind {
            SurfaceKind::ZCylinder { center, radius } => SurfaceKind::ZCylinder {
                center: center + v,
                radius,
            },
            SurfaceKind::Plane { normal, offset } => SurfaceKind::Plane {
                normal,
                // Moving the plane by v shifts every point on it by v.
                offset: offset + normal.dot(&Vec3::new(v.x, v.y, 0.0)),
            },
        };
        Surface {
            kind,
            boundary: self.boundary,
        }
    }

    /// Rigid rotation about the z axis through the origin, counterclockwise.
    pub fn rotated_z(&self, degrees: f64) -> Surface {
        let angle = degrees.to_radians();
        let kind = match self.kind {
            SurfaceKind::ZCylinder { center, radius } => {
                let c = Vec2::new(center.x, center.y).rotated_z(angle);
                SurfaceKind::ZCylinder {
                    center: Point2d::new(c.x, c.y),
                    radius,
                }
            }
            // Rotating a plane rotates its normal; the offset (distance from
            // the axis) is unchanged.
            SurfaceKind::Plane { normal, offset } => SurfaceKind::Plane {
                normal: normal.rotated_z(angle),
                offset,
            },
        };
        Surface {
            kind,
            boundary: self.boundary,
        }
    }
}

impl Region {
    /// Translate the region by a vector in the XY plane.
    ///
    /// The transform is pushed to the leaf surfaces, so it distributes
    /// exactly over intersection, union, and complement.
    pub fn translate(&self, v: Vec2) -> Region {
        self.map_surfaces(&|s| s.translated(v))
    }

    /// Rotate the region about the vertical axis through the origin.
    pub fn rotate_z(&self, degrees: f64) -> Region {
        self.map_surfaces(&|s| s.rotated_z(degrees))
    }

    fn map_surfaces(&self, f: &impl Fn(&Surface) -> Surface) -> Region {
        match self {
            Region::Half { surface, sense } => Region::Half {
                surface: Arc::new(f(surface)),
                sense: *sense,
            },
            Region::Intersection(a, b) => Region::Intersection(
                Box::new(a.map_surfaces(f)),
                Box::new(b.map_surfaces(f)),
            ),
            Region::Union(a, b) => {
                Region::Union(Box::new(a.map_surfaces(f)), Box::new(b.map_surfaces(f)))
            }
            Region::Complement(r) => Region::Complement(Box::new(r.map_surfaces(f))),
        }
    }

    /// Conservative axis-aligned bounding box.
    ///
    /// Exact for negative cylinders, axis-aligned negative planes, and their
    /// intersections and unions; unbounded along any axis the region does not
    /// provably bound.
    pub fn bounding_box(&self) -> BoundingBox {
        match self {
            Region::Half { surface, sense } => match (*sense, surface.kind) {
                (super::region::Sense::Negative, SurfaceKind::ZCylinder { center, radius }) => {
                    BoundingBox::new(
                        Point3d::new(center.x - radius, center.y - radius, f64::NEG_INFINITY),
                        Point3d::new(center.x + radius, center.y + radius, f64::INFINITY),
                    )
                }
                (super::region::Sense::Negative, SurfaceKind::Plane { normal, offset }) => {
                    plane_half_space_box(normal, offset)
                }
                // The positive side of a plane is the negative side of the
                // flipped plane. Positive cylinders are unbounded.
                (super::region::Sense::Positive, SurfaceKind::Plane { normal, offset }) => {
                    plane_half_space_box(-normal, -offset)
                }
                (super::region::Sense::Positive, SurfaceKind::ZCylinder { .. }) => {
                    BoundingBox::unbounded()
                }
            },
            Region::Intersection(a, b) => a.bounding_box().intersection(&b.bounding_box()),
            Region::Union(a, b) => a.bounding_box().union(&b.bounding_box()),
            Region::Complement(_) => BoundingBox::unbounded(),
        }
    }
}

/// Box of the closed negative half-space of a plane, tight only when the
/// normal is axis-aligned.
fn plane_half_space_box(normal: Vec3, offset: f64) -> BoundingBox {
    let mut bb = BoundingBox::unbounded();
    const TOL: f64 = 1e-12;
    if (normal.x.abs() - 1.0).abs() < TOL && normal.y.abs() < TOL && normal.z.abs() < TOL {
        if normal.x > 0.0 {
            bb.max.x = offset;
        } else {
            bb.min.x = -offset;
        }
    } else if (normal.y.abs() - 1.0).abs() < TOL && normal.x.abs() < TOL && normal.z.abs() < TOL {
        if normal.y > 0.0 {
            bb.max.y = offset;
        } else {
            bb.min.y = -offset;
        }
    } else if (normal.z.abs() - 1.0).abs() < TOL && normal.x.abs() < TOL && normal.y.abs() < TOL {
        if normal.z > 0.0 {
            bb.max.z = offset;
        } else {
            bb.min.z = -offset;
        }
    }
    bb
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point3d,
    pub max: Point3d,
}

impl BoundingBox {
    pub fn new(min: Point3d, max: Point3d) -> Self {
        Self { min, max }
    }

    pub fn empty() -> Self {
        Self {
            min: Point3d::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3d::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn unbounded() -> Self {
        Self {
            min: Point3d::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
            max: Point3d::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
        }
    }

    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: Point3d::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            max: Point3d::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        }
    }

    pub fn intersection(&self, other: &Self) -> Self {
        Self {
            min: Point3d::new(
                self.min.x.max(other.min.x),
                self.min.y.max(other.min.y),
                self.min.z.max(other.min.z),
            ),
            max: Point3d::new(
                self.max.x.min(other.max.x),
                self.max.y.min(other.max.y),
                self.max.z.min(other.max.z),
            ),
        }
    }

    pub fn contains_point(&self, p: &Point3d) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    pub fn is_finite(&self) -> bool {
        self.min.x.is_finite()
            && self.min.y.is_finite()
            && self.min.z.is_finite()
            && self.max.x.is_finite()
            && self.max.y.is_finite()
            && self.max.z.is_finite()
    }

    pub fn center(&self) -> Point3d {
        Point3d::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
            (self.min.z + self.max.z) * 0.5,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::geometry::region::Region;

    fn cyl(cx: f64, cy: f64, r: f64) -> Arc<Surface> {
        Arc::new(Surface::z_cylinder(Point2d::new(cx, cy), r).unwrap())
    }

    #[test]
    fn test_translate_cylinder_region() {
        let r = Region::negative(&cyl(0.0, 0.0, 1.0));
        let moved = r.translate(Vec2::new(3.0, 0.0));
        assert!(moved.contains(&Point3d::new(3.0, 0.0, 0.0)));
        assert!(!moved.contains(&Point3d::new(0.0, 0.0, 0.0)));
    }

    #[test]
    fn test_rotate_cylinder_region() {
        let r = Region::negative(&cyl(2.0, 0.0, 0.5));
        let rotated = r.rotate_z(90.0);
        assert!(rotated.contains(&Point3d::new(0.0, 2.0, 0.0)));
        assert!(!rotated.contains(&Point3d::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn test_rotation_preserves_plane_offset() {
        let p = Surface::vertical_plane(0.0);
        let q = p.rotated_z(45.0);
        match q.kind {
            SurfaceKind::Plane { normal, offset } => {
                assert!((offset).abs() < 1e-12);
                assert!((normal.length() - 1.0).abs() < 1e-12);
            }
            _ => panic!("expected a plane"),
        }
    }

    #[test]
    fn test_transform_distributes_over_intersection() {
        let a = Region::negative(&cyl(0.0, 0.0, 1.0));
        let b = Region::negative(&cyl(0.5, 0.0, 1.0));
        let v = Vec2::new(1.5, -2.0);

        let whole = (a.clone() & b.clone()).translate(v);
        let leaves = a.translate(v) & b.translate(v);
        for x in [-1.0, 0.0, 0.5, 1.0, 2.0, 3.0] {
            let p = Point3d::new(x, -2.0, 0.3);
            assert_eq!(whole.contains(&p), leaves.contains(&p));
        }
    }

    #[test]
    fn test_translate_roundtrip() {
        let r = Region::negative(&cyl(1.0, 1.0, 1.0));
        let v = Vec2::new(0.7, -0.3);
        let back = r.translate(v).translate(-v);
        for p in [
            Point3d::new(1.0, 1.0, 0.0),
            Point3d::new(2.5, 1.0, 0.0),
            Point3d::new(1.5, 0.5, -4.0),
        ] {
            assert_eq!(r.contains(&p), back.contains(&p));
        }
    }

    #[test]
    fn test_bounding_box_of_slab_and_cylinder() {
        let outer = cyl(0.0, 0.0, 5.0);
        let top = Arc::new(Surface::z_plane(2.0));
        let bottom = Arc::new(Surface::z_plane(-2.0));
        let r = Region::negative(&outer) & Region::negative(&top) & Region::positive(&bottom);

        let bb = r.bounding_box();
        assert_relative_eq!(bb.min.x, -5.0, epsilon = 1e-12);
        assert_relative_eq!(bb.max.x, 5.0, epsilon = 1e-12);
        assert_relative_eq!(bb.max.z, 2.0, epsilon = 1e-12);
        assert_relative_eq!(bb.min.z, -2.0, epsilon = 1e-12);
    }
}
