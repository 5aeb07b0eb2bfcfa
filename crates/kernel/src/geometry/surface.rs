use serde::{Deserialize, Serialize};

use super::GeometryError;
use super::point::{Point2d, Point3d};
use super::vector::Vec3;

/// How a particle crossing the surface is treated by the transport solver.
///
/// Only surfaces forming the outermost shell of a model carry a non-default
/// tag; interior surfaces are always `Transmission`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BoundaryKind {
    #[default]
    Transmission,
    /// Particles crossing outward escape the problem.
    Vacuum,
    /// Particles are specularly reflected back.
    Reflective,
}

/// The geometric kind of an infinite boundary primitive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SurfaceKind {
    /// Right-circular cylinder about a vertical axis through `center`.
    ZCylinder { center: Point2d, radius: f64 },
    /// Infinite plane `normal . p = offset`, with `normal` of unit length.
    Plane { normal: Vec3, offset: f64 },
}

/// An infinite boundary primitive with a signed half-space convention.
///
/// The signed evaluation is negative inside a cylinder and on the side of a
/// plane opposite its normal. Points exactly on the surface evaluate to zero
/// and belong to the negative (closed) half-space, so shared boundaries never
/// classify ambiguously.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub kind: SurfaceKind,
    pub boundary: BoundaryKind,
}

impl Surface {
    /// Cylinder of the given radius about the vertical axis through `center`.
    pub fn z_cylinder(center: Point2d, radius: f64) -> Result<Self, GeometryError> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(GeometryError::InvalidRadius { radius });
        }
        Ok(Self {
            kind: SurfaceKind::ZCylinder { center, radius },
            boundary: BoundaryKind::default(),
        })
    }

    /// Plane through three points. The normal follows the right-hand rule
    /// around `a -> b -> c`.
    pub fn plane_from_points(a: Point3d, b: Point3d, c: Point3d) -> Result<Self, GeometryError> {
        let normal = (b - a).cross(&(c - a));
        let normal = normal.normalized().ok_or(GeometryError::DegeneratePlane)?;
        Ok(Self {
            kind: SurfaceKind::Plane {
                normal,
                offset: normal.dot(&(a - Point3d::ORIGIN)),
            },
            boundary: BoundaryKind::default(),
        })
    }

    /// Plane from an explicit normal and offset (`normal . p = offset`).
    pub fn plane(normal: Vec3, offset: f64) -> Result<Self, GeometryError> {
        let normal = normal.normalized().ok_or(GeometryError::DegeneratePlane)?;
        Ok(Self {
            kind: SurfaceKind::Plane { normal, offset },
            boundary: BoundaryKind::default(),
        })
    }

    /// Horizontal plane at the given elevation, normal pointing up.
    pub fn z_plane(z: f64) -> Self {
        Self {
            kind: SurfaceKind::Plane {
                normal: Vec3::Z,
                offset: z,
            },
            boundary: BoundaryKind::default(),
        }
    }

    /// Vertical plane through the z axis whose normal points at the given
    /// polar angle in the XY plane.
    pub fn vertical_plane(normal_angle_degrees: f64) -> Self {
        let (s, c) = normal_angle_degrees.to_radians().sin_cos();
        Self {
            kind: SurfaceKind::Plane {
                normal: Vec3::new(c, s, 0.0),
                offset: 0.0,
            },
            boundary: BoundaryKind::default(),
        }
    }

    /// Tag this surface as an outer boundary.
    pub fn with_boundary(mut self, boundary: BoundaryKind) -> Self {
        self.boundary = boundary;
        self
    }

    /// Signed evaluation: negative inside, zero on the surface, positive
    /// outside. Total for every surface kind.
    pub fn evaluate(&self, p: &Point3d) -> f64 {
        match self.kind {
            SurfaceKind::ZCylinder { center, radius } => {
                let dx = p.x - center.x;
                let dy = p.y - center.y;
                (dx * dx + dy * dy).sqrt() - radius
            }
            SurfaceKind::Plane { normal, offset } => {
                normal.x * p.x + normal.y * p.y + normal.z * p.z - offset
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cylinder_rejects_bad_radius() {
        assert!(Surface::z_cylinder(Point2d::ORIGIN, 0.0).is_err());
        assert!(Surface::z_cylinder(Point2d::ORIGIN, -1.0).is_err());
        assert!(Surface::z_cylinder(Point2d::ORIGIN, f64::NAN).is_err());
        assert!(Surface::z_cylinder(Point2d::ORIGIN, 1.0).is_ok());
    }

    #[test]
    fn test_cylinder_signed_evaluation() {
        let cyl = Surface::z_cylinder(Point2d::ORIGIN, 2.0).unwrap();
        assert!(cyl.evaluate(&Point3d::new(1.0, 0.0, 5.0)) < 0.0);
        assert!(cyl.evaluate(&Point3d::new(3.0, 0.0, -5.0)) > 0.0);
        assert!((cyl.evaluate(&Point3d::new(2.0, 0.0, 0.0))).abs() < 1e-12);
    }

    #[test]
    fn test_plane_from_points() {
        // The XY plane at z = 1, counterclockwise seen from above.
        let p = Surface::plane_from_points(
            Point3d::new(0.0, 0.0, 1.0),
            Point3d::new(1.0, 0.0, 1.0),
            Point3d::new(0.0, 1.0, 1.0),
        )
        .unwrap();
        assert!(p.evaluate(&Point3d::new(5.0, 5.0, 0.0)) < 0.0);
        assert!(p.evaluate(&Point3d::new(5.0, 5.0, 2.0)) > 0.0);
    }

    #[test]
    fn test_collinear_points_rejected() {
        let r = Surface::plane_from_points(
            Point3d::new(0.0, 0.0, 0.0),
            Point3d::new(1.0, 1.0, 1.0),
            Point3d::new(2.0, 2.0, 2.0),
        );
        assert!(matches!(r, Err(GeometryError::DegeneratePlane)));
    }

    #[test]
    fn test_vertical_plane_normal() {
        let p = Surface::vertical_plane(90.0);
        assert!(p.evaluate(&Point3d::new(0.0, 1.0, 0.0)) > 0.0);
        assert!(p.evaluate(&Point3d::new(0.0, -1.0, 0.0)) < 0.0);
        assert!(p.evaluate(&Point3d::new(7.0, 0.0, 3.0)).abs() < 1e-12);
    }

    #[test]
    fn test_boundary_tag() {
        let cyl = Surface::z_cylinder(Point2d::ORIGIN, 1.0)
            .unwrap()
            .with_boundary(BoundaryKind::Vacuum);
        assert_eq!(cyl.boundary, BoundaryKind::Vacuum);
        assert_eq!(
            Surface::z_plane(0.0).boundary,
            BoundaryKind::Transmission
        );
    }
}
