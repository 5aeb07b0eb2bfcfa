pub mod geometry;

// Re-export the core vocabulary at the crate root for convenience.
pub use geometry::GeometryError;
pub use geometry::point::{Point2d, Point3d};
pub use geometry::prism::{HexOrientation, azimuthal_wedge, hexagonal_prism};
pub use geometry::region::{Region, Sense};
pub use geometry::surface::{BoundaryKind, Surface, SurfaceKind};
pub use geometry::symmetry::replicate_n_fold;
pub use geometry::transform::BoundingBox;
pub use geometry::vector::{Vec2, Vec3};

/// Global tolerance configuration for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Points closer than this are considered coincident (centimeters).
    pub coincidence: f64,
    /// Angles smaller than this (radians) are considered zero.
    pub angular: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            coincidence: 1e-9,
            angular: 1e-10,
        }
    }
}

impl Tolerance {
    pub fn points_coincident(&self, a: &Point3d, b: &Point3d) -> bool {
        a.distance_to(b) < self.coincidence
    }

    pub fn is_zero_length(&self, length: f64) -> bool {
        length.abs() < self.coincidence
    }

    pub fn is_zero_angle(&self, angle: f64) -> bool {
        angle.abs() < self.angular
    }
}

pub fn default_tolerance() -> Tolerance {
    Tolerance::default()
}
