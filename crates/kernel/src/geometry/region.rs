use std::ops::{BitAnd, BitOr, Not};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::point::Point3d;
use super::surface::Surface;

/// Which closed half-space of a surface a leaf selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sense {
    /// Interior of a cylinder, or the side of a plane opposite its normal.
    /// Points exactly on the surface belong here.
    Negative,
    Positive,
}

/// A boolean expression tree over signed half-spaces.
///
/// Regions are immutable values: every operator returns a new tree and never
/// mutates in place. Leaves share their surfaces through `Arc`, so a surface
/// reused by many leaves (an outer boundary, say) exists once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Region {
    Half {
        surface: Arc<Surface>,
        sense: Sense,
    },
    Intersection(Box<Region>, Box<Region>),
    Union(Box<Region>, Box<Region>),
    Complement(Box<Region>),
}

impl Region {
    /// The closed negative half-space of a surface (`-s` in the usual CSG
    /// notation): cylinder interior, or below/behind a plane.
    pub fn negative(surface: &Arc<Surface>) -> Self {
        Region::Half {
            surface: Arc::clone(surface),
            sense: Sense::Negative,
        }
    }

    /// The open positive half-space of a surface (`+s`).
    pub fn positive(surface: &Arc<Surface>) -> Self {
        Region::Half {
            surface: Arc::clone(surface),
            sense: Sense::Positive,
        }
    }

    pub fn intersect(self, other: Region) -> Self {
        Region::Intersection(Box::new(self), Box::new(other))
    }

    pub fn union(self, other: Region) -> Self {
        Region::Union(Box::new(self), Box::new(other))
    }

    pub fn complement(self) -> Self {
        Region::Complement(Box::new(self))
    }

    /// Pure, total membership test.
    pub fn contains(&self, p: &Point3d) -> bool {
        match self {
            Region::Half { surface, sense } => match sense {
                Sense::Negative => surface.evaluate(p) <= 0.0,
                Sense::Positive => surface.evaluate(p) > 0.0,
            },
            Region::Intersection(a, b) => a.contains(p) && b.contains(p),
            Region::Union(a, b) => a.contains(p) || b.contains(p),
            Region::Complement(r) => !r.contains(p),
        }
    }

    /// Visit every leaf surface in the tree, including duplicates.
    pub fn for_each_surface(&self, visit: &mut impl FnMut(&Arc<Surface>)) {
        match self {
            Region::Half { surface, .. } => visit(surface),
            Region::Intersection(a, b) | Region::Union(a, b) => {
                a.for_each_surface(visit);
                b.for_each_surface(visit);
            }
            Region::Complement(r) => r.for_each_surface(visit),
        }
    }
}

impl BitAnd for Region {
    type Output = Region;
    fn bitand(self, rhs: Region) -> Region {
        self.intersect(rhs)
    }
}

impl BitOr for Region {
    type Output = Region;
    fn bitor(self, rhs: Region) -> Region {
        self.union(rhs)
    }
}

impl Not for Region {
    type Output = Region;
    fn not(self) -> Region {
        self.complement()
    }
}
