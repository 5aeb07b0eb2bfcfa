use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

use csg_kernel::{HexOrientation, Point2d};

use crate::universe::{ModelError, UniverseId};

new_key_type! {
    pub struct LatticeId;
}

/// Axial coordinates on a hexagonal grid (cube coordinate `s` is implied
/// as `-q - r`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HexCoord {
    pub q: i32,
    pub r: i32,
}

/// The six neighbor steps, counterclockwise starting along +q.
const DIRECTIONS: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)];

impl HexCoord {
    pub fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    pub const CENTER: Self = Self { q: 0, r: 0 };

    /// Ring index: distance from the center in lattice steps.
    pub fn ring(&self) -> u32 {
        let s = -self.q - self.r;
        self.q.abs().max(self.r.abs()).max(s.abs()) as u32
    }

    /// All coordinates of ring `k` in traversal order (6k positions for
    /// k > 0, the single center for k = 0).
    pub fn ring_coords(k: u32) -> Vec<HexCoord> {
        if k == 0 {
            return vec![HexCoord::CENTER];
        }
        let k = k as i32;
        let mut coords = Vec::with_capacity(6 * k as usize);
        let (dq, dr) = DIRECTIONS[4];
        let mut q = dq * k;
        let mut r = dr * k;
        for (dq, dr) in DIRECTIONS {
            for _ in 0..k {
                coords.push(HexCoord::new(q, r));
                q += dq;
                r += dr;
            }
        }
        coords
    }

    /// Index of this coordinate within its own ring's traversal order.
    pub fn ring_position(&self) -> u32 {
        HexCoord::ring_coords(self.ring())
            .iter()
            .position(|c| c == self)
            .expect("a coordinate is always on its own ring") as u32
    }
}

/// A structured container mapping hexagonal-ring coordinates to universes.
///
/// Ring content is compressed: ring k stores a unit pattern of k entries
/// tiled 6-fold around the ring (one entry for the center ring), exploiting
/// the lattice's rotational symmetry. Positions beyond the declared rings
/// resolve to `outer`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HexLattice {
    orientation: HexOrientation,
    pitch: f64,
    center: Point2d,
    rings: Vec<Vec<UniverseId>>,
    outer: UniverseId,
}

impl HexLattice {
    /// Build a lattice, validating the pitch and the per-ring unit pattern
    /// lengths (ring 0 holds exactly 1 entry, ring k exactly k).
    pub fn new(
        orientation: HexOrientation,
        pitch: f64,
        center: Point2d,
        rings: Vec<Vec<UniverseId>>,
        outer: UniverseId,
    ) -> Result<Self, ModelError> {
        if !pitch.is_finite() || pitch <= 0.0 {
            return Err(ModelError::InvalidPitch { pitch });
        }
        for (k, pattern) in rings.iter().enumerate() {
            let expected = if k == 0 { 1 } else { k };
            if pattern.len() != expected {
                return Err(ModelError::BadRingPattern {
                    ring: k,
                    expected,
                    got: pattern.len(),
                });
            }
        }
        Ok(Self {
            orientation,
            pitch,
            center,
            rings,
            outer,
        })
    }

    pub fn orientation(&self) -> HexOrientation {
        self.orientation
    }

    pub fn pitch(&self) -> f64 {
        self.pitch
    }

    pub fn center(&self) -> Point2d {
        self.center
    }

    pub fn rings(&self) -> &[Vec<UniverseId>] {
        &self.rings
    }

    pub fn outer(&self) -> UniverseId {
        self.outer
    }

    /// Number of enumerated positions: 1 + 6 * (1 + 2 + ... + (K - 1)).
    pub fn position_count(&self) -> usize {
        let k = self.rings.len();
        if k == 0 { 0 } else { 1 + 3 * k * (k - 1) }
    }

    /// Resolve a coordinate to its universe, tiling each ring's unit pattern
    /// 6-fold; coordinates beyond the declared rings fall back to `outer`.
    pub fn universe_at(&self, coord: HexCoord) -> UniverseId {
        let k = coord.ring() as usize;
        if k >= self.rings.len() {
            return self.outer;
        }
        if k == 0 {
            return self.rings[0][0];
        }
        let position = coord.ring_position() as usize;
        self.rings[k][position % k]
    }

    /// Physical center of a lattice position.
    pub fn coord_center(&self, coord: HexCoord) -> Point2d {
        let q = coord.q as f64;
        let r = coord.r as f64;
        let sqrt3_2 = 3.0f64.sqrt() / 2.0;
        let (x, y) = match self.orientation {
            // Rows along +x: neighbors at polar angles 0 and 60 degrees.
            HexOrientation::PointyTop => (q + r / 2.0, sqrt3_2 * r),
            // Rows along the 30-degree direction: neighbors at 30 and 90.
            HexOrientation::FlatTop => (sqrt3_2 * q, q / 2.0 + r),
        };
        Point2d::new(self.center.x + x * self.pitch, self.center.y + y * self.pitch)
    }

    /// Nearest lattice coordinate to a physical point (cube rounding).
    pub fn coord_at_point(&self, p: Point2d) -> HexCoord {
        let x = (p.x - self.center.x) / self.pitch;
        let y = (p.y - self.center.y) / self.pitch;
        let sqrt3 = 3.0f64.sqrt();
        let (q, r) = match self.orientation {
            HexOrientation::PointyTop => {
                let r = 2.0 * y / sqrt3;
                (x - r / 2.0, r)
            }
            HexOrientation::FlatTop => {
                let q = 2.0 * x / sqrt3;
                (q, y - q / 2.0)
            }
        };
        cube_round(q, r)
    }
}

/// Round fractional axial coordinates to the nearest hex center.
fn cube_round(q: f64, r: f64) -> HexCoord {
    let s = -q - r;
    let mut rq = q.round();
    let mut rr = r.round();
    let rs = s.round();

    let dq = (rq - q).abs();
    let dr = (rr - r).abs();
    let ds = (rs - s).abs();

    if dq > dr && dq > ds {
        rq = -rr - rs;
    } else if dr > ds {
        rr = -rq - rs;
    }
    HexCoord::new(rq as i32, rr as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use slotmap::KeyData;

    fn uid(n: u64) -> UniverseId {
        // Synthetic keys are fine here: these tests never dereference them.
        UniverseId::from(KeyData::from_ffi(n | (1 << 32)))
    }

    fn three_ring_lattice() -> HexLattice {
        let a = uid(1);
        let b = uid(2);
        HexLattice::new(
            HexOrientation::PointyTop,
            1.0,
            Point2d::ORIGIN,
            vec![vec![a], vec![b], vec![a, b]],
            uid(9),
        )
        .unwrap()
    }

    #[test]
    fn test_ring_sizes() {
        assert_eq!(HexCoord::ring_coords(0).len(), 1);
        assert_eq!(HexCoord::ring_coords(1).len(), 6);
        assert_eq!(HexCoord::ring_coords(4).len(), 24);
    }

    #[test]
    fn test_ring_coords_are_on_their_ring() {
        for k in 0..5 {
            for c in HexCoord::ring_coords(k) {
                assert_eq!(c.ring(), k);
            }
        }
    }

    #[test]
    fn test_position_count_law() {
        for k in 1..8usize {
            let rings: Vec<Vec<UniverseId>> = (0..k)
                .map(|i| vec![uid(1); if i == 0 { 1 } else { i }])
                .collect();
            let lat = HexLattice::new(
                HexOrientation::FlatTop,
                1.0,
                Point2d::ORIGIN,
                rings,
                uid(9),
            )
            .unwrap();
            let expected = 1 + 6 * (0..k).sum::<usize>();
            assert_eq!(lat.position_count(), expected);
        }
    }

    #[test]
    fn test_bad_pattern_length_rejected() {
        let r = HexLattice::new(
            HexOrientation::PointyTop,
            1.0,
            Point2d::ORIGIN,
            vec![vec![uid(1)], vec![uid(1), uid(2)]],
            uid(9),
        );
        assert!(matches!(
            r,
            Err(ModelError::BadRingPattern {
                ring: 1,
                expected: 1,
                got: 2
            })
        ));
    }

    #[test]
    fn test_pattern_tiles_six_fold() {
        let lat = three_ring_lattice();
        let a = uid(1);
        let b = uid(2);
        // Ring 2 pattern [a, b] tiles to [a, b, a, b, ...] around the ring.
        let coords = HexCoord::ring_coords(2);
        for (i, c) in coords.iter().enumerate() {
            let expected = if i % 2 == 0 { a } else { b };
            assert_eq!(lat.universe_at(*c), expected);
        }
    }

    #[test]
    fn test_outside_rings_falls_back_to_outer() {
        let lat = three_ring_lattice();
        assert_eq!(lat.universe_at(HexCoord::new(5, 0)), uid(9));
    }

    #[test]
    fn test_coord_center_roundtrip() {
        for orientation in [HexOrientation::PointyTop, HexOrientation::FlatTop] {
            let lat = HexLattice::new(
                orientation,
                0.4089,
                Point2d::new(1.0, -2.0),
                vec![vec![uid(1)]],
                uid(9),
            )
            .unwrap();
            for k in 0..4 {
                for c in HexCoord::ring_coords(k) {
                    let center = lat.coord_center(c);
                    assert_eq!(lat.coord_at_point(center), c);
                }
            }
        }
    }

    #[test]
    fn test_neighbor_spacing_is_pitch() {
        for orientation in [HexOrientation::PointyTop, HexOrientation::FlatTop] {
            let lat = HexLattice::new(
                orientation,
                1.905,
                Point2d::ORIGIN,
                vec![vec![uid(1)]],
                uid(9),
            )
            .unwrap();
            let origin = lat.coord_center(HexCoord::CENTER);
            for c in HexCoord::ring_coords(1) {
                let d = lat.coord_center(c).distance_to(&origin);
                assert_relative_eq!(d, 1.905, epsilon = 1e-12);
            }
        }
    }
}
