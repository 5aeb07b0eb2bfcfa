use tracing::{debug, instrument};

use csg_kernel::{BoundingBox, Point3d, Region};

use crate::cell::Cell;
use crate::universe::ModelError;

/// Configuration for the sampling-based partition check run by
/// `ModelArena::add_universe_checked`.
///
/// Points are drawn from `bounds`; if `extent` is set, samples outside it
/// are discarded before counting owners, so cells are only required to
/// partition the extent rather than the whole box.
#[derive(Debug, Clone)]
pub struct PartitionCheck {
    pub samples: usize,
    pub bounds: BoundingBox,
    pub extent: Option<Region>,
}

impl PartitionCheck {
    pub fn new(samples: usize, bounds: BoundingBox) -> Self {
        Self {
            samples,
            bounds,
            extent: None,
        }
    }

    pub fn with_extent(mut self, extent: Region) -> Self {
        self.extent = Some(extent);
        self
    }
}

/// Verify that every sampled point is owned by exactly one cell.
///
/// Deterministic quasi-random sampling keeps failures reproducible; the
/// offending point and its owner count are reported in the error.
#[instrument(skip(cells, check), fields(cells = cells.len(), samples = check.samples))]
pub(crate) fn check_partition(
    name: &str,
    cells: &[Cell],
    check: &PartitionCheck,
) -> Result<(), ModelError> {
    let b = &check.bounds;
    if !b.is_finite() {
        return Err(ModelError::UnboundedCheck {
            universe: name.to_string(),
        });
    }

    let mut state: u64 = 0x9e3779b97f4a7c15;
    let mut next = || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 33) as f64 / (1u64 << 31) as f64
    };

    let mut tested = 0usize;
    for _ in 0..check.samples {
        let p = Point3d::new(
            b.min.x + next() * (b.max.x - b.min.x),
            b.min.y + next() * (b.max.y - b.min.y),
            b.min.z + next() * (b.max.z - b.min.z),
        );
        if let Some(extent) = &check.extent {
            if !extent.contains(&p) {
                continue;
            }
        }
        tested += 1;
        let owners = cells.iter().filter(|c| c.region.contains(&p)).count();
        if owners != 1 {
            return Err(ModelError::BrokenPartition {
                universe: name.to_string(),
                x: p.x,
                y: p.y,
                z: p.z,
                owners,
            });
        }
    }
    debug!(universe = name, tested, "partition check passed");
    Ok(())
}
