use tracing::debug;

use super::GeometryError;
use super::region::Region;

/// Union of `n` copies of a seed region rotated about the vertical axis at
/// increments of 360/n degrees.
///
/// The seed must describe a single sector: a seed that already contains
/// rotational copies of itself double-counts material in the result. The
/// output is invariant under rotation by 360/n degrees.
pub fn replicate_n_fold(seed: &Region, n: u32) -> Result<Region, GeometryError> {
    if n < 2 {
        return Err(GeometryError::InvalidFold { n });
    }
    debug!(n, "replicating sector region");
    let step = 360.0 / n as f64;
    let mut result = seed.clone();
    for k in 1..n {
        result = result | seed.rotate_z(step * k as f64);
    }
    Ok(result)
}
