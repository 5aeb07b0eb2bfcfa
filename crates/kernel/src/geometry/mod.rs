pub mod point;
pub mod prism;
pub mod region;
pub mod surface;
pub mod symmetry;
pub mod transform;
pub mod vector;

use thiserror::Error;

/// Structured failure information for surface and region construction.
///
/// Every variant is detected eagerly at construction time; evaluation of a
/// successfully built region is total and cannot fail.
#[derive(Debug, Clone, Error)]
pub enum GeometryError {
    #[error("cylinder radius must be positive and finite, got {radius}")]
    InvalidRadius { radius: f64 },

    #[error("plane definition is degenerate (collinear or coincident points, or zero normal)")]
    DegeneratePlane,

    #[error("hexagon edge length must be positive and finite, got {edge_length}")]
    InvalidEdgeLength { edge_length: f64 },

    #[error("{n}-fold replication requires at least 2 copies")]
    InvalidFold { n: u32 },

    #[error("azimuthal wedge span must lie in (0, 180) degrees, got {span}")]
    InvalidWedgeSpan { span: f64 },
}
