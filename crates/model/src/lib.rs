pub mod cell;
pub mod lattice;
pub mod material;
pub mod query;
pub mod universe;
pub mod validate;

pub use cell::{Cell, CellId, Fill};
pub use lattice::{HexCoord, HexLattice, LatticeId};
pub use material::{MaterialError, MaterialRef, MaterialRegistry};
pub use query::{
    CellInstance, PointLocation, boundary_surfaces, bounding_box, enumerate_cell_instances,
    point_query,
};
pub use universe::{ModelArena, ModelError, Universe, UniverseId};
pub use validate::PartitionCheck;
