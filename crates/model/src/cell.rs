use serde::{Deserialize, Serialize};

use csg_kernel::Region;

use crate::lattice::LatticeId;
use crate::material::MaterialRef;
use crate::universe::UniverseId;

/// Stable identity of a cell definition, assigned by the arena at insertion.
///
/// A definition may have many geometric instances (the same fuel cell
/// replicated across every lattice position); instances are enumerated
/// separately by `enumerate_cell_instances`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellId(pub u32);

/// What occupies the space a cell owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fill {
    Material(MaterialRef),
    Universe(UniverseId),
    Lattice(LatticeId),
}

/// A region of space paired with what fills it.
///
/// The region is evaluated inside the parent universe's extent; temperature
/// is an optional override consumed by the solver layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    pub(crate) id: CellId,
    pub name: String,
    pub region: Region,
    pub fill: Fill,
    pub temperature: Option<f64>,
}

impl Cell {
    pub fn new(name: impl Into<String>, region: Region, fill: Fill) -> Self {
        Self {
            id: CellId(0),
            name: name.into(),
            region,
            fill,
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, kelvin: f64) -> Self {
        self.temperature = Some(kelvin);
        self
    }

    /// The arena-assigned definition id. Zero until the cell is inserted.
    pub fn id(&self) -> CellId {
        self.id
    }
}
