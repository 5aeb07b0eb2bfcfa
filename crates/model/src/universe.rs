use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::cell::{Cell, CellId, Fill};
use crate::lattice::{HexLattice, LatticeId};
use crate::validate::{PartitionCheck, check_partition};

new_key_type! {
    pub struct UniverseId;
}

/// Construction-time failures of the model layer. None of these are
/// recoverable or retried: geometry construction is deterministic.
#[derive(Debug, Clone, Error)]
pub enum ModelError {
    #[error(
        "universe '{universe}': point ({x:.6}, {y:.6}, {z:.6}) is owned by {owners} cells (expected exactly 1)"
    )]
    BrokenPartition {
        universe: String,
        x: f64,
        y: f64,
        z: f64,
        owners: usize,
    },

    #[error("partition check for universe '{universe}' needs finite sampling bounds")]
    UnboundedCheck { universe: String },

    #[error("universe fill graph contains a cycle through '{universe}'")]
    CyclicUniverse { universe: String },

    #[error("lattice ring {ring} unit pattern has {got} entries, expected {expected}")]
    BadRingPattern {
        ring: usize,
        expected: usize,
        got: usize,
    },

    #[error("lattice pitch must be positive and finite, got {pitch}")]
    InvalidPitch { pitch: f64 },

    #[error("{context} references a universe that is not in the arena")]
    UnknownUniverse { context: String },

    #[error("{context} references a lattice that is not in the arena")]
    UnknownLattice { context: String },

    #[error("no cell with id {id} exists in the arena")]
    UnknownCell { id: u32 },

    #[error("universe '{universe}' owns no cell at point ({x:.6}, {y:.6}, {z:.6})")]
    UnresolvedPoint {
        universe: String,
        x: f64,
        y: f64,
        z: f64,
    },
}

/// An ordered collection of cells that partitions its extent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Universe {
    pub name: String,
    pub cells: Vec<Cell>,
}

/// Owning arena for the universe/lattice graph.
///
/// Sharing is explicit: cells store ids, and the same universe referenced
/// from many lattice positions exists exactly once. Because fills may only
/// name keys already present in the arena, the graph is acyclic by
/// construction; `validate_acyclic` re-checks this property explicitly for
/// graphs reconstructed from persisted documents.
#[derive(Debug, Clone, Default)]
pub struct ModelArena {
    universes: SlotMap<UniverseId, Universe>,
    lattices: SlotMap<LatticeId, HexLattice>,
    cell_owner: HashMap<CellId, UniverseId>,
    next_cell_id: u32,
}

impl ModelArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a universe, assigning stable cell ids and validating that
    /// every fill references an existing arena entry.
    #[instrument(skip(self, cells), fields(cells = cells.len()))]
    pub fn add_universe(
        &mut self,
        name: &str,
        cells: Vec<Cell>,
    ) -> Result<UniverseId, ModelError> {
        let mut cells = cells;
        for cell in &cells {
            self.check_fill(&cell.fill, &format!("cell '{}' of universe '{name}'", cell.name))?;
        }
        for cell in &mut cells {
            self.next_cell_id += 1;
            cell.id = CellId(self.next_cell_id);
        }
        debug!(universe = name, "inserting universe");
        let id = self.universes.insert(Universe {
            name: name.to_string(),
            cells,
        });
        for cell in &self.universes[id].cells {
            self.cell_owner.insert(cell.id, id);
        }
        Ok(id)
    }

    /// Insert a universe after verifying the partition invariant by point
    /// sampling: every sampled point of the extent must be owned by exactly
    /// one cell.
    pub fn add_universe_checked(
        &mut self,
        name: &str,
        cells: Vec<Cell>,
        check: &PartitionCheck,
    ) -> Result<UniverseId, ModelError> {
        check_partition(name, &cells, check)?;
        self.add_universe(name, cells)
    }

    /// Insert a lattice, validating that every referenced universe exists.
    pub fn add_lattice(&mut self, lattice: HexLattice) -> Result<LatticeId, ModelError> {
        for (k, pattern) in lattice.rings().iter().enumerate() {
            for &u in pattern {
                if !self.universes.contains_key(u) {
                    return Err(ModelError::UnknownUniverse {
                        context: format!("lattice ring {k}"),
                    });
                }
            }
        }
        if !self.universes.contains_key(lattice.outer()) {
            return Err(ModelError::UnknownUniverse {
                context: "lattice outer fill".to_string(),
            });
        }
        Ok(self.lattices.insert(lattice))
    }

    pub fn universe(&self, id: UniverseId) -> Option<&Universe> {
        self.universes.get(id)
    }

    pub fn lattice(&self, id: LatticeId) -> Option<&HexLattice> {
        self.lattices.get(id)
    }

    pub fn universes(&self) -> impl Iterator<Item = (UniverseId, &Universe)> {
        self.universes.iter()
    }

    pub fn lattices(&self) -> impl Iterator<Item = (LatticeId, &HexLattice)> {
        self.lattices.iter()
    }

    /// Attach a temperature override to an existing cell definition.
    /// Geometry is immutable after insertion; temperature is solver-facing
    /// metadata and the one attribute that may be set post-hoc.
    pub fn set_temperature(&mut self, cell: CellId, kelvin: f64) -> Result<(), ModelError> {
        let owner = *self
            .cell_owner
            .get(&cell)
            .ok_or(ModelError::UnknownCell { id: cell.0 })?;
        let universe = &mut self.universes[owner];
        for c in &mut universe.cells {
            if c.id == cell {
                c.temperature = Some(kelvin);
                return Ok(());
            }
        }
        Err(ModelError::UnknownCell { id: cell.0 })
    }

    /// Explicit cycle check over the fill graph rooted at `root`.
    pub fn validate_acyclic(&self, root: UniverseId) -> Result<(), ModelError> {
        let mut in_stack = Vec::new();
        self.visit_acyclic(root, &mut in_stack)
    }

    fn visit_acyclic(
        &self,
        id: UniverseId,
        stack: &mut Vec<UniverseId>,
    ) -> Result<(), ModelError> {
        if stack.contains(&id) {
            let name = self
                .universes
                .get(id)
                .map(|u| u.name.clone())
                .unwrap_or_else(|| "<unknown>".to_string());
            return Err(ModelError::CyclicUniverse { universe: name });
        }
        let universe = self.universes.get(id).ok_or(ModelError::UnknownUniverse {
            context: "cycle check".to_string(),
        })?;
        stack.push(id);
        for cell in &universe.cells {
            match cell.fill {
                Fill::Material(_) => {}
                Fill::Universe(sub) => self.visit_acyclic(sub, stack)?,
                Fill::Lattice(lat) => {
                    let lattice = self.lattices.get(lat).ok_or(ModelError::UnknownLattice {
                        context: format!("cell '{}'", cell.name),
                    })?;
                    let mut seen = Vec::new();
                    for pattern in lattice.rings() {
                        for &u in pattern {
                            if !seen.contains(&u) {
                                seen.push(u);
                            }
                        }
                    }
                    if !seen.contains(&lattice.outer()) {
                        seen.push(lattice.outer());
                    }
                    for u in seen {
                        self.visit_acyclic(u, stack)?;
                    }
                }
            }
        }
        stack.pop();
        Ok(())
    }

    fn check_fill(&self, fill: &Fill, context: &str) -> Result<(), ModelError> {
        match fill {
            Fill::Material(_) => Ok(()),
            Fill::Universe(u) => {
                if self.universes.contains_key(*u) {
                    Ok(())
                } else {
                    Err(ModelError::UnknownUniverse {
                        context: context.to_string(),
                    })
                }
            }
            Fill::Lattice(l) => {
                if self.lattices.contains_key(*l) {
                    Ok(())
                } else {
                    Err(ModelError::UnknownLattice {
                        context: context.to_string(),
                    })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::MaterialRegistry;
    use csg_kernel::{Point2d, Region, Surface};
    use std::sync::Arc;

    fn material_cell(name: &str, radius: f64, reg: &mut MaterialRegistry) -> Cell {
        let s = Arc::new(Surface::z_cylinder(Point2d::ORIGIN, radius).unwrap());
        Cell::new(name, Region::negative(&s), Fill::Material(reg.register(name)))
    }

    #[test]
    fn test_cell_ids_are_assigned_and_stable() {
        let mut reg = MaterialRegistry::new();
        let mut arena = ModelArena::new();
        let u = arena
            .add_universe("pin", vec![material_cell("fuel", 1.0, &mut reg)])
            .unwrap();
        let id = arena.universe(u).unwrap().cells[0].id();
        assert_ne!(id.0, 0);

        let v = arena
            .add_universe("pin2", vec![material_cell("clad", 1.0, &mut reg)])
            .unwrap();
        let id2 = arena.universe(v).unwrap().cells[0].id();
        assert_ne!(id, id2);
    }

    #[test]
    fn test_fill_must_reference_existing_universe() {
        let mut reg = MaterialRegistry::new();
        let mut arena = ModelArena::new();
        let u = arena
            .add_universe("pin", vec![material_cell("fuel", 1.0, &mut reg)])
            .unwrap();

        // A key from a different arena is unknown here.
        let mut other = ModelArena::new();
        let foreign = other
            .add_universe("x", vec![material_cell("m", 1.0, &mut reg)])
            .unwrap();

        let s = Arc::new(Surface::z_cylinder(Point2d::ORIGIN, 2.0).unwrap());
        let ok = Cell::new("inner", Region::negative(&s), Fill::Universe(u));
        assert!(arena.add_universe("wrap", vec![ok]).is_ok());

        let bad = Cell::new(
            "inner",
            Region::negative(&s),
            Fill::Universe(foreign),
        );
        assert!(matches!(
            arena.add_universe("wrap2", vec![bad]),
            Err(ModelError::UnknownUniverse { .. })
        ));
    }

    #[test]
    fn test_temperature_override() {
        let mut reg = MaterialRegistry::new();
        let mut arena = ModelArena::new();
        let u = arena
            .add_universe("pin", vec![material_cell("fuel", 1.0, &mut reg)])
            .unwrap();
        let cell = arena.universe(u).unwrap().cells[0].id();

        arena.set_temperature(cell, 2500.0).unwrap();
        assert_eq!(arena.universe(u).unwrap().cells[0].temperature, Some(2500.0));

        assert!(matches!(
            arena.set_temperature(CellId(9999), 300.0),
            Err(ModelError::UnknownCell { id: 9999 })
        ));
    }

    #[test]
    fn test_bottom_up_graph_is_acyclic() {
        let mut reg = MaterialRegistry::new();
        let mut arena = ModelArena::new();
        let inner = arena
            .add_universe("inner", vec![material_cell("fuel", 1.0, &mut reg)])
            .unwrap();
        let s = Arc::new(Surface::z_cylinder(Point2d::ORIGIN, 2.0).unwrap());
        let outer = arena
            .add_universe(
                "outer",
                vec![Cell::new("wrap", Region::negative(&s), Fill::Universe(inner))],
            )
            .unwrap();
        assert!(arena.validate_acyclic(outer).is_ok());
    }
}
