//! One-pass serialization of a finished model to a JSON geometry document.
//!
//! The arena's universe/lattice graph is a DAG with sharing; the document
//! flattens it to dense index tables so each shared node is written once
//! and referenced by index everywhere else.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument};

use csg_kernel::{HexOrientation, Point2d, Region};
use csg_model::{Fill, LatticeId, ModelArena, ModelError, UniverseId};

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("failed to serialize geometry document: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Self-contained snapshot of a model's geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeometryDocument {
    pub format_version: u32,
    pub created: DateTime<Utc>,
    /// Index of the root universe in `universes`.
    pub root: usize,
    pub universes: Vec<UniverseRecord>,
    pub lattices: Vec<LatticeRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniverseRecord {
    pub name: String,
    pub cells: Vec<CellRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellRecord {
    pub id: u32,
    pub name: String,
    pub region: Region,
    pub fill: FillRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// Fill with arena keys replaced by document indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FillRecord {
    Material(u32),
    Universe(usize),
    Lattice(usize),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatticeRecord {
    pub orientation: HexOrientation,
    pub pitch: f64,
    pub center: Point2d,
    /// Per-ring unit patterns as universe indices, innermost first.
    pub rings: Vec<Vec<usize>>,
    pub outer: usize,
}

impl GeometryDocument {
    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Walk the graph reachable from `root` exactly once per node and emit the
/// flattened document. Fails if the graph is cyclic or references keys
/// missing from the arena.
#[instrument(skip(arena))]
pub fn export_model(
    arena: &ModelArena,
    root: UniverseId,
) -> Result<GeometryDocument, ExportError> {
    arena.validate_acyclic(root)?;

    let mut indexer = Indexer::default();
    indexer.visit_universe(arena, root)?;

    let universes = indexer
        .universe_order
        .iter()
        .map(|&id| {
            let u = arena.universe(id).expect("indexed universe exists");
            UniverseRecord {
                name: u.name.clone(),
                cells: u
                    .cells
                    .iter()
                    .map(|c| CellRecord {
                        id: c.id().0,
                        name: c.name.clone(),
                        region: c.region.clone(),
                        fill: indexer.fill_record(&c.fill),
                        temperature: c.temperature,
                    })
                    .collect(),
            }
        })
        .collect();

    let lattices = indexer
        .lattice_order
        .iter()
        .map(|&id| {
            let l = arena.lattice(id).expect("indexed lattice exists");
            LatticeRecord {
                orientation: l.orientation(),
                pitch: l.pitch(),
                center: l.center(),
                rings: l
                    .rings()
                    .iter()
                    .map(|pattern| {
                        pattern.iter().map(|u| indexer.universe_index[u]).collect()
                    })
                    .collect(),
                outer: indexer.universe_index[&l.outer()],
            }
        })
        .collect();

    let document = GeometryDocument {
        format_version: FORMAT_VERSION,
        created: Utc::now(),
        root: indexer.universe_index[&root],
        universes,
        lattices,
    };
    info!(
        universes = document.universes.len(),
        lattices = document.lattices.len(),
        "exported geometry document"
    );
    Ok(document)
}

#[derive(Default)]
struct Indexer {
    universe_index: HashMap<UniverseId, usize>,
    universe_order: Vec<UniverseId>,
    lattice_index: HashMap<LatticeId, usize>,
    lattice_order: Vec<LatticeId>,
}

impl Indexer {
    fn visit_universe(&mut self, arena: &ModelArena, id: UniverseId) -> Result<(), ExportError> {
        if self.universe_index.contains_key(&id) {
            return Ok(());
        }
        self.universe_index.insert(id, self.universe_order.len());
        self.universe_order.push(id);

        let universe = arena.universe(id).ok_or(ModelError::UnknownUniverse {
            context: "export".to_string(),
        })?;
        for cell in &universe.cells {
            match cell.fill {
                Fill::Material(_) => {}
                Fill::Universe(sub) => self.visit_universe(arena, sub)?,
                Fill::Lattice(lat) => self.visit_lattice(arena, lat)?,
            }
        }
        Ok(())
    }

    fn visit_lattice(&mut self, arena: &ModelArena, id: LatticeId) -> Result<(), ExportError> {
        if self.lattice_index.contains_key(&id) {
            return Ok(());
        }
        self.lattice_index.insert(id, self.lattice_order.len());
        self.lattice_order.push(id);

        let lattice = arena.lattice(id).ok_or(ModelError::UnknownLattice {
            context: "export".to_string(),
        })?;
        for pattern in lattice.rings() {
            for &u in pattern {
                self.visit_universe(arena, u)?;
            }
        }
        self.visit_universe(arena, lattice.outer())
    }

    fn fill_record(&self, fill: &Fill) -> FillRecord {
        match fill {
            Fill::Material(m) => FillRecord::Material(m.index()),
            Fill::Universe(u) => FillRecord::Universe(self.universe_index[u]),
            Fill::Lattice(l) => FillRecord::Lattice(self.lattice_index[l]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csg_kernel::{HexOrientation, Point2d, Region, Surface, hexagonal_prism};
    use csg_model::{Cell, HexLattice, MaterialRegistry};
    use std::sync::Arc;

    fn lattice_model() -> (ModelArena, UniverseId) {
        let mut registry = MaterialRegistry::new();
        let mut arena = ModelArena::new();
        let fuel = registry.register("graphite_fuel_435U_30C");
        let gas = registry.register("Hydrogen STP");

        let bore = Arc::new(Surface::z_cylinder(Point2d::ORIGIN, 0.12825).unwrap());
        let pin = arena
            .add_universe(
                "pin",
                vec![
                    Cell::new("gas", Region::negative(&bore), Fill::Material(gas)),
                    Cell::new("matrix", Region::positive(&bore), Fill::Material(fuel)),
                ],
            )
            .unwrap();
        let filler = arena
            .add_universe(
                "filler",
                vec![Cell::new(
                    "bulk",
                    Region::negative(&bore) | Region::positive(&bore),
                    Fill::Material(fuel),
                )],
            )
            .unwrap();

        // The pin universe is shared by every declared position.
        let lattice = arena
            .add_lattice(
                HexLattice::new(
                    HexOrientation::PointyTop,
                    0.4089,
                    Point2d::ORIGIN,
                    vec![vec![pin], vec![pin], vec![pin, pin]],
                    filler,
                )
                .unwrap(),
            )
            .unwrap();
        let hex = hexagonal_prism(
            HexOrientation::PointyTop,
            1.1,
            Point2d::ORIGIN,
            Default::default(),
        )
        .unwrap();
        let root = arena
            .add_universe(
                "assembly",
                vec![Cell::new("stack", hex, Fill::Lattice(lattice))],
            )
            .unwrap();
        (arena, root)
    }

    #[test]
    fn test_shared_universe_is_written_once() {
        let (arena, root) = lattice_model();
        let doc = export_model(&arena, root).unwrap();

        // Root, pin, filler: three universes despite 19 lattice positions.
        assert_eq!(doc.universes.len(), 3);
        assert_eq!(doc.lattices.len(), 1);
        assert_eq!(doc.universes[doc.root].name, "assembly");

        let pin_index = doc
            .universes
            .iter()
            .position(|u| u.name == "pin")
            .unwrap();
        for pattern in &doc.lattices[0].rings {
            for &u in pattern {
                assert_eq!(u, pin_index);
            }
        }
    }

    #[test]
    fn test_document_round_trips_through_json() {
        let (arena, root) = lattice_model();
        let doc = export_model(&arena, root).unwrap();
        let json = doc.to_json().unwrap();

        let parsed: GeometryDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.format_version, FORMAT_VERSION);
        assert_eq!(parsed.universes.len(), doc.universes.len());
        assert_eq!(parsed.lattices[0].rings.len(), 3);
        assert_eq!(parsed.lattices[0].rings[2].len(), 2);
    }

    #[test]
    fn test_fills_use_document_indices() {
        let (arena, root) = lattice_model();
        let doc = export_model(&arena, root).unwrap();

        let root_cell = &doc.universes[doc.root].cells[0];
        assert_eq!(root_cell.fill, FillRecord::Lattice(0));

        let filler_index = doc
            .universes
            .iter()
            .position(|u| u.name == "filler")
            .unwrap();
        assert_eq!(doc.lattices[0].outer, filler_index);
    }
}
