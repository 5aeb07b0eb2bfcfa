use std::collections::HashMap;
use std::sync::Arc;

use tracing::instrument;

use csg_kernel::{BoundaryKind, BoundingBox, Point3d, Surface};

use crate::cell::{CellId, Fill};
use crate::material::MaterialRef;
use crate::universe::{ModelArena, ModelError, UniverseId};

/// Result of resolving a point through the universe hierarchy down to a
/// material-filled cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLocation {
    pub cell: CellId,
    pub material: MaterialRef,
    pub temperature: Option<f64>,
}

/// Resolve which material cell owns `point`, descending through nested
/// universes and lattices. Lattice descent re-expresses the point in the
/// coordinate frame of the tile it lands in.
#[instrument(skip(arena), fields(x = point.x, y = point.y, z = point.z))]
pub fn point_query(
    arena: &ModelArena,
    root: UniverseId,
    point: Point3d,
) -> Result<PointLocation, ModelError> {
    resolve(arena, root, point)
}

fn resolve(
    arena: &ModelArena,
    universe_id: UniverseId,
    point: Point3d,
) -> Result<PointLocation, ModelError> {
    let universe = arena
        .universe(universe_id)
        .ok_or(ModelError::UnknownUniverse {
            context: "point query".to_string(),
        })?;
    let cell = universe
        .cells
        .iter()
        .find(|c| c.region.contains(&point))
        .ok_or_else(|| ModelError::UnresolvedPoint {
            universe: universe.name.clone(),
            x: point.x,
            y: point.y,
            z: point.z,
        })?;
    match cell.fill {
        Fill::Material(material) => Ok(PointLocation {
            cell: cell.id(),
            material,
            temperature: cell.temperature,
        }),
        Fill::Universe(sub) => resolve(arena, sub, point),
        Fill::Lattice(lattice_id) => {
            let lattice = arena
                .lattice(lattice_id)
                .ok_or(ModelError::UnknownLattice {
                    context: format!("cell '{}'", cell.name),
                })?;
            let coord = lattice.coord_at_point(point.xy());
            let tile_center = lattice.coord_center(coord);
            let local = Point3d::new(
                point.x - tile_center.x,
                point.y - tile_center.y,
                point.z,
            );
            resolve(arena, lattice.universe_at(coord), local)
        }
    }
}

/// Axis-aligned bounds of a universe: the union of its cells' region
/// bounds. Positive half-spaces and complements yield unbounded axes, so
/// finite results are only expected for universes closed by negative
/// half-spaces.
pub fn bounding_box(arena: &ModelArena, universe: UniverseId) -> Result<BoundingBox, ModelError> {
    let universe = arena.universe(universe).ok_or(ModelError::UnknownUniverse {
        context: "bounding box".to_string(),
    })?;
    let mut bb = BoundingBox::empty();
    for cell in &universe.cells {
        bb = bb.union(&cell.region.bounding_box());
    }
    Ok(bb)
}

/// One geometric occurrence of a cell definition.
///
/// `instance` counts occurrences of the same definition in traversal order,
/// starting at zero, so replicated lattice tiles get distinct labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellInstance {
    pub cell: CellId,
    pub instance: u32,
}

/// Enumerate every cell instance reachable from `root`, in a deterministic
/// depth-first order. Each declared lattice position is walked, so a
/// universe filling all 6k tiles of a ring contributes 6k instances of each
/// of its cells; a lattice's outer fill is walked once per lattice.
#[instrument(skip(arena))]
pub fn enumerate_cell_instances(
    arena: &ModelArena,
    root: UniverseId,
) -> Result<Vec<CellInstance>, ModelError> {
    let mut counters: HashMap<CellId, u32> = HashMap::new();
    let mut out = Vec::new();
    walk_instances(arena, root, &mut counters, &mut out)?;
    Ok(out)
}

fn walk_instances(
    arena: &ModelArena,
    universe_id: UniverseId,
    counters: &mut HashMap<CellId, u32>,
    out: &mut Vec<CellInstance>,
) -> Result<(), ModelError> {
    let universe = arena
        .universe(universe_id)
        .ok_or(ModelError::UnknownUniverse {
            context: "instance enumeration".to_string(),
        })?;
    for cell in &universe.cells {
        let n = counters.entry(cell.id()).or_insert(0);
        out.push(CellInstance {
            cell: cell.id(),
            instance: *n,
        });
        *n += 1;
        match cell.fill {
            Fill::Material(_) => {}
            Fill::Universe(sub) => walk_instances(arena, sub, counters, out)?,
            Fill::Lattice(lattice_id) => {
                let lattice = arena
                    .lattice(lattice_id)
                    .ok_or(ModelError::UnknownLattice {
                        context: format!("cell '{}'", cell.name),
                    })?;
                for k in 0..lattice.rings().len() as u32 {
                    for coord in crate::lattice::HexCoord::ring_coords(k) {
                        walk_instances(arena, lattice.universe_at(coord), counters, out)?;
                    }
                }
                walk_instances(arena, lattice.outer(), counters, out)?;
            }
        }
    }
    Ok(())
}

/// Collect the distinct surfaces reachable from `root` that carry a
/// non-default boundary condition. Surfaces shared between regions through
/// the same `Arc` are reported once.
pub fn boundary_surfaces(
    arena: &ModelArena,
    root: UniverseId,
) -> Result<Vec<Arc<Surface>>, ModelError> {
    let mut visited_universes = Vec::new();
    let mut out: Vec<Arc<Surface>> = Vec::new();
    collect_boundaries(arena, root, &mut visited_universes, &mut out)?;
    Ok(out)
}

fn collect_boundaries(
    arena: &ModelArena,
    universe_id: UniverseId,
    visited: &mut Vec<UniverseId>,
    out: &mut Vec<Arc<Surface>>,
) -> Result<(), ModelError> {
    if visited.contains(&universe_id) {
        return Ok(());
    }
    visited.push(universe_id);
    let universe = arena
        .universe(universe_id)
        .ok_or(ModelError::UnknownUniverse {
            context: "boundary collection".to_string(),
        })?;
    for cell in &universe.cells {
        cell.region.for_each_surface(&mut |s: &Arc<Surface>| {
            if s.boundary != BoundaryKind::Transmission
                && !out.iter().any(|seen| Arc::ptr_eq(seen, s))
            {
                out.push(Arc::clone(s));
            }
        });
        match cell.fill {
            Fill::Material(_) => {}
            Fill::Universe(sub) => collect_boundaries(arena, sub, visited, out)?,
            Fill::Lattice(lattice_id) => {
                let lattice = arena
                    .lattice(lattice_id)
                    .ok_or(ModelError::UnknownLattice {
                        context: format!("cell '{}'", cell.name),
                    })?;
                for pattern in lattice.rings() {
                    for &u in pattern {
                        collect_boundaries(arena, u, visited, out)?;
                    }
                }
                collect_boundaries(arena, lattice.outer(), visited, out)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;
    use crate::lattice::{HexCoord, HexLattice};
    use crate::material::MaterialRegistry;
    use csg_kernel::{HexOrientation, Point2d, Region, hexagonal_prism};

    struct Fixture {
        arena: ModelArena,
        registry: MaterialRegistry,
        root: UniverseId,
        pin_fuel: CellId,
        pin_gas: CellId,
    }

    /// A pin universe (fuel cylinder in coolant) tiled on a two-ring
    /// lattice, wrapped in a hexagonal prism cell.
    fn lattice_fixture() -> Fixture {
        let mut registry = MaterialRegistry::new();
        let mut arena = ModelArena::new();

        let fuel = registry.register("graphite_fuel_435U_30C");
        let hydrogen = registry.register("Hydrogen STP");
        let beryllium = registry.register("beryllium");

        let bore = Arc::new(Surface::z_cylinder(Point2d::ORIGIN, 0.12825).unwrap());
        let pin = arena
            .add_universe(
                "pin",
                vec![
                    Cell::new("gas", Region::negative(&bore), Fill::Material(hydrogen)),
                    Cell::new("matrix", Region::positive(&bore), Fill::Material(fuel)),
                ],
            )
            .unwrap();
        let pin_gas = arena.universe(pin).unwrap().cells[0].id();
        let pin_fuel = arena.universe(pin).unwrap().cells[1].id();

        let filler = arena
            .add_universe(
                "filler",
                vec![Cell::new(
                    "filler",
                    Region::positive(&bore) | Region::negative(&bore),
                    Fill::Material(beryllium),
                )],
            )
            .unwrap();

        let lattice = arena
            .add_lattice(
                HexLattice::new(
                    HexOrientation::PointyTop,
                    0.4089,
                    Point2d::ORIGIN,
                    vec![vec![pin], vec![pin]],
                    filler,
                )
                .unwrap(),
            )
            .unwrap();

        let hex = hexagonal_prism(
            HexOrientation::PointyTop,
            1.1,
            Point2d::ORIGIN,
            BoundaryKind::Transmission,
        )
        .unwrap();
        let root = arena
            .add_universe("assembly", vec![Cell::new("stack", hex, Fill::Lattice(lattice))])
            .unwrap();

        Fixture {
            arena,
            registry,
            root,
            pin_fuel,
            pin_gas,
        }
    }

    #[test]
    fn test_point_query_descends_into_lattice_tiles() {
        let f = lattice_fixture();
        let lattice = f.arena.lattices().next().unwrap().1.clone();

        // Center of a ring-1 tile lands in the pin's borehole.
        let tile = lattice.coord_center(HexCoord::new(1, 0));
        let hit = point_query(&f.arena, f.root, Point3d::new(tile.x, tile.y, 0.0)).unwrap();
        assert_eq!(hit.cell, f.pin_gas);
        assert_eq!(f.registry.name(hit.material), Some("Hydrogen STP"));

        // Offset past the borehole radius but inside the tile.
        let hit = point_query(
            &f.arena,
            f.root,
            Point3d::new(tile.x + 0.18, tile.y, 0.0),
        )
        .unwrap();
        assert_eq!(hit.cell, f.pin_fuel);
    }

    #[test]
    fn test_point_query_reports_unowned_points() {
        let f = lattice_fixture();
        // Outside the hexagonal prism nothing owns the point.
        let err = point_query(&f.arena, f.root, Point3d::new(50.0, 0.0, 0.0)).unwrap_err();
        assert!(matches!(err, ModelError::UnresolvedPoint { .. }));
    }

    #[test]
    fn test_instance_counts_follow_lattice_positions() {
        let f = lattice_fixture();
        let instances = enumerate_cell_instances(&f.arena, f.root).unwrap();

        // 7 declared positions plus one outer walk, 2 cells per pin universe
        // but the outer filler universe has 1, plus the root's own cell.
        let fuel_instances: Vec<_> =
            instances.iter().filter(|i| i.cell == f.pin_fuel).collect();
        assert_eq!(fuel_instances.len(), 7);
        assert_eq!(fuel_instances[0].instance, 0);
        assert_eq!(fuel_instances[6].instance, 6);

        let total: usize = instances.len();
        assert_eq!(total, 1 + 7 * 2 + 1);
    }

    #[test]
    fn test_boundary_surfaces_deduplicate_shared_arcs() {
        let mut registry = MaterialRegistry::new();
        let mut arena = ModelArena::new();
        let m = registry.register("Hydrogen STP");

        let wall = Arc::new(
            Surface::z_cylinder(Point2d::ORIGIN, 5.0)
                .unwrap()
                .with_boundary(BoundaryKind::Vacuum),
        );
        let split = Arc::new(Surface::z_plane(0.0));
        // Both cells reference the same tagged wall.
        let root = arena
            .add_universe(
                "halves",
                vec![
                    Cell::new(
                        "lower",
                        Region::negative(&wall) & Region::negative(&split),
                        Fill::Material(m),
                    ),
                    Cell::new(
                        "upper",
                        Region::negative(&wall) & Region::positive(&split),
                        Fill::Material(m),
                    ),
                ],
            )
            .unwrap();

        let tagged = boundary_surfaces(&arena, root).unwrap();
        assert_eq!(tagged.len(), 1);
        assert_eq!(tagged[0].boundary, BoundaryKind::Vacuum);
    }

    #[test]
    fn test_bounding_box_of_closed_universe() {
        let mut registry = MaterialRegistry::new();
        let mut arena = ModelArena::new();
        let m = registry.register("Hydrogen STP");

        let wall = Arc::new(Surface::z_cylinder(Point2d::new(1.0, 0.0), 2.0).unwrap());
        let top = Arc::new(Surface::z_plane(10.0));
        let bottom = Arc::new(Surface::z_plane(-10.0));
        let root = arena
            .add_universe(
                "can",
                vec![Cell::new(
                    "interior",
                    Region::negative(&wall) & Region::negative(&top) & Region::positive(&bottom),
                    Fill::Material(m),
                )],
            )
            .unwrap();

        let bb = bounding_box(&arena, root).unwrap();
        assert!((bb.min.x + 1.0).abs() < 1e-12);
        assert!((bb.max.x - 3.0).abs() < 1e-12);
        assert!((bb.min.z + 10.0).abs() < 1e-12);
        assert!((bb.max.z - 10.0).abs() < 1e-12);
    }
}
