//! The three element kinds tiled by the core lattice: fuel assemblies,
//! tie tubes, and beryllium fillers. All share the 1.905 cm flat-to-flat
//! hex footprint; radial structure is annular about the element axis.

use std::sync::Arc;

use tracing::instrument;

use csg_kernel::{
    BoundaryKind, HexOrientation, Point2d, Region, Surface, hexagonal_prism,
};
use csg_model::{Cell, Fill, HexLattice, ModelArena, UniverseId};

use crate::config::{FillerAssemblyConfig, FuelAssemblyConfig, TieTubeConfig};
use crate::{BuildError, CoreMaterials};

fn axis_cylinder(radius: f64) -> Result<Arc<Surface>, BuildError> {
    Ok(Arc::new(Surface::z_cylinder(Point2d::ORIGIN, radius)?))
}

/// A hexagonal fuel element: 19 clad propellant channels on a triangular
/// pitch inside the fuel web, wrapped in a carbide clad ring.
///
/// `boundary` tags the outer hex faces; pass `Reflective` to study one
/// element as an infinite array.
#[instrument(skip(arena, materials, config))]
pub fn fuel_assembly(
    arena: &mut ModelArena,
    materials: &CoreMaterials,
    config: &FuelAssemblyConfig,
    boundary: BoundaryKind,
) -> Result<UniverseId, BuildError> {
    let borehole = axis_cylinder(config.borehole_radius())?;
    let liner = axis_cylinder(config.channel_liner_radius())?;

    let channel = arena.add_universe(
        "propellant_channel",
        vec![
            Cell::new(
                "propellant",
                Region::negative(&liner),
                Fill::Material(materials.propellant),
            ),
            Cell::new(
                "channel_liner",
                Region::positive(&liner) & Region::negative(&borehole),
                Fill::Material(materials.clad),
            ),
            Cell::new(
                "fuel_web",
                Region::positive(&borehole),
                Fill::Material(materials.fuel),
            ),
        ],
    )?;

    let fuel_hex = hexagonal_prism(
        HexOrientation::PointyTop,
        config.fuel_edge_length(),
        Point2d::ORIGIN,
        BoundaryKind::Transmission,
    )?;
    let bulk_fuel = arena.add_universe(
        "fuel_bulk",
        vec![Cell::new(
            "fuel_bulk",
            fuel_hex.clone(),
            Fill::Material(materials.fuel),
        )],
    )?;

    // 1 + 6 + 12 channels; every position holds the same channel universe.
    let channel_lattice = arena.add_lattice(HexLattice::new(
        HexOrientation::PointyTop,
        config.channel_pitch,
        Point2d::ORIGIN,
        vec![vec![channel], vec![channel], vec![channel, channel]],
        bulk_fuel,
    )?)?;

    let outer_hex = hexagonal_prism(
        HexOrientation::PointyTop,
        config.outer_edge_length(),
        Point2d::ORIGIN,
        boundary,
    )?;
    let id = arena.add_universe(
        "fuel_assembly",
        vec![
            Cell::new(
                "channel_lattice",
                fuel_hex.clone(),
                Fill::Lattice(channel_lattice),
            ),
            Cell::new(
                "assembly_clad",
                !fuel_hex & outer_hex,
                Fill::Material(materials.clad),
            ),
        ],
    )?;
    Ok(id)
}

/// A tie tube element: nine concentric annuli (coolant paths, Inconel
/// tubes, hydride moderator, carbide insulation) in a graphite web, with
/// the shared hex clad ring.
#[instrument(skip(arena, materials, config))]
pub fn tie_tube(
    arena: &mut ModelArena,
    materials: &CoreMaterials,
    config: &TieTubeConfig,
) -> Result<UniverseId, BuildError> {
    let inner_coolant = axis_cylinder(config.inner_coolant_radius)?;
    let inner_tube = axis_cylinder(config.inner_tube_radius)?;
    let first_gap = axis_cylinder(config.first_gap_radius)?;
    let moderator = axis_cylinder(config.moderator_radius)?;
    let second_gap = axis_cylinder(config.second_gap_radius)?;
    let outer_tube = axis_cylinder(config.outer_tube_radius)?;
    let third_gap = axis_cylinder(config.third_gap_radius)?;
    let insulator = axis_cylinder(config.insulator_radius)?;
    let fourth_gap = axis_cylinder(config.fourth_gap_radius)?;

    let inner_hex = hexagonal_prism(
        HexOrientation::PointyTop,
        config.inner_edge_length(),
        Point2d::ORIGIN,
        BoundaryKind::Transmission,
    )?;
    let outer_hex = hexagonal_prism(
        HexOrientation::PointyTop,
        config.outer_edge_length(),
        Point2d::ORIGIN,
        BoundaryKind::Transmission,
    )?;

    let id = arena.add_universe(
        "tie_tube",
        vec![
            Cell::new(
                "inner_coolant",
                Region::negative(&inner_coolant),
                Fill::Material(materials.propellant),
            ),
            Cell::new(
                "inner_tie_tube",
                Region::positive(&inner_coolant) & Region::negative(&inner_tube),
                Fill::Material(materials.structural),
            ),
            Cell::new(
                "first_gap",
                Region::positive(&inner_tube) & Region::negative(&first_gap),
                Fill::Material(materials.propellant),
            ),
            Cell::new(
                "moderator_sleeve",
                Region::positive(&first_gap) & Region::negative(&moderator),
                Fill::Material(materials.moderator),
            ),
            Cell::new(
                "outer_coolant",
                Region::positive(&moderator) & Region::negative(&second_gap),
                Fill::Material(materials.propellant),
            ),
            Cell::new(
                "outer_tie_tube",
                Region::positive(&second_gap) & Region::negative(&outer_tube),
                Fill::Material(materials.structural),
            ),
            Cell::new(
                "third_gap",
                Region::positive(&outer_tube) & Region::negative(&third_gap),
                Fill::Material(materials.propellant),
            ),
            // The insulator starts at the gap boundary so the annuli stay
            // disjoint.
            Cell::new(
                "insulator_sleeve",
                Region::positive(&third_gap) & Region::negative(&insulator),
                Fill::Material(materials.insulator),
            ),
            Cell::new(
                "fourth_gap",
                Region::positive(&insulator) & Region::negative(&fourth_gap),
                Fill::Material(materials.propellant),
            ),
            Cell::new(
                "graphite_web",
                Region::positive(&fourth_gap) & inner_hex.clone(),
                Fill::Material(materials.graphite),
            ),
            Cell::new(
                "assembly_clad",
                !inner_hex & outer_hex,
                Fill::Material(materials.clad),
            ),
        ],
    )?;
    Ok(id)
}

/// A beryllium filler element: bulk reflector hex with the shared carbide
/// clad ring, used on the outermost lattice ring and as the lattice's
/// outer fallback.
#[instrument(skip(arena, materials, config))]
pub fn beryllium_assembly(
    arena: &mut ModelArena,
    materials: &CoreMaterials,
    config: &FillerAssemblyConfig,
) -> Result<UniverseId, BuildError> {
    let inner_hex = hexagonal_prism(
        HexOrientation::PointyTop,
        config.inner_edge_length(),
        Point2d::ORIGIN,
        BoundaryKind::Transmission,
    )?;
    let outer_hex = hexagonal_prism(
        HexOrientation::PointyTop,
        config.outer_edge_length(),
        Point2d::ORIGIN,
        BoundaryKind::Transmission,
    )?;
    let id = arena.add_universe(
        "beryllium_filler",
        vec![
            Cell::new(
                "filler_bulk",
                inner_hex.clone(),
                Fill::Material(materials.reflector),
            ),
            Cell::new(
                "assembly_clad",
                !inner_hex & outer_hex,
                Fill::Material(materials.clad),
            ),
        ],
    )?;
    Ok(id)
}
