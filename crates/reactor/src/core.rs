//! Core-level composition: the element lattice, the concentric inner
//! reflector, the twelve-drum outer reflector, and the bounded full core.

use std::sync::Arc;

use tracing::{info, instrument};

use csg_kernel::{
    BoundaryKind, BoundingBox, HexOrientation, Point2d, Point3d, Region, Surface, Vec2,
    azimuthal_wedge, replicate_n_fold,
};
use csg_model::{
    Cell, Fill, HexLattice, MaterialRegistry, ModelArena, PartitionCheck, UniverseId,
};

use crate::config::{CoreConfig, CoreLatticeConfig, DrumConfig, LatticeSlot, ReflectorConfig};
use crate::{BuildError, CoreMaterials, beryllium_assembly, fuel_assembly, tie_tube};

fn axis_cylinder(radius: f64) -> Result<Arc<Surface>, BuildError> {
    Ok(Arc::new(Surface::z_cylinder(Point2d::ORIGIN, radius)?))
}

/// The core lattice: ring patterns of the three element kinds over the
/// shared element universes, trimmed by the core-boundary cylinder. The
/// filler element backs every position past the declared rings.
#[instrument(skip(arena, config), fields(rings = config.rings.len()))]
pub fn core_lattice(
    arena: &mut ModelArena,
    fuel: UniverseId,
    tie_tube: UniverseId,
    filler: UniverseId,
    config: &CoreLatticeConfig,
) -> Result<UniverseId, BuildError> {
    let slot = |s: &LatticeSlot| match s {
        LatticeSlot::Fuel => fuel,
        LatticeSlot::TieTube => tie_tube,
        LatticeSlot::Filler => filler,
    };
    let rings = config
        .rings
        .iter()
        .map(|pattern| pattern.iter().map(slot).collect())
        .collect();
    let lattice = arena.add_lattice(HexLattice::new(
        HexOrientation::PointyTop,
        config.pitch,
        Point2d::ORIGIN,
        rings,
        filler,
    )?)?;

    let core_wall = axis_cylinder(config.core_radius)?;
    let id = arena.add_universe(
        "core_lattice",
        vec![Cell::new(
            "lattised_core",
            Region::negative(&core_wall),
            Fill::Lattice(lattice),
        )],
    )?;
    Ok(id)
}

/// Concentric shells around the core: coolant gap, steel wrapper, gap,
/// beryllium barrel, gap out to the drum annulus.
#[instrument(skip(arena, materials, config))]
pub fn inner_reflector(
    arena: &mut ModelArena,
    core: UniverseId,
    materials: &CoreMaterials,
    config: &ReflectorConfig,
) -> Result<UniverseId, BuildError> {
    let core_wall = axis_cylinder(config.core_radius)?;
    let first_gap = axis_cylinder(config.first_gap_radius)?;
    let wrapper = axis_cylinder(config.wrapper_radius)?;
    let second_gap = axis_cylinder(config.second_gap_radius)?;
    let barrel = axis_cylinder(config.barrel_radius)?;
    let third_gap = axis_cylinder(config.third_gap_radius)?;

    let id = arena.add_universe(
        "inner_reflector",
        vec![
            Cell::new("core", Region::negative(&core_wall), Fill::Universe(core)),
            Cell::new(
                "core_gap",
                Region::positive(&core_wall) & Region::negative(&first_gap),
                Fill::Material(materials.propellant),
            ),
            Cell::new(
                "wrapper",
                Region::positive(&first_gap) & Region::negative(&wrapper),
                Fill::Material(materials.wrapper),
            ),
            Cell::new(
                "wrapper_gap",
                Region::positive(&wrapper) & Region::negative(&second_gap),
                Fill::Material(materials.propellant),
            ),
            Cell::new(
                "barrel",
                Region::positive(&second_gap) & Region::negative(&barrel),
                Fill::Material(materials.reflector),
            ),
            Cell::new(
                "barrel_gap",
                Region::positive(&barrel) & Region::negative(&third_gap),
                Fill::Material(materials.propellant),
            ),
        ],
    )?;
    Ok(id)
}

/// The outer reflector annulus: one drum sector (drum body, poison arc at
/// the configured insertion angle, tie-bolts) replicated around the axis
/// and embedded in bulk reflector.
///
/// The seed sector sits on the +x axis; replication produces evenly spaced
/// copies, so the sector itself must describe exactly one drum.
#[instrument(skip(arena, materials, config), fields(insertion = config.insertion_angle_degrees))]
pub fn control_drum_reflector(
    arena: &mut ModelArena,
    materials: &CoreMaterials,
    config: &DrumConfig,
) -> Result<UniverseId, BuildError> {
    let inner = axis_cylinder(config.inner_radius)?;
    let outer = axis_cylinder(config.outer_radius)?;

    let offset = Vec2::new(config.drum_center_radius, 0.0);
    let drum_body = axis_cylinder(config.drum_radius)?;
    let poison_inner = axis_cylinder(config.drum_radius - config.poison_thickness)?;

    let half_arc = config.poison_arc_degrees / 2.0;
    let arc = azimuthal_wedge(
        config.insertion_angle_degrees - half_arc,
        config.insertion_angle_degrees + half_arc,
    )?;
    let poison_seed = (Region::negative(&drum_body)
        & Region::positive(&poison_inner)
        & arc)
        .translate(offset);
    let drum_seed = Region::negative(&drum_body).translate(offset);

    let poison = replicate_n_fold(&poison_seed, config.count)?;
    let drums = replicate_n_fold(&drum_seed, config.count)?;

    let mut cells = vec![
        Cell::new("poison_vanes", poison.clone(), Fill::Material(materials.poison)),
        Cell::new(
            "drum_bodies",
            drums.clone() & !poison,
            Fill::Material(materials.reflector),
        ),
    ];

    let mut bulk = Region::positive(&inner) & Region::negative(&outer) & !drums;
    for (i, bolt) in config.bolts.iter().enumerate() {
        let center = Point2d::ORIGIN
            + Vec2::from_angle_degrees(bolt.angle_degrees) * bolt.center_radius;
        let shank = Arc::new(Surface::z_cylinder(center, bolt.diameter / 2.0)?);
        let all = replicate_n_fold(&Region::negative(&shank), config.count)?;
        bulk = bulk & !all.clone();
        cells.push(Cell::new(
            format!("tie_bolts_{i}"),
            all,
            Fill::Material(materials.structural),
        ));
    }
    cells.push(Cell::new(
        "bulk_reflector",
        bulk,
        Fill::Material(materials.reflector),
    ));

    // Drum and bolt placement is free configuration, so the sector cells
    // are not disjoint by construction; sample the annulus cross-section
    // before inserting. The geometry is z-invariant, a thin slab suffices.
    let extent = Region::positive(&inner) & Region::negative(&outer);
    let check = PartitionCheck::new(
        32_768,
        BoundingBox::new(
            Point3d::new(-config.outer_radius, -config.outer_radius, -1.0),
            Point3d::new(config.outer_radius, config.outer_radius, 1.0),
        ),
    )
    .with_extent(extent);
    let id = arena.add_universe_checked("control_drum_reflector", cells, &check)?;
    Ok(id)
}

/// The assembled model: arena plus the root universe.
#[derive(Debug)]
pub struct CoreModel {
    pub arena: ModelArena,
    pub root: UniverseId,
}

/// Bound the inner reflector and drum annulus by the outer cylinder and
/// two axial planes, each carrying its configured boundary condition.
#[instrument(skip(arena, config))]
pub fn full_core(
    arena: &mut ModelArena,
    inner: UniverseId,
    drums: UniverseId,
    config: &CoreConfig,
) -> Result<UniverseId, BuildError> {
    let split = axis_cylinder(config.drums.inner_radius)?;
    let outer = Arc::new(
        Surface::z_cylinder(Point2d::ORIGIN, config.boundary.outer_radius)?
            .with_boundary(config.boundary.radial),
    );
    let top = Arc::new(
        Surface::z_plane(config.boundary.height / 2.0).with_boundary(config.boundary.axial),
    );
    let bottom = Arc::new(
        Surface::z_plane(-config.boundary.height / 2.0).with_boundary(config.boundary.axial),
    );
    let slab = Region::negative(&top) & Region::positive(&bottom);

    let id = arena.add_universe(
        "full_core",
        vec![
            Cell::new(
                "inner_region",
                Region::negative(&split) & slab.clone(),
                Fill::Universe(inner),
            ),
            Cell::new(
                "drum_region",
                Region::positive(&split) & Region::negative(&outer) & slab,
                Fill::Universe(drums),
            ),
        ],
    )?;
    Ok(id)
}

/// Build the whole core bottom-up from named materials and configuration.
#[instrument(skip(registry, config), fields(
    height = config.boundary.height,
    insertion = config.drums.insertion_angle_degrees,
))]
pub fn build_snre_core(
    registry: &MaterialRegistry,
    config: &CoreConfig,
) -> Result<CoreModel, BuildError> {
    let materials = CoreMaterials::lookup(registry)?;
    let mut arena = ModelArena::new();

    let fuel = fuel_assembly(
        &mut arena,
        &materials,
        &config.fuel,
        BoundaryKind::Transmission,
    )?;
    let tie = tie_tube(&mut arena, &materials, &config.tie_tube)?;
    let filler = beryllium_assembly(&mut arena, &materials, &config.filler)?;

    let core = core_lattice(&mut arena, fuel, tie, filler, &config.lattice)?;
    let inner = inner_reflector(&mut arena, core, &materials, &config.reflector)?;
    let drums = control_drum_reflector(&mut arena, &materials, &config.drums)?;
    let root = full_core(&mut arena, inner, drums, config)?;

    arena.validate_acyclic(root)?;
    info!("core model assembled");
    Ok(CoreModel { arena, root })
}
