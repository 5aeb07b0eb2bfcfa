//! Builders for a small nuclear thermal rocket core: hexagonal fuel and
//! tie-tube elements composed into a drum-reflected cylindrical core.
//!
//! Each builder is a pure function from (materials, config) to a universe
//! in a [`csg_model::ModelArena`]; `build_snre_core` assembles the whole
//! hierarchy bottom-up.

use thiserror::Error;

use csg_kernel::GeometryError;
use csg_model::{MaterialError, MaterialRef, MaterialRegistry, ModelError};

pub mod assembly;
pub mod config;
pub mod core;

pub use assembly::{beryllium_assembly, fuel_assembly, tie_tube};
pub use config::{
    BoltConfig, BoundaryConfig, CoreConfig, CoreLatticeConfig, DrumConfig,
    FillerAssemblyConfig, FuelAssemblyConfig, LatticeSlot, ReflectorConfig, TieTubeConfig,
};
pub use self::core::{
    CoreModel, build_snre_core, control_drum_reflector, core_lattice, full_core,
    inner_reflector,
};

#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Material(#[from] MaterialError),
}

/// The named materials the core builders consume, resolved up front so a
/// missing name fails before any geometry is built.
#[derive(Debug, Clone, Copy)]
pub struct CoreMaterials {
    pub propellant: MaterialRef,
    pub clad: MaterialRef,
    pub fuel: MaterialRef,
    pub moderator: MaterialRef,
    pub structural: MaterialRef,
    pub insulator: MaterialRef,
    pub graphite: MaterialRef,
    pub reflector: MaterialRef,
    pub wrapper: MaterialRef,
    pub poison: MaterialRef,
}

impl CoreMaterials {
    pub fn lookup(registry: &MaterialRegistry) -> Result<Self, MaterialError> {
        Ok(Self {
            propellant: registry.lookup("Hydrogen STP")?,
            clad: registry.lookup("zirconium_carbide")?,
            fuel: registry.lookup("graphite_fuel_435U_30C")?,
            moderator: registry.lookup("zirconium_hydride_II")?,
            structural: registry.lookup("inconel-718")?,
            insulator: registry.lookup("zirconium_carbide_insulator")?,
            graphite: registry.lookup("graphite_carbon")?,
            reflector: registry.lookup("beryllium")?,
            wrapper: registry.lookup("SS316L")?,
            poison: registry.lookup("CuB_poison")?,
        })
    }

    /// Register the full material set into an empty registry, for tests and
    /// examples that do not carry an external material library.
    pub fn register_defaults(registry: &mut MaterialRegistry) -> Self {
        Self {
            propellant: registry.register("Hydrogen STP"),
            clad: registry.register("zirconium_carbide"),
            fuel: registry.register("graphite_fuel_435U_30C"),
            moderator: registry.register("zirconium_hydride_II"),
            structural: registry.register("inconel-718"),
            insulator: registry.register("zirconium_carbide_insulator"),
            graphite: registry.register("graphite_carbon"),
            reflector: registry.register("beryllium"),
            wrapper: registry.register("SS316L"),
            poison: registry.register("CuB_poison"),
        }
    }
}
