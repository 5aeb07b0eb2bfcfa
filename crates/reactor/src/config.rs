//! Dimensional configuration for the SNRE core builders.
//!
//! Defaults carry the published small-engine values (Schnitzler 2007/2012),
//! in centimeters. Every builder takes its dimensions from here rather than
//! from literals, so variant cores are a matter of editing a config value.

use serde::{Deserialize, Serialize};

use csg_kernel::BoundaryKind;

/// Fuel element: a hexagonal graphite prism drilled with 19 axial
/// propellant channels on a triangular pitch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuelAssemblyConfig {
    pub channel_diameter: f64,
    pub channel_clad_thickness: f64,
    pub channel_pitch: f64,
    pub clad_thickness: f64,
    pub flat_to_flat: f64,
}

impl Default for FuelAssemblyConfig {
    fn default() -> Self {
        Self {
            channel_diameter: 0.2565,
            channel_clad_thickness: 0.01,
            channel_pitch: 0.4089,
            clad_thickness: 0.005,
            flat_to_flat: 1.905,
        }
    }
}

impl FuelAssemblyConfig {
    pub fn borehole_radius(&self) -> f64 {
        self.channel_diameter / 2.0
    }

    pub fn channel_liner_radius(&self) -> f64 {
        self.borehole_radius() - self.channel_clad_thickness
    }

    pub fn fuel_edge_length(&self) -> f64 {
        (self.flat_to_flat - self.clad_thickness) / 3.0f64.sqrt()
    }

    pub fn outer_edge_length(&self) -> f64 {
        self.flat_to_flat / 3.0f64.sqrt()
    }
}

/// Tie tube: nine concentric annuli (coolant, structure, gaps, moderator,
/// insulation) inside a graphite hex with a carbide clad ring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TieTubeConfig {
    pub inner_coolant_radius: f64,
    pub inner_tube_radius: f64,
    pub first_gap_radius: f64,
    pub moderator_radius: f64,
    pub second_gap_radius: f64,
    pub outer_tube_radius: f64,
    pub third_gap_radius: f64,
    pub insulator_radius: f64,
    pub fourth_gap_radius: f64,
    pub clad_thickness: f64,
    pub flat_to_flat: f64,
}

impl Default for TieTubeConfig {
    fn default() -> Self {
        Self {
            inner_coolant_radius: 0.20955,
            inner_tube_radius: 0.26035,
            first_gap_radius: 0.26670,
            moderator_radius: 0.58420,
            second_gap_radius: 0.67818,
            outer_tube_radius: 0.69850,
            third_gap_radius: 0.70485,
            insulator_radius: 0.80645,
            fourth_gap_radius: 0.81280,
            clad_thickness: 0.005,
            flat_to_flat: 1.905,
        }
    }
}

impl TieTubeConfig {
    pub fn inner_edge_length(&self) -> f64 {
        (self.flat_to_flat - 2.0 * self.clad_thickness) / 3.0f64.sqrt()
    }

    pub fn outer_edge_length(&self) -> f64 {
        self.flat_to_flat / 3.0f64.sqrt()
    }
}

/// Beryllium filler element: bulk hex with a carbide clad ring, used for
/// the outermost lattice ring and as the lattice outer fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillerAssemblyConfig {
    pub clad_thickness: f64,
    pub flat_to_flat: f64,
}

impl Default for FillerAssemblyConfig {
    fn default() -> Self {
        Self {
            clad_thickness: 0.005,
            flat_to_flat: 1.905,
        }
    }
}

impl FillerAssemblyConfig {
    pub fn inner_edge_length(&self) -> f64 {
        (self.flat_to_flat - 2.0 * self.clad_thickness) / 3.0f64.sqrt()
    }

    pub fn outer_edge_length(&self) -> f64 {
        self.flat_to_flat / 3.0f64.sqrt()
    }
}

/// What occupies one core-lattice position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LatticeSlot {
    Fuel,
    TieTube,
    Filler,
}

/// Core lattice layout: ring unit patterns (innermost first, tiled 6-fold)
/// over the three element kinds, inside the core-boundary cylinder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreLatticeConfig {
    pub pitch: f64,
    pub rings: Vec<Vec<LatticeSlot>>,
    pub core_radius: f64,
}

impl Default for CoreLatticeConfig {
    fn default() -> Self {
        // Center tie tube, then a 2:1 fuel/tie-tube mix out to ring 13,
        // then a ring of beryllium fillers trimming the lattice to the
        // core cylinder.
        let mut rings: Vec<Vec<LatticeSlot>> = vec![vec![LatticeSlot::TieTube]];
        for k in 1..14usize {
            rings.push(
                (0..k)
                    .map(|i| {
                        if i % 3 == 2 {
                            LatticeSlot::TieTube
                        } else {
                            LatticeSlot::Fuel
                        }
                    })
                    .collect(),
            );
        }
        rings.push(vec![LatticeSlot::Filler; 14]);
        Self {
            pitch: 1.905,
            rings,
            core_radius: 29.5275,
        }
    }
}

/// Concentric shells between the core boundary and the drum annulus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReflectorConfig {
    pub core_radius: f64,
    pub first_gap_radius: f64,
    pub wrapper_radius: f64,
    pub second_gap_radius: f64,
    pub barrel_radius: f64,
    pub third_gap_radius: f64,
}

impl Default for ReflectorConfig {
    fn default() -> Self {
        Self {
            core_radius: 29.5275,
            first_gap_radius: 29.8450,
            wrapper_radius: 30.1625,
            second_gap_radius: 30.48,
            barrel_radius: 33.3375,
            third_gap_radius: 33.655,
        }
    }
}

/// One tie-bolt of the drum sector. The diameters are carried over from
/// the source measurements but their placement is not authoritative;
/// treat these as example configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoltConfig {
    pub diameter: f64,
    pub center_radius: f64,
    pub angle_degrees: f64,
}

/// Control-drum annulus: twelve rotational copies of one sector (drum
/// body, poison arc, tie-bolts) in bulk reflector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrumConfig {
    pub count: u32,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub drum_radius: f64,
    pub drum_center_radius: f64,
    pub poison_arc_degrees: f64,
    pub poison_thickness: f64,
    /// Drum-local polar angle of the poison arc's bisector; 180 points the
    /// absorber at the core (fully inserted), 0 points it away.
    pub insertion_angle_degrees: f64,
    pub bolts: Vec<BoltConfig>,
}

impl Default for DrumConfig {
    fn default() -> Self {
        Self {
            count: 12,
            inner_radius: 33.655,
            outer_radius: 49.53,
            drum_radius: 6.35,
            drum_center_radius: 41.5925,
            poison_arc_degrees: 120.0,
            poison_thickness: 1.0,
            insertion_angle_degrees: 180.0,
            bolts: vec![
                BoltConfig {
                    diameter: 1.057,
                    center_radius: 35.0,
                    angle_degrees: 15.0,
                },
                BoltConfig {
                    diameter: 0.478,
                    center_radius: 48.5,
                    angle_degrees: 15.0,
                },
            ],
        }
    }
}

/// Outermost extent and boundary conditions of the assembled core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundaryConfig {
    pub height: f64,
    pub outer_radius: f64,
    pub radial: BoundaryKind,
    pub axial: BoundaryKind,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            height: 89.0,
            outer_radius: 49.53,
            radial: BoundaryKind::Vacuum,
            axial: BoundaryKind::Vacuum,
        }
    }
}

/// Top-level configuration consumed by `build_snre_core`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoreConfig {
    pub fuel: FuelAssemblyConfig,
    pub tie_tube: TieTubeConfig,
    pub filler: FillerAssemblyConfig,
    pub lattice: CoreLatticeConfig,
    pub reflector: ReflectorConfig,
    pub drums: DrumConfig,
    pub boundary: BoundaryConfig,
}
