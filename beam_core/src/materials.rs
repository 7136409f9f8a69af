//! # Materials
//!
//! The closed set of beam materials. Each material is bound to fixed
//! elastic modulus and yield stress constants; there is no material database
//! lookup and no user-defined material.
//!
//! | Material | E (Pa) | Yield (Pa) |
//! |----------|--------|------------|
//! | Steel    | 200e9  | 250e6      |
//! | Concrete | 30e9   | 40e6       |
//! | Wood     | 11e9   | 35e6       |
//!
//! ## Example
//!
//! ```rust
//! use beam_core::materials::Material;
//!
//! let props = Material::Steel.properties();
//! assert_eq!(props.youngs_modulus_pa, 200e9);
//! assert_eq!(props.yield_stress_pa, 250e6);
//! ```

use serde::{Deserialize, Serialize};

/// Mechanical constants used by the solver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialProperties {
    /// Young's modulus E (Pa)
    pub youngs_modulus_pa: f64,
    /// Yield stress used for the safety factor (Pa)
    pub yield_stress_pa: f64,
}

/// Beam material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Material {
    #[default]
    Steel,
    Concrete,
    Wood,
}

impl Material {
    /// All materials in display order
    pub const ALL: [Material; 3] = [Material::Steel, Material::Concrete, Material::Wood];

    /// Fixed mechanical constants for this material
    pub fn properties(self) -> MaterialProperties {
        match self {
            Material::Steel => MaterialProperties {
                youngs_modulus_pa: 200e9,
                yield_stress_pa: 250e6,
            },
            Material::Concrete => MaterialProperties {
                youngs_modulus_pa: 30e9,
                yield_stress_pa: 40e6,
            },
            Material::Wood => MaterialProperties {
                youngs_modulus_pa: 11e9,
                yield_stress_pa: 35e6,
            },
        }
    }

    /// Display name
    pub fn display_name(self) -> &'static str {
        match self {
            Material::Steel => "Steel",
            Material::Concrete => "Concrete",
            Material::Wood => "Wood",
        }
    }
}
