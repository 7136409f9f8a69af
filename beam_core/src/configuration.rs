//! # Beam Configuration
//!
//! [`BeamConfiguration`] is the single immutable input value of the engine.
//! It is created from user input or decoded from a share token, and is never
//! mutated by the solver: unit toggling and load-position clamping return new
//! values so the original request stays inspectable.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "length": 6.0,
//!   "material": "Steel",
//!   "section_shape": "Rectangular",
//!   "width": 0.25,
//!   "height": 0.4,
//!   "diameter": 0.3,
//!   "load_type": "PointLoad",
//!   "load_value": 50.0,
//!   "load_position": 3.0,
//!   "support_type": "SimplySupported",
//!   "unit_system": "Metric",
//!   "load_factor": 1.0,
//!   "deflection_limit": 360
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::materials::Material;
use crate::units::{Meters, UnitSystem};

/// Smallest allowed load factor
pub const MIN_LOAD_FACTOR: f64 = 0.5;

/// Largest allowed load factor
pub const MAX_LOAD_FACTOR: f64 = 2.5;

/// Default serviceability denominator (L/360)
pub const DEFAULT_DEFLECTION_LIMIT: u32 = 360;

/// Cross-section shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SectionShape {
    #[default]
    Rectangular,
    Circular,
}

impl SectionShape {
    pub fn display_name(self) -> &'static str {
        match self {
            SectionShape::Rectangular => "Rectangular",
            SectionShape::Circular => "Circular",
        }
    }
}

/// Load type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LoadType {
    /// Concentrated force (kN)
    #[default]
    PointLoad,
    /// Uniformly distributed load over the whole span (kN/m)
    UniformDistributed,
}

impl LoadType {
    pub fn display_name(self) -> &'static str {
        match self {
            LoadType::PointLoad => "Point Load",
            LoadType::UniformDistributed => "Uniform Distributed Load",
        }
    }

    /// Unit label of the load magnitude; independent of the unit system
    pub fn load_label(self) -> &'static str {
        match self {
            LoadType::PointLoad => "kN",
            LoadType::UniformDistributed => "kN/m",
        }
    }
}

/// Support condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SupportType {
    /// Pin at x = 0, roller at x = L
    #[default]
    SimplySupported,
    /// Fixed at x = 0, free at x = L
    Cantilever,
    /// Fixed at both x = 0 and x = L
    FixedBothEnds,
}

impl SupportType {
    pub fn display_name(self) -> &'static str {
        match self {
            SupportType::SimplySupported => "Simply Supported",
            SupportType::Cantilever => "Cantilever",
            SupportType::FixedBothEnds => "Fixed Both Ends",
        }
    }
}

/// Section dimensions relevant to the selected shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SectionDimensions {
    Rectangular { width: f64, height: f64 },
    Circular { diameter: f64 },
}

/// Complete input for one beam analysis.
///
/// Length-like fields (`length`, `width`, `height`, `diameter`,
/// `load_position`) are in the units of `unit_system`. `load_value` is
/// always kN (point) or kN/m (distributed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamConfiguration {
    /// Span between supports
    pub length: f64,

    pub material: Material,

    pub section_shape: SectionShape,

    /// Rectangular section width
    pub width: f64,

    /// Rectangular section height (bending depth)
    pub height: f64,

    /// Circular section diameter
    pub diameter: f64,

    pub load_type: LoadType,

    /// kN for a point load, kN/m for a distributed load
    pub load_value: f64,

    /// Distance of a point load from x = 0; ignored for distributed loads
    pub load_position: f64,

    pub support_type: SupportType,

    pub unit_system: UnitSystem,

    /// Ultimate-load amplification in [0.5, 2.5]
    #[serde(default = "default_load_factor")]
    pub load_factor: f64,

    /// Serviceability denominator: deflection must stay below L/limit
    #[serde(default = "default_deflection_limit")]
    pub deflection_limit: u32,
}

fn default_load_factor() -> f64 {
    1.0
}

fn default_deflection_limit() -> u32 {
    DEFAULT_DEFLECTION_LIMIT
}

impl Default for BeamConfiguration {
    fn default() -> Self {
        BeamConfiguration {
            length: 6.0,
            material: Material::Steel,
            section_shape: SectionShape::Rectangular,
            width: 0.25,
            height: 0.4,
            diameter: 0.3,
            load_type: LoadType::PointLoad,
            load_value: 50.0,
            load_position: 3.0,
            support_type: SupportType::SimplySupported,
            unit_system: UnitSystem::Metric,
            load_factor: default_load_factor(),
            deflection_limit: DEFAULT_DEFLECTION_LIMIT,
        }
    }
}

/// A configuration together with the copy the solver actually uses.
///
/// `effective` has its load position clamped into `[0, length]` and its
/// load factor clamped into `[MIN_LOAD_FACTOR, MAX_LOAD_FACTOR]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRequest {
    pub original: BeamConfiguration,
    pub effective: BeamConfiguration,
}

impl ResolvedRequest {
    pub fn position_clamped(&self) -> bool {
        !same_value(self.original.load_position, self.effective.load_position)
    }

    pub fn load_factor_clamped(&self) -> bool {
        !same_value(self.original.load_factor, self.effective.load_factor)
    }
}

fn same_value(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

impl BeamConfiguration {
    /// Dimensions of the selected section shape, in configured units
    pub fn section_dimensions(&self) -> SectionDimensions {
        match self.section_shape {
            SectionShape::Rectangular => SectionDimensions::Rectangular {
                width: self.width,
                height: self.height,
            },
            SectionShape::Circular => SectionDimensions::Circular {
                diameter: self.diameter,
            },
        }
    }

    /// Span in meters regardless of the unit system
    pub fn length_m(&self) -> Meters {
        self.unit_system.to_meters(self.length)
    }

    /// Return a copy expressed in `target` units.
    ///
    /// Every length-like field is converted (including the load position);
    /// the load magnitude is not.
    pub fn with_unit_system(&self, target: UnitSystem) -> BeamConfiguration {
        if target == self.unit_system {
            return self.clone();
        }
        let from = self.unit_system;
        let convert = |v: f64| target.from_meters(from.to_meters(v));
        BeamConfiguration {
            length: convert(self.length),
            width: convert(self.width),
            height: convert(self.height),
            diameter: convert(self.diameter),
            load_position: convert(self.load_position),
            unit_system: target,
            ..self.clone()
        }
    }

    /// Switch Metric <-> Imperial
    pub fn toggle_units(&self) -> BeamConfiguration {
        self.with_unit_system(self.unit_system.toggled())
    }

    /// Copy in meters, the solver's base unit
    pub fn to_metric(&self) -> BeamConfiguration {
        self.with_unit_system(UnitSystem::Metric)
    }

    /// Clamp the load position and load factor without touching `self`.
    pub fn resolve(&self) -> ResolvedRequest {
        let upper = if self.length.is_finite() && self.length > 0.0 {
            self.length
        } else {
            0.0
        };
        let load_position = clamp_or(self.load_position, 0.0, upper, 0.0);
        let load_factor = clamp_or(self.load_factor, MIN_LOAD_FACTOR, MAX_LOAD_FACTOR, 1.0);

        ResolvedRequest {
            original: self.clone(),
            effective: BeamConfiguration {
                load_position,
                load_factor,
                ..self.clone()
            },
        }
    }
}

/// `f64::clamp` that maps NaN to `fallback` instead of propagating it
fn clamp_or(value: f64, min: f64, max: f64, fallback: f64) -> f64 {
    if value.is_nan() {
        fallback.clamp(min, max)
    } else {
        value.clamp(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel_close(a: f64, b: f64) -> bool {
        if b == 0.0 {
            a.abs() < 1e-12
        } else {
            ((a - b) / b).abs() < 1e-6
        }
    }

    #[test]
    fn test_default_configuration() {
        let c = BeamConfiguration::default();
        assert_eq!(c.length, 6.0);
        assert_eq!(c.material, Material::Steel);
        assert_eq!(c.load_type, LoadType::PointLoad);
        assert_eq!(c.load_position, 3.0);
        assert_eq!(c.support_type, SupportType::SimplySupported);
        assert_eq!(c.deflection_limit, 360);
    }

    #[test]
    fn test_toggle_twice_restores_lengths() {
        let c = BeamConfiguration {
            length: 7.3,
            width: 0.21,
            height: 0.47,
            diameter: 0.33,
            load_position: 2.9,
            ..Default::default()
        };
        let imperial = c.toggle_units();
        assert_eq!(imperial.unit_system, UnitSystem::Imperial);
        assert!(rel_close(imperial.length, 7.3 * 3.28084));

        let back = imperial.toggle_units();
        assert_eq!(back.unit_system, UnitSystem::Metric);
        assert!(rel_close(back.length, c.length));
        assert!(rel_close(back.width, c.width));
        assert!(rel_close(back.height, c.height));
        assert!(rel_close(back.diameter, c.diameter));
        assert!(rel_close(back.load_position, c.load_position));
    }

    #[test]
    fn test_toggle_leaves_load_untouched() {
        let c = BeamConfiguration::default();
        let imperial = c.toggle_units();
        assert_eq!(imperial.load_value, c.load_value);
        assert_eq!(imperial.load_factor, c.load_factor);
    }

    #[test]
    fn test_length_m_from_imperial() {
        let c = BeamConfiguration::default().toggle_units();
        assert!(rel_close(c.length_m().0, 6.0));
    }

    #[test]
    fn test_resolve_clamps_position_without_mutating() {
        let c = BeamConfiguration {
            load_position: 9.0,
            ..Default::default()
        };
        let resolved = c.resolve();
        assert_eq!(resolved.original.load_position, 9.0);
        assert_eq!(resolved.effective.load_position, 6.0);
        assert!(resolved.position_clamped());
        assert_eq!(c.load_position, 9.0);

        let negative = BeamConfiguration {
            load_position: -1.0,
            ..Default::default()
        };
        assert_eq!(negative.resolve().effective.load_position, 0.0);
    }

    #[test]
    fn test_resolve_in_range_is_identity() {
        let c = BeamConfiguration::default();
        let resolved = c.resolve();
        assert_eq!(resolved.effective, c);
        assert!(!resolved.position_clamped());
        assert!(!resolved.load_factor_clamped());
    }

    #[test]
    fn test_resolve_handles_nan_and_bad_length() {
        let c = BeamConfiguration {
            load_position: f64::NAN,
            load_factor: 7.0,
            ..Default::default()
        };
        let resolved = c.resolve();
        assert_eq!(resolved.effective.load_position, 0.0);
        assert_eq!(resolved.effective.load_factor, MAX_LOAD_FACTOR);
        assert!(resolved.position_clamped());
        assert!(resolved.load_factor_clamped());

        let no_span = BeamConfiguration {
            length: -2.0,
            ..Default::default()
        };
        assert_eq!(no_span.resolve().effective.load_position, 0.0);
    }

    #[test]
    fn test_section_dimensions() {
        let rect = BeamConfiguration::default();
        assert_eq!(
            rect.section_dimensions(),
            SectionDimensions::Rectangular { width: 0.25, height: 0.4 }
        );
        let circ = BeamConfiguration {
            section_shape: SectionShape::Circular,
            ..Default::default()
        };
        assert_eq!(circ.section_dimensions(), SectionDimensions::Circular { diameter: 0.3 });
    }

    #[test]
    fn test_serde_defaults_for_optional_fields() {
        let json = r#"{
            "length": 4.0, "material": "Wood", "section_shape": "Circular",
            "width": 0.1, "height": 0.2, "diameter": 0.15,
            "load_type": "UniformDistributed", "load_value": 2.0, "load_position": 0.0,
            "support_type": "Cantilever", "unit_system": "Metric"
        }"#;
        let c: BeamConfiguration = serde_json::from_str(json).unwrap();
        assert_eq!(c.load_factor, 1.0);
        assert_eq!(c.deflection_limit, DEFAULT_DEFLECTION_LIMIT);
        assert_eq!(c.support_type, SupportType::Cantilever);
    }
}
