//! # Beam Analysis
//!
//! Everything derived from a [`BeamConfiguration`]:
//!
//! - [`solver`] - extreme values and the safety/serviceability checks
//! - [`diagram`] - sampled shear, moment and deflection series for plotting
//!
//! Results are recomputed in full on every configuration change; nothing
//! here keeps state between calls.
//!
//! ## Example
//!
//! ```rust
//! use beam_core::calculations::evaluate;
//! use beam_core::configuration::BeamConfiguration;
//! use beam_core::settings::AnalysisSettings;
//!
//! let evaluation = evaluate(&BeamConfiguration::default(), &AnalysisSettings::default());
//! assert!(evaluation.diagram.is_some());
//! println!("{}", serde_json::to_string_pretty(&evaluation).unwrap());
//! ```

pub mod diagram;
pub mod solver;

use serde::{Deserialize, Serialize};

use crate::configuration::BeamConfiguration;
use crate::equations::registry::Equation;
use crate::report::ConfigurationSummary;
use crate::settings::AnalysisSettings;
use crate::validation::{has_errors, Warning, WarningCode};

pub use diagram::{render_diagram, sample, DiagramSeries};
pub use solver::{solve, BeamCase};

/// Output of [`solve`]. All values are SI base units unless named otherwise.
///
/// ## JSON Example
///
/// ```json
/// {
///   "deflection_max_m": 0.00253,
///   "shear_max_n": 25000.0,
///   "moment_max_nm": 75000.0,
///   "safety_factor": 22.22,
///   "deflection_ratio": 2370.4,
///   "serviceability_pass": true,
///   "warnings": []
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    // === Demand ===
    /// Peak deflection (m), zero when the section stiffness is unusable
    pub deflection_max_m: f64,

    /// Peak absolute shear (N)
    pub shear_max_n: f64,

    /// Peak absolute bending moment (N·m)
    pub moment_max_nm: f64,

    // === Section ===
    /// Moment of inertia (m⁴), zero when the dimensions are invalid
    pub moment_of_inertia_m4: f64,

    /// Section modulus (m³), zero when the dimensions are invalid
    pub section_modulus_m3: f64,

    // === Strength ===
    /// Extreme-fiber bending stress M/Z (Pa)
    #[serde(with = "crate::units::unbounded")]
    pub bending_stress_pa: f64,

    /// Yield stress / bending stress, or zero if stress is zero or undefined
    pub safety_factor: f64,

    /// Bending stress / yield stress
    #[serde(with = "crate::units::unbounded")]
    pub utilization_flexure: f64,

    // === Serviceability ===
    /// L/δ; infinite (`null` in JSON) when there is no deflection
    #[serde(with = "crate::units::unbounded")]
    pub deflection_ratio: f64,

    /// `deflection_ratio >= deflection_limit`
    pub serviceability_pass: bool,

    /// deflection_limit / deflection_ratio
    #[serde(with = "crate::units::unbounded")]
    pub utilization_deflection: f64,

    // === Effective request ===
    /// Load position actually used, in configured length units
    pub load_position: f64,

    /// Load factor actually used
    pub load_factor: f64,

    /// Annotations, in the order they were raised
    pub warnings: Vec<Warning>,

    /// Equations applied to get these numbers
    pub equations: Vec<Equation>,
}

impl AnalysisResult {
    /// True if any warning blocks diagram rendering
    pub fn has_errors(&self) -> bool {
        has_errors(&self.warnings)
    }

    pub fn has_warning(&self, code: WarningCode) -> bool {
        self.warnings.iter().any(|w| w.code == code)
    }

    /// Strength and serviceability both pass, with no error warnings
    pub fn passes(&self) -> bool {
        !self.has_errors() && self.safety_factor >= 1.0 && self.serviceability_pass
    }
}

/// Everything a report or export consumer needs for one configuration.
///
/// `diagram` is `None` whenever `result` carries an error-severity warning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub configuration_summary: ConfigurationSummary,
    pub result: AnalysisResult,
    pub diagram: Option<DiagramSeries>,
}

/// Solve, then sample diagrams if the result allows it
pub fn evaluate(config: &BeamConfiguration, settings: &AnalysisSettings) -> Evaluation {
    let result = solve(config, settings);
    let diagram = render_diagram(config, &result, settings.diagram_intervals());
    Evaluation {
        configuration_summary: ConfigurationSummary::from_configuration(config),
        result,
        diagram,
    }
}
