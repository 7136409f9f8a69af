//! # Beam Solver
//!
//! Closed-form analysis of a single-span beam for every (support, load)
//! combination the engine knows about.
//!
//! ## Supported Cases
//!
//! | Support | Load | Deflection | Shear | Moment |
//! |---------|------|------------|-------|--------|
//! | Simply supported | Point at a | Pab(L²-ab)/(3EIL) | P·max(a,b)/L | Pab/L |
//! | Simply supported | UDL | 5wL⁴/(384EI) | wL/2 | wL²/8 |
//! | Cantilever | Point at free end | PL³/(3EI) | P | PL |
//! | Cantilever | UDL | wL⁴/(8EI) | wL | wL²/2 |
//! | Fixed both ends | UDL | wL⁴/(384EI) | wL/2 | wL²/12 |
//! | Fixed both ends | Point | not supported | | |
//!
//! The solver never fails: every problem with the input becomes a
//! [`Warning`](crate::validation::Warning) on the result.
//!
//! ## Example
//!
//! ```rust
//! use beam_core::calculations::solver::solve;
//! use beam_core::configuration::BeamConfiguration;
//! use beam_core::settings::AnalysisSettings;
//!
//! let result = solve(&BeamConfiguration::default(), &AnalysisSettings::default());
//! assert!((result.moment_max_nm - 75_000.0).abs() < 1e-6);
//! assert!((result.shear_max_n - 25_000.0).abs() < 1e-6);
//! assert!(result.warnings.is_empty());
//! ```

use serde::{Deserialize, Serialize};

use super::AnalysisResult;
use crate::configuration::{BeamConfiguration, LoadType, SectionShape, SupportType};
use crate::equations::beam::*;
use crate::equations::registry::Equation;
use crate::equations::shapes;
use crate::settings::AnalysisSettings;
use crate::validation::{
    factored_load, input_warnings, safety_warnings, section_warnings, usable, Warning,
    WarningCode,
};

/// One cell of the support × load table, with its loads in base units.
///
/// All lengths are meters, `p` is newtons and `w` is newtons per meter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "case")]
pub enum BeamCase {
    SimplySupportedPoint { p: f64, a: f64, l: f64 },
    SimplySupportedUniform { w: f64, l: f64 },
    /// Load assumed at the free end (x = L)
    CantileverPoint { p: f64, l: f64 },
    CantileverUniform { w: f64, l: f64 },
    FixedUniform { w: f64, l: f64 },
    /// No formula; always reported as `UNSUPPORTED`
    FixedPoint { l: f64 },
}

/// Peak absolute values of the internal forces, base units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Extremes {
    pub shear: f64,
    pub moment: f64,
    pub deflection: f64,
}

impl Extremes {
    /// Every peak is finite and non-negative
    pub fn is_finite(&self) -> bool {
        [self.shear, self.moment, self.deflection]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }
}

impl BeamCase {
    /// Select the cell for a metric, already-clamped configuration
    pub fn from_configuration(metric: &BeamConfiguration) -> BeamCase {
        let l = metric.length;
        let load = factored_load(metric).0;
        match (metric.support_type, metric.load_type) {
            (SupportType::SimplySupported, LoadType::PointLoad) => BeamCase::SimplySupportedPoint {
                p: load,
                a: metric.load_position,
                l,
            },
            (SupportType::SimplySupported, LoadType::UniformDistributed) => {
                BeamCase::SimplySupportedUniform { w: load, l }
            }
            (SupportType::Cantilever, LoadType::PointLoad) => BeamCase::CantileverPoint { p: load, l },
            (SupportType::Cantilever, LoadType::UniformDistributed) => {
                BeamCase::CantileverUniform { w: load, l }
            }
            (SupportType::FixedBothEnds, LoadType::UniformDistributed) => {
                BeamCase::FixedUniform { w: load, l }
            }
            (SupportType::FixedBothEnds, LoadType::PointLoad) => BeamCase::FixedPoint { l },
        }
    }

    pub fn span(&self) -> f64 {
        match *self {
            BeamCase::SimplySupportedPoint { l, .. }
            | BeamCase::SimplySupportedUniform { l, .. }
            | BeamCase::CantileverPoint { l, .. }
            | BeamCase::CantileverUniform { l, .. }
            | BeamCase::FixedUniform { l, .. }
            | BeamCase::FixedPoint { l } => l,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, BeamCase::FixedPoint { .. })
    }

    /// Peak shear, moment and deflection.
    ///
    /// `ei` is `None` when the section stiffness is unusable; deflection is
    /// then reported as zero. Returns `None` for the unsupported cell.
    pub fn extremes(&self, ei: Option<(f64, f64)>) -> Option<Extremes> {
        let deflect = |f: &dyn Fn(f64, f64) -> f64| ei.map(|(e, i)| f(e, i)).unwrap_or(0.0);
        let ext = match *self {
            BeamCase::SimplySupportedPoint { p, a, l } => Extremes {
                shear: simple_point_max_shear(p, a, l),
                moment: simple_point_max_moment(p, a, l),
                deflection: deflect(&|e, i| simple_point_max_deflection(p, a, l, e, i)),
            },
            BeamCase::SimplySupportedUniform { w, l } => Extremes {
                shear: simple_uniform_max_shear(w, l),
                moment: simple_uniform_max_moment(w, l),
                deflection: deflect(&|e, i| simple_uniform_max_deflection(w, l, e, i)),
            },
            BeamCase::CantileverPoint { p, l } => Extremes {
                shear: cantilever_point_shear(p),
                moment: cantilever_point_max_moment(p, l),
                deflection: deflect(&|e, i| cantilever_point_max_deflection(p, l, e, i)),
            },
            BeamCase::CantileverUniform { w, l } => Extremes {
                shear: cantilever_uniform_max_shear(w, l),
                moment: cantilever_uniform_max_moment(w, l),
                deflection: deflect(&|e, i| cantilever_uniform_max_deflection(w, l, e, i)),
            },
            BeamCase::FixedUniform { w, l } => Extremes {
                shear: fixed_uniform_max_shear(w, l),
                moment: fixed_uniform_max_moment(w, l),
                deflection: deflect(&|e, i| fixed_uniform_max_deflection(w, l, e, i)),
            },
            BeamCase::FixedPoint { .. } => return None,
        };
        Some(Extremes {
            shear: ext.shear.abs(),
            moment: ext.moment.abs(),
            deflection: ext.deflection.abs(),
        })
    }

    /// Shear (N) at `x`, sign per the beam convention
    pub fn shear_at(&self, x: f64) -> f64 {
        match *self {
            BeamCase::SimplySupportedPoint { p, a, l } => simple_point_shear(p, a, l, x),
            BeamCase::SimplySupportedUniform { w, l } => simple_uniform_shear(w, l, x),
            BeamCase::CantileverPoint { p, .. } => cantilever_point_shear(p),
            BeamCase::CantileverUniform { w, l } => cantilever_uniform_shear(w, l, x),
            BeamCase::FixedUniform { w, l } => fixed_uniform_shear(w, l, x),
            BeamCase::FixedPoint { .. } => 0.0,
        }
    }

    /// Moment (N·m) at `x`, sagging positive
    pub fn moment_at(&self, x: f64) -> f64 {
        match *self {
            BeamCase::SimplySupportedPoint { p, a, l } => simple_point_moment(p, a, l, x),
            BeamCase::SimplySupportedUniform { w, l } => simple_uniform_moment(w, l, x),
            BeamCase::CantileverPoint { p, l } => cantilever_point_moment(p, l, x),
            BeamCase::CantileverUniform { w, l } => cantilever_uniform_moment(w, l, x),
            BeamCase::FixedUniform { w, l } => fixed_uniform_moment(w, l, x),
            BeamCase::FixedPoint { .. } => 0.0,
        }
    }

    /// Plotting deflection (m) at `x`, positive downward
    pub fn deflection_at(&self, x: f64, e: f64, i: f64) -> f64 {
        match *self {
            BeamCase::SimplySupportedPoint { p, a, l } => shapes::simple_point_shape(p, a, l, x, e, i),
            BeamCase::SimplySupportedUniform { w, l } => shapes::simple_uniform_shape(w, l, x, e, i),
            BeamCase::CantileverPoint { p, l } => shapes::cantilever_point_shape(p, l, x, e, i),
            BeamCase::CantileverUniform { w, l } => shapes::cantilever_uniform_shape(w, l, x, e, i),
            BeamCase::FixedUniform { w, l } => shapes::fixed_uniform_shape(w, l, x, e, i),
            BeamCase::FixedPoint { .. } => 0.0,
        }
    }

    /// Closed-form equations this cell applies
    pub fn equations(&self) -> &'static [Equation] {
        match self {
            BeamCase::SimplySupportedPoint { .. } => &[
                Equation::SimplePointMaxShear,
                Equation::SimplePointMaxMoment,
                Equation::SimplePointMaxDeflection,
            ],
            BeamCase::SimplySupportedUniform { .. } => &[
                Equation::SimpleUniformMaxShear,
                Equation::SimpleUniformMaxMoment,
                Equation::SimpleUniformMaxDeflection,
            ],
            BeamCase::CantileverPoint { .. } => &[
                Equation::CantileverPointMaxShear,
                Equation::CantileverPointMaxMoment,
                Equation::CantileverPointMaxDeflection,
            ],
            BeamCase::CantileverUniform { .. } => &[
                Equation::CantileverUniformMaxShear,
                Equation::CantileverUniformMaxMoment,
                Equation::CantileverUniformMaxDeflection,
            ],
            BeamCase::FixedUniform { .. } => &[
                Equation::FixedUniformMaxShear,
                Equation::FixedUniformMaxMoment,
                Equation::FixedUniformMaxDeflection,
            ],
            BeamCase::FixedPoint { .. } => &[],
        }
    }
}

/// Analyse a configuration.
///
/// Pure: the same configuration and settings always give the same result.
/// The configuration is clamped on a copy; `config` itself is untouched.
pub fn solve(config: &BeamConfiguration, settings: &AnalysisSettings) -> AnalysisResult {
    let request = config.resolve();
    let mut warnings = input_warnings(&request, settings.num_scale_threshold);
    let inputs_valid = !warnings
        .iter()
        .any(|w| matches!(w.code, WarningCode::SpanInvalid | WarningCode::LoadInvalid));

    let metric = request.effective.to_metric();
    let material = metric.material.properties();

    let (section, section_issues) = section_warnings(metric.section_dimensions());
    warnings.extend(section_issues);
    let inertia = section.map(|s| s.moment_of_inertia).filter(|v| usable(*v));
    let modulus = section.map(|s| s.section_modulus).filter(|v| usable(*v));

    let case = BeamCase::from_configuration(&metric);
    let ei = inertia.map(|i| (material.youngs_modulus_pa, i));
    let mut extremes = if inputs_valid {
        case.extremes(ei).unwrap_or_default()
    } else {
        Extremes::default()
    };
    if !extremes.is_finite() {
        warnings.push(Warning::new(
            WarningCode::NonFinite,
            format!(
                "Results overflowed (shear {}, moment {}, deflection {}); reduce span or load",
                extremes.shear, extremes.moment, extremes.deflection
            ),
        ));
        extremes = Extremes::default();
    }

    let bending_stress_pa = match modulus {
        Some(z) => bending_stress(extremes.moment, z),
        None => 0.0,
    };
    let safety_factor = if bending_stress_pa > 0.0 && bending_stress_pa.is_finite() {
        material.yield_stress_pa / bending_stress_pa
    } else {
        0.0
    };
    warnings.extend(safety_warnings(safety_factor));

    let ratio = deflection_ratio(metric.length, extremes.deflection);
    let limit = f64::from(request.effective.deflection_limit);
    let utilization_deflection = if ratio.is_finite() && ratio > 0.0 {
        limit / ratio
    } else if ratio == 0.0 {
        f64::INFINITY
    } else {
        0.0
    };

    let mut equations = match metric.section_shape {
        SectionShape::Rectangular => vec![Equation::RectangularInertia, Equation::RectangularModulus],
        SectionShape::Circular => vec![Equation::CircularInertia, Equation::CircularModulus],
    };
    if case.is_supported() {
        equations.extend_from_slice(case.equations());
        equations.extend([
            Equation::BendingStress,
            Equation::SafetyFactor,
            Equation::DeflectionRatio,
        ]);
    }

    tracing::debug!(
        ?case,
        moment_nm = extremes.moment,
        shear_n = extremes.shear,
        deflection_m = extremes.deflection,
        warnings = warnings.len(),
        "Solved beam"
    );

    AnalysisResult {
        deflection_max_m: extremes.deflection,
        shear_max_n: extremes.shear,
        moment_max_nm: extremes.moment,
        moment_of_inertia_m4: section.map(|s| s.moment_of_inertia).unwrap_or(0.0),
        section_modulus_m3: section.map(|s| s.section_modulus).unwrap_or(0.0),
        bending_stress_pa,
        safety_factor,
        deflection_ratio: ratio,
        serviceability_pass: ratio >= limit,
        utilization_flexure: bending_stress_pa / material.yield_stress_pa,
        utilization_deflection,
        load_position: request.effective.load_position,
        load_factor: request.effective.load_factor,
        warnings,
        equations,
    }
}
