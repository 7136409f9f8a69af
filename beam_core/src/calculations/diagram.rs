//! # Diagram Sampler
//!
//! Samples shear, moment and deflection at evenly spaced stations along the
//! span for plotting. Shear and moment come from the exact piecewise
//! distributions; deflection comes from the plot-only curves in
//! [`shapes`](crate::equations::shapes).
//!
//! Output units are display units: x in the configured length unit, shear
//! in kN, moment in kN·m (sagging positive), deflection in mm (downward
//! positive).

use serde::{Deserialize, Serialize};

use super::solver::BeamCase;
use super::AnalysisResult;
use crate::configuration::BeamConfiguration;
use crate::units::{Kilonewtons, Meters, Newtons};
use crate::validation::usable;

/// Index-aligned plot series, each `points + 1` long
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DiagramSeries {
    /// Stations along the span, configured length unit
    pub x: Vec<f64>,
    /// Shear (kN)
    pub shear: Vec<f64>,
    /// Bending moment (kN·m)
    pub moment: Vec<f64>,
    /// Deflection (mm)
    pub deflection: Vec<f64>,
}

impl DiagramSeries {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// No NaN or infinite values in any series
    pub fn is_finite(&self) -> bool {
        self.rows()
            .all(|(x, v, m, d)| x.is_finite() && v.is_finite() && m.is_finite() && d.is_finite())
    }

    /// Rows of (x, shear, moment, deflection)
    pub fn rows(&self) -> impl Iterator<Item = (f64, f64, f64, f64)> + '_ {
        self.x
            .iter()
            .zip(&self.shear)
            .zip(&self.moment)
            .zip(&self.deflection)
            .map(|(((x, v), m), d)| (*x, *v, *m, *d))
    }
}

/// Sample `points` intervals (`points + 1` stations) over the span.
///
/// The unsupported cell and invalid spans or loads give all-zero series.
/// Deflection is zero everywhere if the section stiffness is unusable.
pub fn sample(config: &BeamConfiguration, points: usize) -> DiagramSeries {
    let points = points.max(1);
    let request = config.resolve();
    let effective = &request.effective;
    let metric = effective.to_metric();

    let span = if usable(effective.length) { effective.length } else { 0.0 };
    let span_m = if usable(metric.length) { metric.length } else { 0.0 };
    let load_ok = usable(effective.load_value);

    let case = BeamCase::from_configuration(&metric);
    let active = span_m > 0.0 && load_ok && case.is_supported();

    let e = metric.material.properties().youngs_modulus_pa;
    let inertia = crate::equations::section_properties(metric.section_dimensions())
        .ok()
        .map(|s| s.moment_of_inertia)
        .filter(|i| usable(*i));

    let mut series = DiagramSeries {
        x: Vec::with_capacity(points + 1),
        shear: Vec::with_capacity(points + 1),
        moment: Vec::with_capacity(points + 1),
        deflection: Vec::with_capacity(points + 1),
    };

    for k in 0..=points {
        let t = k as f64 / points as f64;
        series.x.push(span * t);
        if !active {
            series.shear.push(0.0);
            series.moment.push(0.0);
            series.deflection.push(0.0);
            continue;
        }
        let x = span_m * t;
        series.shear.push(Kilonewtons::from(Newtons(case.shear_at(x))).0);
        // N·m -> kN·m uses the same factor as N -> kN
        series.moment.push(Kilonewtons::from(Newtons(case.moment_at(x))).0);
        let deflection = inertia.map(|i| case.deflection_at(x, e, i)).unwrap_or(0.0);
        series.deflection.push(Meters(deflection).millimeters());
    }

    tracing::debug!(stations = series.len(), ?case, "Sampled diagram");
    series
}

/// Sample for display, or `None` if `result` has an error-severity warning
/// or a sample is not finite
pub fn render_diagram(
    config: &BeamConfiguration,
    result: &AnalysisResult,
    points: usize,
) -> Option<DiagramSeries> {
    if result.has_errors() {
        tracing::debug!("Diagram suppressed by error warnings");
        return None;
    }
    let series = sample(config, points);
    if !series.is_finite() {
        tracing::warn!("Diagram suppressed: non-finite samples");
        return None;
    }
    Some(series)
}
