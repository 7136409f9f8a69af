//! # Validation and Warnings
//!
//! Two kinds of checks live here:
//!
//! - **Stage validation** ([`validate`], [`validate_through`]): blocking
//!   checks for the input stages. They return a list of
//!   [`CalcError`]s; an empty list means the stage is complete.
//! - **Computation warnings** ([`Warning`]): attached to every
//!   [`AnalysisResult`](crate::calculations::AnalysisResult). They never stop
//!   the solver. Any `Error` severity entry means diagrams must not be drawn.
//!
//! ## Warning Taxonomy
//!
//! | Code | Severity | Raised when |
//! |------|----------|-------------|
//! | `SPAN_INVALID` | error | length is not a positive number |
//! | `LOAD_INVALID` | error | load value is not a positive number |
//! | `LIMIT_INVALID` | error | deflection limit is zero |
//! | `SECTION_DIM` | error | a required section dimension is not positive |
//! | `I_ZERO` | error | computed moment of inertia is not positive |
//! | `Z_ZERO` | error | computed section modulus is not positive |
//! | `UNSUPPORTED` | error | fixed-both-ends beam with a point load |
//! | `POS_CLAMP` | warn | load position outside `[0, length]` |
//! | `FACTOR_CLAMP` | warn | load factor outside `[0.5, 2.5]` |
//! | `SF_ZERO` | warn | safety factor could not be evaluated |
//! | `SF_LOW` | warn | safety factor below 1.0 |
//! | `POINT_OFFSET` | info | cantilever point load not at the free end |
//! | `NUM_SCALE` | info | load × span⁴ exceeds the precision threshold |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::configuration::{
    BeamConfiguration, LoadType, ResolvedRequest, SectionDimensions, SupportType, MAX_LOAD_FACTOR,
    MIN_LOAD_FACTOR,
};
use crate::equations::section::{section_properties, SectionProperties};
use crate::errors::CalcError;
use crate::units::{Kilonewtons, Newtons};

// ============================================================================
// Warnings
// ============================================================================

/// Warning severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warn,
    Error,
}

/// Stable warning identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarningCode {
    SpanInvalid,
    LoadInvalid,
    LimitInvalid,
    SectionDim,
    IZero,
    ZZero,
    Unsupported,
    NonFinite,
    PosClamp,
    FactorClamp,
    SfZero,
    SfLow,
    PointOffset,
    NumScale,
}

impl WarningCode {
    /// Wire form of the code, e.g. `"POS_CLAMP"`
    pub fn as_str(self) -> &'static str {
        match self {
            WarningCode::SpanInvalid => "SPAN_INVALID",
            WarningCode::LoadInvalid => "LOAD_INVALID",
            WarningCode::LimitInvalid => "LIMIT_INVALID",
            WarningCode::SectionDim => "SECTION_DIM",
            WarningCode::IZero => "I_ZERO",
            WarningCode::ZZero => "Z_ZERO",
            WarningCode::Unsupported => "UNSUPPORTED",
            WarningCode::NonFinite => "NON_FINITE",
            WarningCode::PosClamp => "POS_CLAMP",
            WarningCode::FactorClamp => "FACTOR_CLAMP",
            WarningCode::SfZero => "SF_ZERO",
            WarningCode::SfLow => "SF_LOW",
            WarningCode::PointOffset => "POINT_OFFSET",
            WarningCode::NumScale => "NUM_SCALE",
        }
    }

    /// Severity attached to this code
    pub fn severity(self) -> Severity {
        match self {
            WarningCode::SpanInvalid
            | WarningCode::LoadInvalid
            | WarningCode::LimitInvalid
            | WarningCode::SectionDim
            | WarningCode::IZero
            | WarningCode::ZZero
            | WarningCode::Unsupported
            | WarningCode::NonFinite => Severity::Error,
            WarningCode::PosClamp
            | WarningCode::FactorClamp
            | WarningCode::SfZero
            | WarningCode::SfLow => Severity::Warn,
            WarningCode::PointOffset | WarningCode::NumScale => Severity::Info,
        }
    }
}

impl fmt::Display for WarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One annotation on an analysis result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    pub code: WarningCode,
    pub message: String,
    pub severity: Severity,
}

impl Warning {
    /// Create a warning with the code's own severity
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Warning {
            code,
            message: message.into(),
            severity: code.severity(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
        };
        write!(f, "[{}] {}: {}", tag, self.code, self.message)
    }
}

/// True if any warning has `Error` severity
pub fn has_errors(warnings: &[Warning]) -> bool {
    warnings.iter().any(Warning::is_error)
}

// ============================================================================
// Computation checks
// ============================================================================

/// Relative tolerance used to decide whether a point load sits at the free end
const POSITION_TOLERANCE: f64 = 1e-9;

/// Checks that only need the (clamped) request.
///
/// Order: span, load, limit, clamping, support/load combination, scale.
pub fn input_warnings(request: &ResolvedRequest, num_scale_threshold: f64) -> Vec<Warning> {
    let original = &request.original;
    let effective = &request.effective;
    let unit = effective.unit_system.length_label();
    let mut warnings = Vec::new();

    let span_ok = effective.length.is_finite() && effective.length > 0.0;
    if !span_ok {
        warnings.push(Warning::new(
            WarningCode::SpanInvalid,
            format!("Beam length must be positive (got {})", effective.length),
        ));
    }

    let load_ok = effective.load_value.is_finite() && effective.load_value > 0.0;
    if !load_ok {
        warnings.push(Warning::new(
            WarningCode::LoadInvalid,
            format!("Load value must be positive (got {})", effective.load_value),
        ));
    }

    if effective.deflection_limit == 0 {
        warnings.push(Warning::new(
            WarningCode::LimitInvalid,
            "Deflection limit denominator must be at least 1",
        ));
    }

    if request.position_clamped() {
        warnings.push(Warning::new(
            WarningCode::PosClamp,
            format!(
                "Load position {} {} is outside [0, {}] and was clamped to {} {}",
                original.load_position, unit, effective.length, effective.load_position, unit
            ),
        ));
    }

    if request.load_factor_clamped() {
        warnings.push(Warning::new(
            WarningCode::FactorClamp,
            format!(
                "Load factor {} is outside [{}, {}] and was clamped to {}",
                original.load_factor, MIN_LOAD_FACTOR, MAX_LOAD_FACTOR, effective.load_factor
            ),
        ));
    }

    match (effective.support_type, effective.load_type) {
        (SupportType::FixedBothEnds, LoadType::PointLoad) => {
            warnings.push(Warning::new(
                WarningCode::Unsupported,
                "Fixed-both-ends beams with a point load are not supported; no results computed",
            ));
        }
        (SupportType::Cantilever, LoadType::PointLoad) if span_ok => {
            let offset = (effective.length - effective.load_position).abs();
            if offset > POSITION_TOLERANCE * effective.length {
                warnings.push(Warning::new(
                    WarningCode::PointOffset,
                    format!(
                        "Cantilever point load at {} {} is assumed to act at the free end ({} {})",
                        effective.load_position, unit, effective.length, unit
                    ),
                ));
            }
        }
        _ => {}
    }

    if span_ok && load_ok {
        let magnitude = factored_load(effective).0 * effective.length_m().0.powi(4);
        if magnitude > num_scale_threshold {
            warnings.push(Warning::new(
                WarningCode::NumScale,
                format!(
                    "Load x span^4 = {:.3e} exceeds {:.3e}; results may lose precision",
                    magnitude, num_scale_threshold
                ),
            ));
        }
    }

    warnings
}

/// Factored load in base units: kN (or kN/m) × 1000 × load factor
pub fn factored_load(config: &BeamConfiguration) -> Newtons {
    Newtons::from(Kilonewtons(config.load_value)) * config.load_factor
}

/// Section geometry checks.
///
/// Returns the computed properties whenever the dimensions are positive.
/// `I_ZERO`/`Z_ZERO` cover positive dimensions whose properties still come
/// out unusable (underflow, overflow); callers test each property with
/// [`usable`] before dividing by it.
pub fn section_warnings(dims: SectionDimensions) -> (Option<SectionProperties>, Vec<Warning>) {
    let props = match section_properties(dims) {
        Ok(props) => props,
        Err(e) => {
            return (
                None,
                vec![Warning::new(WarningCode::SectionDim, e.to_string())],
            )
        }
    };

    let mut warnings = Vec::new();
    if !usable(props.moment_of_inertia) {
        warnings.push(Warning::new(
            WarningCode::IZero,
            format!("Moment of inertia is not usable ({})", props.moment_of_inertia),
        ));
    }
    if !usable(props.section_modulus) {
        warnings.push(Warning::new(
            WarningCode::ZZero,
            format!("Section modulus is not usable ({})", props.section_modulus),
        ));
    }
    (Some(props), warnings)
}

/// Finite and strictly positive
pub fn usable(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Safety factor checks: `SF_ZERO` when it could not be evaluated,
/// `SF_LOW` when the section yields.
pub fn safety_warnings(safety_factor: f64) -> Vec<Warning> {
    if safety_factor <= 0.0 || !safety_factor.is_finite() {
        vec![Warning::new(
            WarningCode::SfZero,
            "Safety factor could not be evaluated (no bending stress)",
        )]
    } else if safety_factor < 1.0 {
        vec![Warning::new(
            WarningCode::SfLow,
            format!(
                "Safety factor {:.2} is below 1.0: increase section / reduce load",
                safety_factor
            ),
        )]
    } else {
        Vec::new()
    }
}

// ============================================================================
// Stage validation
// ============================================================================

/// Input stages, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    SpanAndSupport,
    SectionAndMaterial,
    Loading,
    Results,
}

impl Stage {
    pub const ALL: [Stage; 4] = [
        Stage::SpanAndSupport,
        Stage::SectionAndMaterial,
        Stage::Loading,
        Stage::Results,
    ];

    /// 1-based step number
    pub fn number(self) -> u8 {
        match self {
            Stage::SpanAndSupport => 1,
            Stage::SectionAndMaterial => 2,
            Stage::Loading => 3,
            Stage::Results => 4,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Stage::SpanAndSupport => "Span & Support",
            Stage::SectionAndMaterial => "Section & Material",
            Stage::Loading => "Loading",
            Stage::Results => "Results",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Stage::SpanAndSupport => "Beam length, units & support conditions",
            Stage::SectionAndMaterial => "Geometry and material properties",
            Stage::Loading => "Define load magnitude & position",
            Stage::Results => "Review analysis & export report",
        }
    }

    fn next(self) -> Stage {
        match self {
            Stage::SpanAndSupport => Stage::SectionAndMaterial,
            Stage::SectionAndMaterial => Stage::Loading,
            Stage::Loading | Stage::Results => Stage::Results,
        }
    }

    /// Move to the next stage only if this one validates
    pub fn advance(self, config: &BeamConfiguration) -> Stage {
        if validate(config, self).is_empty() {
            self.next()
        } else {
            self
        }
    }

    /// Previous stage, never before the first
    pub fn back(self) -> Stage {
        match self {
            Stage::SpanAndSupport | Stage::SectionAndMaterial => Stage::SpanAndSupport,
            Stage::Loading => Stage::SectionAndMaterial,
            Stage::Results => Stage::Loading,
        }
    }
}

/// Blocking errors for a single stage
pub fn validate(config: &BeamConfiguration, stage: Stage) -> Vec<CalcError> {
    let mut errors = Vec::new();
    match stage {
        Stage::SpanAndSupport => {
            require_positive(&mut errors, "length", config.length, "Beam length must be positive");
        }
        Stage::SectionAndMaterial => match config.section_dimensions() {
            SectionDimensions::Rectangular { width, height } => {
                require_positive(&mut errors, "width", width, "Width must be positive");
                require_positive(&mut errors, "height", height, "Height must be positive");
            }
            SectionDimensions::Circular { diameter } => {
                require_positive(&mut errors, "diameter", diameter, "Diameter must be positive");
            }
        },
        Stage::Loading => {
            require_positive(&mut errors, "load_value", config.load_value, "Load must be positive");
            if config.load_type == LoadType::PointLoad
                && !(config.load_position >= 0.0 && config.load_position <= config.length)
            {
                errors.push(CalcError::invalid_input(
                    "load_position",
                    config.load_position.to_string(),
                    format!("Load position must be within 0 - {}", config.length),
                ));
            }
            if !(MIN_LOAD_FACTOR..=MAX_LOAD_FACTOR).contains(&config.load_factor) {
                errors.push(CalcError::invalid_input(
                    "load_factor",
                    config.load_factor.to_string(),
                    format!("Load factor must be within {} - {}", MIN_LOAD_FACTOR, MAX_LOAD_FACTOR),
                ));
            }
            if config.deflection_limit == 0 {
                errors.push(CalcError::invalid_input(
                    "deflection_limit",
                    "0",
                    "Deflection limit must be at least 1",
                ));
            }
        }
        Stage::Results => {}
    }
    errors
}

/// Blocking errors for every stage up to and including `stage`
pub fn validate_through(config: &BeamConfiguration, stage: Stage) -> Vec<CalcError> {
    Stage::ALL
        .iter()
        .filter(|s| **s <= stage)
        .flat_map(|s| validate(config, *s))
        .collect()
}

/// NaN is an empty input and reads as missing
fn require_positive(errors: &mut Vec<CalcError>, field: &str, value: f64, reason: &str) {
    if value.is_nan() {
        errors.push(CalcError::missing_field(field));
    } else if !(value.is_finite() && value > 0.0) {
        errors.push(CalcError::invalid_input(field, value.to_string(), reason));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::SectionShape;
    use crate::settings::DEFAULT_NUM_SCALE_THRESHOLD;

    fn codes(warnings: &[Warning]) -> Vec<WarningCode> {
        warnings.iter().map(|w| w.code).collect()
    }

    #[test]
    fn test_code_wire_format() {
        let json = serde_json::to_string(&WarningCode::PosClamp).unwrap();
        assert_eq!(json, "\"POS_CLAMP\"");
        assert_eq!(serde_json::to_string(&WarningCode::IZero).unwrap(), "\"I_ZERO\"");
        assert_eq!(serde_json::to_string(&WarningCode::SfZero).unwrap(), "\"SF_ZERO\"");
        assert_eq!(serde_json::to_string(&Severity::Warn).unwrap(), "\"warn\"");
        for code in [WarningCode::NumScale, WarningCode::PointOffset, WarningCode::ZZero] {
            let wire = serde_json::to_string(&code).unwrap();
            assert_eq!(wire, format!("\"{}\"", code.as_str()));
        }
    }

    #[test]
    fn test_default_configuration_is_clean() {
        let w = input_warnings(&BeamConfiguration::default().resolve(), DEFAULT_NUM_SCALE_THRESHOLD);
        assert!(w.is_empty(), "{:?}", w);
    }

    #[test]
    fn test_pos_clamp_warning() {
        let c = BeamConfiguration {
            load_position: 8.0,
            ..Default::default()
        };
        let w = input_warnings(&c.resolve(), DEFAULT_NUM_SCALE_THRESHOLD);
        assert_eq!(codes(&w), vec![WarningCode::PosClamp]);
        assert_eq!(w[0].severity, Severity::Warn);
    }

    #[test]
    fn test_unsupported_combination() {
        let c = BeamConfiguration {
            support_type: SupportType::FixedBothEnds,
            ..Default::default()
        };
        let w = input_warnings(&c.resolve(), DEFAULT_NUM_SCALE_THRESHOLD);
        assert!(codes(&w).contains(&WarningCode::Unsupported));
        assert!(has_errors(&w));
    }

    #[test]
    fn test_point_offset_only_for_cantilever() {
        let c = BeamConfiguration {
            support_type: SupportType::Cantilever,
            load_position: 2.0,
            ..Default::default()
        };
        let w = input_warnings(&c.resolve(), DEFAULT_NUM_SCALE_THRESHOLD);
        assert_eq!(codes(&w), vec![WarningCode::PointOffset]);
        assert_eq!(w[0].severity, Severity::Info);

        let at_end = BeamConfiguration {
            load_position: 6.0,
            ..c.clone()
        };
        assert!(input_warnings(&at_end.resolve(), DEFAULT_NUM_SCALE_THRESHOLD).is_empty());

        let udl = BeamConfiguration {
            load_type: LoadType::UniformDistributed,
            ..c
        };
        assert!(input_warnings(&udl.resolve(), DEFAULT_NUM_SCALE_THRESHOLD).is_empty());
    }

    #[test]
    fn test_num_scale_threshold() {
        // 50 kN x 6^4 = 6.48e7
        let c = BeamConfiguration::default();
        let w = input_warnings(&c.resolve(), 1e7);
        assert_eq!(codes(&w), vec![WarningCode::NumScale]);
        assert!(input_warnings(&c.resolve(), 1e8).is_empty());
    }

    #[test]
    fn test_invalid_span_and_load() {
        let c = BeamConfiguration {
            length: 0.0,
            load_value: -3.0,
            deflection_limit: 0,
            ..Default::default()
        };
        let w = input_warnings(&c.resolve(), DEFAULT_NUM_SCALE_THRESHOLD);
        let found = codes(&w);
        assert!(found.contains(&WarningCode::SpanInvalid));
        assert!(found.contains(&WarningCode::LoadInvalid));
        assert!(found.contains(&WarningCode::LimitInvalid));
        assert!(found.contains(&WarningCode::PosClamp));
    }

    #[test]
    fn test_section_warnings() {
        let (props, w) = section_warnings(SectionDimensions::Rectangular { width: 0.25, height: 0.4 });
        assert!(props.is_some());
        assert!(w.is_empty());

        let (props, w) = section_warnings(SectionDimensions::Circular { diameter: 0.0 });
        assert!(props.is_none());
        assert_eq!(codes(&w), vec![WarningCode::SectionDim]);

        // positive but underflows to zero
        let (props, w) = section_warnings(SectionDimensions::Rectangular { width: 1e-200, height: 1e-200 });
        assert_eq!(props.map(|p| p.moment_of_inertia), Some(0.0));
        assert_eq!(codes(&w), vec![WarningCode::IZero, WarningCode::ZZero]);
    }

    #[test]
    fn test_safety_warnings() {
        assert_eq!(codes(&safety_warnings(0.0)), vec![WarningCode::SfZero]);
        assert_eq!(codes(&safety_warnings(0.6)), vec![WarningCode::SfLow]);
        assert!(safety_warnings(2.0).is_empty());
    }

    #[test]
    fn test_stage_validation() {
        let good = BeamConfiguration::default();
        for stage in Stage::ALL {
            assert!(validate(&good, stage).is_empty(), "{:?}", stage);
        }

        let bad_span = BeamConfiguration {
            length: -1.0,
            ..Default::default()
        };
        let errors = validate(&bad_span, Stage::SpanAndSupport);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field(), Some("length"));

        let bad_circle = BeamConfiguration {
            section_shape: SectionShape::Circular,
            diameter: 0.0,
            width: -5.0,
            ..Default::default()
        };
        let errors = validate(&bad_circle, Stage::SectionAndMaterial);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field(), Some("diameter"));
    }

    #[test]
    fn test_loading_stage_checks_position() {
        let c = BeamConfiguration {
            load_position: 7.0,
            load_factor: 3.0,
            ..Default::default()
        };
        let fields: Vec<_> = validate(&c, Stage::Loading)
            .iter()
            .filter_map(|e| e.field().map(str::to_string))
            .collect();
        assert_eq!(fields, vec!["load_position", "load_factor"]);

        let udl = BeamConfiguration {
            load_type: LoadType::UniformDistributed,
            load_position: 7.0,
            ..Default::default()
        };
        assert!(validate(&udl, Stage::Loading).is_empty());
    }

    #[test]
    fn test_validate_through_accumulates() {
        let c = BeamConfiguration {
            length: 0.0,
            height: 0.0,
            load_value: 0.0,
            load_type: LoadType::UniformDistributed,
            ..Default::default()
        };
        assert_eq!(validate_through(&c, Stage::SpanAndSupport).len(), 1);
        assert_eq!(validate_through(&c, Stage::SectionAndMaterial).len(), 2);
        assert_eq!(validate_through(&c, Stage::Results).len(), 3);
    }

    #[test]
    fn test_stage_navigation() {
        let good = BeamConfiguration::default();
        assert_eq!(Stage::SpanAndSupport.advance(&good), Stage::SectionAndMaterial);
        assert_eq!(Stage::Results.advance(&good), Stage::Results);

        let bad = BeamConfiguration {
            length: 0.0,
            ..Default::default()
        };
        assert_eq!(Stage::SpanAndSupport.advance(&bad), Stage::SpanAndSupport);
        assert_eq!(Stage::SpanAndSupport.back(), Stage::SpanAndSupport);
        assert_eq!(Stage::Results.back(), Stage::Loading);
        assert_eq!(Stage::Loading.title(), "Loading");
        assert_eq!(Stage::Results.number(), 4);
    }

    #[test]
    fn test_empty_dimension_is_missing() {
        let c = BeamConfiguration {
            width: f64::NAN,
            height: 0.0,
            ..Default::default()
        };
        let errors = validate(&c, Stage::SectionAndMaterial);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].error_code(), "MISSING_FIELD");
        assert_eq!(errors[0].field(), Some("width"));
        assert_eq!(errors[1].error_code(), "INVALID_INPUT");
        assert_eq!(Stage::SectionAndMaterial.advance(&c), Stage::SectionAndMaterial);
    }
}
