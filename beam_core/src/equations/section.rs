//! # Cross-Section Property Formulas
//!
//! Geometric properties of the two supported cross-sections. Inputs and
//! outputs are in consistent units: meters in, m⁴ / m³ out when called from
//! the solver.
//!
//! ## Notation
//!
//! - `I` = Moment of inertia (second moment of area)
//! - `Z` = Elastic section modulus (I/c, c = distance to extreme fiber)
//! - `b` = Width of rectangular section
//! - `d` = Depth (height) of rectangular section, or diameter of circular section
//!
//! ## References
//!
//! - Roark's Formulas for Stress and Strain, 8th Edition, Table A.1

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::configuration::SectionDimensions;
use crate::errors::{CalcError, CalcResult};

// =============================================================================
// RECTANGULAR SECTION PROPERTIES
// =============================================================================

/// Cross-sectional area of a rectangle: A = b × d
#[inline]
pub fn rectangular_area(b: f64, d: f64) -> f64 {
    b * d
}

/// Moment of inertia of a rectangle about its strong centroidal axis
///
/// ```text
///     ┌─────────┐
///     │         │
///   d │ ════════│ ← neutral axis at d/2
///     │         │
///     └─────────┘
///          b
/// ```
///
/// # Formula
/// I = bd³/12
///
/// # Example
/// ```rust
/// use beam_core::equations::section::rectangular_moment_of_inertia;
///
/// // 250 x 400 mm section
/// let i = rectangular_moment_of_inertia(0.25, 0.4);
/// assert!((i - 1.3333e-3).abs() < 1e-7);
/// ```
#[inline]
pub fn rectangular_moment_of_inertia(b: f64, d: f64) -> f64 {
    b * d.powi(3) / 12.0
}

/// Section modulus of a rectangle
///
/// # Formula
/// Z = I/c = bd³/12 ÷ d/2 = bd²/6
///
/// # Example
/// ```rust
/// use beam_core::equations::section::rectangular_section_modulus;
///
/// let z = rectangular_section_modulus(0.25, 0.4);
/// assert!((z - 6.6667e-3).abs() < 1e-7);
/// ```
#[inline]
pub fn rectangular_section_modulus(b: f64, d: f64) -> f64 {
    b * d.powi(2) / 6.0
}

// =============================================================================
// CIRCULAR SECTION PROPERTIES
// =============================================================================

/// Cross-sectional area of a solid circle: A = πd²/4
#[inline]
pub fn circular_area(d: f64) -> f64 {
    PI * d.powi(2) / 4.0
}

/// Moment of inertia of a solid circle about a diameter
///
/// # Formula
/// I = πd⁴/64
#[inline]
pub fn circular_moment_of_inertia(d: f64) -> f64 {
    PI * d.powi(4) / 64.0
}

/// Section modulus of a solid circle
///
/// # Formula
/// Z = I/(d/2) = πd³/32
#[inline]
pub fn circular_section_modulus(d: f64) -> f64 {
    PI * d.powi(3) / 32.0
}

// =============================================================================
// SECTION GEOMETRY
// =============================================================================

/// Computed properties of a cross-section
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionProperties {
    /// Moment of inertia I
    pub moment_of_inertia: f64,
    /// Section modulus Z
    pub section_modulus: f64,
    /// Area A
    pub area: f64,
}

/// Compute I, Z and A for the given dimensions.
///
/// Fails with [`CalcError::InvalidInput`] when a required dimension is not a
/// positive finite number. The caller turns the error into a `SECTION_DIM`
/// warning.
pub fn section_properties(dims: SectionDimensions) -> CalcResult<SectionProperties> {
    match dims {
        SectionDimensions::Rectangular { width, height } => {
            require_positive("width", width)?;
            require_positive("height", height)?;
            Ok(SectionProperties {
                moment_of_inertia: rectangular_moment_of_inertia(width, height),
                section_modulus: rectangular_section_modulus(width, height),
                area: rectangular_area(width, height),
            })
        }
        SectionDimensions::Circular { diameter } => {
            require_positive("diameter", diameter)?;
            Ok(SectionProperties {
                moment_of_inertia: circular_moment_of_inertia(diameter),
                section_modulus: circular_section_modulus(diameter),
                area: circular_area(diameter),
            })
        }
    }
}

fn require_positive(field: &str, value: f64) -> CalcResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CalcError::invalid_input(
            field,
            value.to_string(),
            "Section dimension must be a positive number",
        ))
    }
}
