//! # Unit Types
//!
//! Type-safe wrappers for the units the beam engine works in, plus the
//! [`UnitSystem`] switch that decides how length-like configuration fields
//! are interpreted.
//!
//! ## Base Units
//!
//! The solver always computes in SI base units:
//! - Length: meters (m)
//! - Force: newtons (N); user loads arrive in kilonewtons (kN, kN/m)
//! - Stress and modulus: pascals (Pa)
//!
//! Imperial only changes lengths (feet). Load magnitudes stay in kN / kN/m
//! in both systems; they are never unit-converted.
//!
//! ## Example
//!
//! ```rust
//! use beam_core::units::{Feet, Meters, UnitSystem};
//!
//! let span = Meters(6.0);
//! let span_ft: Feet = span.into();
//! assert!((span_ft.0 - 19.68504).abs() < 1e-9);
//!
//! assert_eq!(UnitSystem::Imperial.length_label(), "ft");
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// Fixed length conversion factor: 1 m = 3.28084 ft
pub const FEET_PER_METER: f64 = 3.28084;

/// Kilonewtons to newtons
pub const NEWTONS_PER_KILONEWTON: f64 = 1000.0;

/// Meters to millimeters
pub const MILLIMETERS_PER_METER: f64 = 1000.0;

// ============================================================================
// Unit System
// ============================================================================

/// Unit system for the length-like fields of a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UnitSystem {
    /// Lengths in meters
    #[default]
    Metric,
    /// Lengths in feet
    Imperial,
}

impl UnitSystem {
    /// Display label for length fields
    pub fn length_label(self) -> &'static str {
        match self {
            UnitSystem::Metric => "m",
            UnitSystem::Imperial => "ft",
        }
    }

    /// The other unit system
    pub fn toggled(self) -> Self {
        match self {
            UnitSystem::Metric => UnitSystem::Imperial,
            UnitSystem::Imperial => UnitSystem::Metric,
        }
    }

    /// Convert a length expressed in this system to meters
    pub fn to_meters(self, value: f64) -> Meters {
        match self {
            UnitSystem::Metric => Meters(value),
            UnitSystem::Imperial => Feet(value).into(),
        }
    }

    /// Express a length in meters in this system
    pub fn from_meters(self, meters: Meters) -> f64 {
        match self {
            UnitSystem::Metric => meters.0,
            UnitSystem::Imperial => Feet::from(meters).0,
        }
    }
}

// ============================================================================
// Length Units
// ============================================================================

/// Length in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Length in feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feet(pub f64);

impl From<Meters> for Feet {
    fn from(m: Meters) -> Self {
        Feet(m.0 * FEET_PER_METER)
    }
}

impl From<Feet> for Meters {
    fn from(ft: Feet) -> Self {
        Meters(ft.0 / FEET_PER_METER)
    }
}

impl Meters {
    /// Length in millimeters
    pub fn millimeters(self) -> f64 {
        self.0 * MILLIMETERS_PER_METER
    }
}

// ============================================================================
// Force Units
// ============================================================================

/// Force in newtons (or N/m for distributed loads)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Newtons(pub f64);

/// Force in kilonewtons (or kN/m for distributed loads)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilonewtons(pub f64);

impl From<Kilonewtons> for Newtons {
    fn from(kn: Kilonewtons) -> Self {
        Newtons(kn.0 * NEWTONS_PER_KILONEWTON)
    }
}

impl From<Newtons> for Kilonewtons {
    fn from(n: Newtons) -> Self {
        Kilonewtons(n.0 / NEWTONS_PER_KILONEWTON)
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Meters);
impl_arithmetic!(Feet);
impl_arithmetic!(Newtons);
impl_arithmetic!(Kilonewtons);

// ============================================================================
// Serde helper for unbounded ratios
// ============================================================================

/// Serialize `f64::INFINITY` as JSON `null` and read `null` back as infinity.
///
/// JSON has no infinity literal; serde_json would otherwise write `null` and
/// then refuse to read it back into an `f64`.
pub mod unbounded {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}
