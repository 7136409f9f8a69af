//! # Equation Registry
//!
//! Identifies every closed-form equation the solver can apply, with the
//! formula text and its source. The solver records the equations it used on
//! each [`AnalysisResult`](crate::calculations::AnalysisResult) so exported
//! reports can cite them.
//!
//! ## Usage
//!
//! ```rust
//! use beam_core::equations::registry::Equation;
//!
//! let eq = Equation::SimpleUniformMaxMoment;
//! assert_eq!(eq.formula(), "M = wL²/8");
//! println!("{} ({})", eq.formula(), eq.reference().citation());
//! ```

use serde::{Deserialize, Serialize};

/// Source of an equation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodeReference {
    /// Roark's Formulas for Stress and Strain
    Roarks {
        edition: u8,
        table: &'static str,
        case: &'static str,
    },
    /// Fundamental mechanics (no specific code reference needed)
    Mechanics,
}

impl CodeReference {
    /// Format the reference for display in reports
    pub fn citation(&self) -> String {
        match self {
            CodeReference::Roarks { edition, table, case } => {
                format!("Roark's {}ed, {}, Case {}", edition, table, case)
            }
            CodeReference::Mechanics => "Fundamental Mechanics".to_string(),
        }
    }
}

const fn roarks(table: &'static str, case: &'static str) -> CodeReference {
    CodeReference::Roarks {
        edition: 8,
        table,
        case,
    }
}

/// Every equation the engine applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Equation {
    // Section geometry
    RectangularInertia,
    RectangularModulus,
    CircularInertia,
    CircularModulus,

    // Simply supported
    SimplePointMaxShear,
    SimplePointMaxMoment,
    SimplePointMaxDeflection,
    SimpleUniformMaxShear,
    SimpleUniformMaxMoment,
    SimpleUniformMaxDeflection,

    // Cantilever
    CantileverPointMaxShear,
    CantileverPointMaxMoment,
    CantileverPointMaxDeflection,
    CantileverUniformMaxShear,
    CantileverUniformMaxMoment,
    CantileverUniformMaxDeflection,

    // Fixed both ends
    FixedUniformMaxShear,
    FixedUniformMaxMoment,
    FixedUniformMaxDeflection,

    // Checks
    BendingStress,
    SafetyFactor,
    DeflectionRatio,
}

impl Equation {
    /// Formula in plain text
    pub fn formula(self) -> &'static str {
        match self {
            Equation::RectangularInertia => "I = bh³/12",
            Equation::RectangularModulus => "Z = bh²/6",
            Equation::CircularInertia => "I = πd⁴/64",
            Equation::CircularModulus => "Z = πd³/32",
            Equation::SimplePointMaxShear => "V = P·max(a,b)/L",
            Equation::SimplePointMaxMoment => "M = Pab/L",
            Equation::SimplePointMaxDeflection => "δ = Pab(L² - ab)/(3EIL)",
            Equation::SimpleUniformMaxShear => "V = wL/2",
            Equation::SimpleUniformMaxMoment => "M = wL²/8",
            Equation::SimpleUniformMaxDeflection => "δ = 5wL⁴/(384EI)",
            Equation::CantileverPointMaxShear => "V = P",
            Equation::CantileverPointMaxMoment => "M = PL",
            Equation::CantileverPointMaxDeflection => "δ = PL³/(3EI)",
            Equation::CantileverUniformMaxShear => "V = wL",
            Equation::CantileverUniformMaxMoment => "M = wL²/2",
            Equation::CantileverUniformMaxDeflection => "δ = wL⁴/(8EI)",
            Equation::FixedUniformMaxShear => "V = wL/2",
            Equation::FixedUniformMaxMoment => "M = wL²/12",
            Equation::FixedUniformMaxDeflection => "δ = wL⁴/(384EI)",
            Equation::BendingStress => "σ = M/Z",
            Equation::SafetyFactor => "SF = σy/σ",
            Equation::DeflectionRatio => "L/δ",
        }
    }

    /// Where the formula comes from
    pub fn reference(self) -> CodeReference {
        match self {
            Equation::RectangularInertia
            | Equation::RectangularModulus
            | Equation::CircularInertia
            | Equation::CircularModulus => roarks("Table A.1", "1/15"),
            Equation::SimplePointMaxShear
            | Equation::SimplePointMaxMoment
            | Equation::SimplePointMaxDeflection => roarks("Table 8.1", "1e"),
            Equation::SimpleUniformMaxShear
            | Equation::SimpleUniformMaxMoment
            | Equation::SimpleUniformMaxDeflection => roarks("Table 8.1", "2e"),
            Equation::CantileverPointMaxShear
            | Equation::CantileverPointMaxMoment
            | Equation::CantileverPointMaxDeflection => roarks("Table 8.1", "1a"),
            Equation::CantileverUniformMaxShear
            | Equation::CantileverUniformMaxMoment
            | Equation::CantileverUniformMaxDeflection => roarks("Table 8.1", "2a"),
            Equation::FixedUniformMaxShear
            | Equation::FixedUniformMaxMoment
            | Equation::FixedUniformMaxDeflection => roarks("Table 8.1", "2d"),
            Equation::BendingStress | Equation::SafetyFactor | Equation::DeflectionRatio => {
                CodeReference::Mechanics
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_citation_format() {
        let cite = Equation::FixedUniformMaxMoment.reference().citation();
        assert_eq!(cite, "Roark's 8ed, Table 8.1, Case 2d");
        assert_eq!(Equation::SafetyFactor.reference().citation(), "Fundamental Mechanics");
    }

    #[test]
    fn test_point_load_cases() {
        let simple = Equation::SimplePointMaxShear.reference().citation();
        assert_eq!(simple, "Roark's 8ed, Table 8.1, Case 1e");
        let cantilever = Equation::CantileverPointMaxShear.reference().citation();
        assert_eq!(cantilever, "Roark's 8ed, Table 8.1, Case 1a");
    }

    #[test]
    fn test_equation_serialization() {
        let json = serde_json::to_string(&Equation::CantileverUniformMaxMoment).unwrap();
        assert_eq!(json, "\"CantileverUniformMaxMoment\"");
    }
}
