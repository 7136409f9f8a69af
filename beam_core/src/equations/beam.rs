//! # Closed-Form Beam Formulas
//!
//! Extreme values and internal-force distributions for the five supported
//! single-span cases. These are the formulas the solver uses for the safety
//! and serviceability checks; the plotting curves live separately in
//! [`shapes`](super::shapes).
//!
//! ## Notation
//!
//! - `L` = Span length
//! - `x` = Position along beam from x = 0
//! - `a` = Point load position from x = 0, `b = L - a`
//! - `P` = Point load magnitude
//! - `w` = Uniform load intensity (force per unit length)
//! - `E` = Modulus of elasticity, `I` = Moment of inertia
//!
//! ## Sign Conventions
//!
//! - Loads: Positive downward
//! - Moment: Positive causes tension on bottom (sagging)
//! - Shear: Positive when left side up relative to right
//! - `*_max_*` functions return magnitudes (always ≥ 0 for positive loads)
//!
//! ## Supports
//!
//! - Simply supported: pin at x = 0, roller at x = L
//! - Cantilever: fixed at x = 0, free at x = L
//! - Fixed both ends: fixed at x = 0 and x = L
//!
//! ## References
//!
//! - Roark's Formulas for Stress and Strain, 8th Edition, Table 8.1

// =============================================================================
// SIMPLY SUPPORTED - POINT LOAD
// =============================================================================

/// Reactions for point load P at position a on span L
///
/// ```text
///        P
///        ↓
///    ────┬────────────
///    △   a            △
///   R1  ←───────L────→ R2
/// ```
///
/// # Formulas (Roark's Table 8.1, Case 1e)
/// - R1 = P(L-a)/L
/// - R2 = Pa/L
#[inline]
pub fn simple_point_reactions(p: f64, a: f64, l: f64) -> (f64, f64) {
    (p * (l - a) / l, p * a / l)
}

/// Shear at x: V = R1 for x < a, V = R1 - P for x ≥ a
#[inline]
pub fn simple_point_shear(p: f64, a: f64, l: f64, x: f64) -> f64 {
    let (r1, _) = simple_point_reactions(p, a, l);
    if x < a {
        r1
    } else {
        r1 - p
    }
}

/// Moment at x: M = R1·x for x ≤ a, M = R1·x - P(x-a) for x > a
#[inline]
pub fn simple_point_moment(p: f64, a: f64, l: f64, x: f64) -> f64 {
    let (r1, _) = simple_point_reactions(p, a, l);
    if x <= a {
        r1 * x
    } else {
        r1 * x - p * (x - a)
    }
}

/// Maximum shear: the larger reaction, V = P·max(a,b)/L
#[inline]
pub fn simple_point_max_shear(p: f64, a: f64, l: f64) -> f64 {
    let b = l - a;
    p * a.max(b) / l
}

/// Maximum moment, under the load: M = Pab/L
#[inline]
pub fn simple_point_max_moment(p: f64, a: f64, l: f64) -> f64 {
    let b = l - a;
    p * a * b / l
}

/// Design deflection for a point load anywhere on the span
///
/// # Formula
/// ```text
/// δ = Pab(L² - ab) / (3EIL)
/// ```
///
/// This is a conservative single-expression bound: it is zero for a load at
/// a support and exceeds the exact elastic maximum elsewhere (three times
/// PL³/48EI for a central load).
#[inline]
pub fn simple_point_max_deflection(p: f64, a: f64, l: f64, e: f64, i: f64) -> f64 {
    let b = l - a;
    p * a * b * (l * l - a * b) / (3.0 * e * i * l)
}

// =============================================================================
// SIMPLY SUPPORTED - UNIFORM LOAD
// =============================================================================

/// Shear at x for full-span uniform load: V = w(L/2 - x)
#[inline]
pub fn simple_uniform_shear(w: f64, l: f64, x: f64) -> f64 {
    w * (l / 2.0 - x)
}

/// Moment at x for full-span uniform load: M = wx(L-x)/2
#[inline]
pub fn simple_uniform_moment(w: f64, l: f64, x: f64) -> f64 {
    w * x * (l - x) / 2.0
}

/// Maximum shear at the supports: V = wL/2
#[inline]
pub fn simple_uniform_max_shear(w: f64, l: f64) -> f64 {
    w * l / 2.0
}

/// Maximum moment at midspan: M = wL²/8
#[inline]
pub fn simple_uniform_max_moment(w: f64, l: f64) -> f64 {
    w * l * l / 8.0
}

/// Maximum deflection at midspan: δ = 5wL⁴/(384EI)
#[inline]
pub fn simple_uniform_max_deflection(w: f64, l: f64, e: f64, i: f64) -> f64 {
    5.0 * w * l.powi(4) / (384.0 * e * i)
}

// =============================================================================
// CANTILEVER - POINT LOAD AT FREE END
// =============================================================================

/// Shear at x for a free-end point load: V = P everywhere
#[inline]
pub fn cantilever_point_shear(p: f64) -> f64 {
    p
}

/// Moment at x for a free-end point load: M = -P(L-x) (hogging)
#[inline]
pub fn cantilever_point_moment(p: f64, l: f64, x: f64) -> f64 {
    -p * (l - x)
}

/// Maximum moment at the fixed end: |M| = PL
#[inline]
pub fn cantilever_point_max_moment(p: f64, l: f64) -> f64 {
    p * l
}

/// Maximum deflection at the free end: δ = PL³/(3EI)
#[inline]
pub fn cantilever_point_max_deflection(p: f64, l: f64, e: f64, i: f64) -> f64 {
    p * l.powi(3) / (3.0 * e * i)
}

// =============================================================================
// CANTILEVER - UNIFORM LOAD
// =============================================================================

/// Shear at x: V = w(L-x)
#[inline]
pub fn cantilever_uniform_shear(w: f64, l: f64, x: f64) -> f64 {
    w * (l - x)
}

/// Moment at x: M = -w(L-x)²/2 (hogging)
#[inline]
pub fn cantilever_uniform_moment(w: f64, l: f64, x: f64) -> f64 {
    -w * (l - x).powi(2) / 2.0
}

/// Maximum shear at the fixed end: V = wL
#[inline]
pub fn cantilever_uniform_max_shear(w: f64, l: f64) -> f64 {
    w * l
}

/// Maximum moment at the fixed end: |M| = wL²/2
#[inline]
pub fn cantilever_uniform_max_moment(w: f64, l: f64) -> f64 {
    w * l * l / 2.0
}

/// Maximum deflection at the free end: δ = wL⁴/(8EI)
#[inline]
pub fn cantilever_uniform_max_deflection(w: f64, l: f64, e: f64, i: f64) -> f64 {
    w * l.powi(4) / (8.0 * e * i)
}

// =============================================================================
// FIXED BOTH ENDS - UNIFORM LOAD
// =============================================================================

/// Shear at x: V = w(L/2 - x)
#[inline]
pub fn fixed_uniform_shear(w: f64, l: f64, x: f64) -> f64 {
    w * (l / 2.0 - x)
}

/// Moment at x: M = w(Lx - x²)/2 - wL²/12
///
/// -wL²/12 at the supports, +wL²/24 at midspan.
#[inline]
pub fn fixed_uniform_moment(w: f64, l: f64, x: f64) -> f64 {
    w * (l * x - x * x) / 2.0 - w * l * l / 12.0
}

/// Maximum shear at the supports: V = wL/2
#[inline]
pub fn fixed_uniform_max_shear(w: f64, l: f64) -> f64 {
    w * l / 2.0
}

/// Maximum moment magnitude, at the supports: |M| = wL²/12
#[inline]
pub fn fixed_uniform_max_moment(w: f64, l: f64) -> f64 {
    w * l * l / 12.0
}

/// Maximum deflection at midspan: δ = wL⁴/(384EI)
#[inline]
pub fn fixed_uniform_max_deflection(w: f64, l: f64, e: f64, i: f64) -> f64 {
    w * l.powi(4) / (384.0 * e * i)
}

// =============================================================================
// STRESS AND SERVICEABILITY
// =============================================================================

/// Extreme-fiber bending stress: σ = M/Z
#[inline]
pub fn bending_stress(moment: f64, section_modulus: f64) -> f64 {
    moment / section_modulus
}

/// Span-to-deflection ratio L/δ, infinite when δ is zero
#[inline]
pub fn deflection_ratio(l: f64, deflection: f64) -> f64 {
    if deflection > 0.0 {
        l / deflection
    } else {
        f64::INFINITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-6;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON || (a - b).abs() / b.abs().max(1.0) < 0.001
    }

    #[test]
    fn test_simple_point_reactions_asymmetric() {
        // 10 m beam, 1000 N at 3 m
        let (r1, r2) = simple_point_reactions(1000.0, 3.0, 10.0);
        assert!(approx_eq(r1, 700.0), "R1 = {}", r1);
        assert!(approx_eq(r2, 300.0), "R2 = {}", r2);
    }

    #[test]
    fn test_simple_point_extremes_midspan() {
        // 50 kN at midspan of 6 m
        assert!(approx_eq(simple_point_max_moment(50_000.0, 3.0, 6.0), 75_000.0));
        assert!(approx_eq(simple_point_max_shear(50_000.0, 3.0, 6.0), 25_000.0));
    }

    #[test]
    fn test_simple_point_shear_uses_larger_reaction() {
        assert!(approx_eq(simple_point_max_shear(1000.0, 2.0, 10.0), 800.0));
        assert!(approx_eq(simple_point_max_shear(1000.0, 8.0, 10.0), 800.0));
    }

    #[test]
    fn test_simple_point_moment_peaks_under_load() {
        let m_under = simple_point_moment(1000.0, 4.0, 10.0, 4.0);
        assert!(approx_eq(m_under, simple_point_max_moment(1000.0, 4.0, 10.0)));
        assert!(approx_eq(simple_point_moment(1000.0, 4.0, 10.0, 0.0), 0.0));
        assert!(approx_eq(simple_point_moment(1000.0, 4.0, 10.0, 10.0), 0.0));
    }

    #[test]
    fn test_simple_point_deflection_zero_at_support() {
        assert_eq!(simple_point_max_deflection(1000.0, 0.0, 10.0, 200e9, 1e-4), 0.0);
    }

    #[test]
    fn test_simple_uniform() {
        // 10 m, 100 N/m
        assert!(approx_eq(simple_uniform_max_moment(100.0, 10.0), 1250.0));
        assert!(approx_eq(simple_uniform_max_shear(100.0, 10.0), 500.0));
        assert!(approx_eq(simple_uniform_shear(100.0, 10.0, 10.0), -500.0));
        assert!(approx_eq(simple_uniform_moment(100.0, 10.0, 5.0), 1250.0));
    }

    #[test]
    fn test_cantilever_uniform() {
        // 50 kN/m on 6 m
        assert!(approx_eq(cantilever_uniform_max_moment(50_000.0, 6.0), 900_000.0));
        assert!(approx_eq(cantilever_uniform_max_shear(50_000.0, 6.0), 300_000.0));
        assert!(approx_eq(cantilever_uniform_moment(50_000.0, 6.0, 0.0), -900_000.0));
        assert!(approx_eq(cantilever_uniform_moment(50_000.0, 6.0, 6.0), 0.0));
    }

    #[test]
    fn test_cantilever_point() {
        assert!(approx_eq(cantilever_point_max_moment(10.0, 4.0), 40.0));
        assert!(approx_eq(cantilever_point_moment(10.0, 4.0, 0.0), -40.0));
        assert_eq!(cantilever_point_shear(10.0), 10.0);
    }

    #[test]
    fn test_fixed_uniform() {
        assert!(approx_eq(fixed_uniform_max_moment(50_000.0, 6.0), 150_000.0));
        assert!(approx_eq(fixed_uniform_moment(50_000.0, 6.0, 0.0), -150_000.0));
        // +wL²/24 at midspan
        assert!(approx_eq(fixed_uniform_moment(50_000.0, 6.0, 3.0), 75_000.0));
    }

    #[test]
    fn test_fixed_is_one_fifth_of_simple_deflection() {
        let simple = simple_uniform_max_deflection(1000.0, 5.0, 200e9, 1e-4);
        let fixed = fixed_uniform_max_deflection(1000.0, 5.0, 200e9, 1e-4);
        assert!(approx_eq(simple / fixed, 5.0));
    }

    #[test]
    fn test_deflection_ratio_guard() {
        assert!(deflection_ratio(6.0, 0.0).is_infinite());
        assert!(approx_eq(deflection_ratio(6.0, 0.01), 600.0));
    }
}
