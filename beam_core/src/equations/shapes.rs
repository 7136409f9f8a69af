//! # Plot Shapes
//!
//! Deflected-shape curves used only to draw the deflection diagram. Nothing
//! in the safety or serviceability checks reads these values; the solver
//! uses the extreme-value formulas in [`beam`](super::beam).
//!
//! These are approximations for visualization:
//!
//! - Simply supported and cantilever curves follow the elastic line for the
//!   loaded case (Roark's Table 8.1), but the simply supported point-load
//!   curve peaks below the conservative design deflection the solver reports.
//! - The fixed-both-ends curve is a parabolic envelope scaled to the
//!   midspan maximum, not the quartic elastic line.
//!
//! All functions return deflection in the same length unit as their inputs,
//! positive downward.

use super::beam::fixed_uniform_max_deflection;

/// Elastic line of a simply supported beam with a point load at `a`
///
/// - x ≤ a: δ = Pbx(L² - b² - x²)/(6EIL)
/// - x > a: δ = Pa(L-x)(2Lx - x² - a²)/(6EIL)
pub fn simple_point_shape(p: f64, a: f64, l: f64, x: f64, e: f64, i: f64) -> f64 {
    let b = l - a;
    let ei = e * i;
    if x <= a {
        p * b * x * (l * l - b * b - x * x) / (6.0 * ei * l)
    } else {
        p * a * (l - x) * (2.0 * l * x - x * x - a * a) / (6.0 * ei * l)
    }
}

/// Elastic line of a simply supported beam with full-span uniform load
///
/// δ = wx(L³ - 2Lx² + x³)/(24EI)
pub fn simple_uniform_shape(w: f64, l: f64, x: f64, e: f64, i: f64) -> f64 {
    w * x * (l.powi(3) - 2.0 * l * x * x + x.powi(3)) / (24.0 * e * i)
}

/// Cantilever with a free-end point load: δ = Px²(3L - x)/(6EI)
pub fn cantilever_point_shape(p: f64, l: f64, x: f64, e: f64, i: f64) -> f64 {
    p * x * x * (3.0 * l - x) / (6.0 * e * i)
}

/// Cantilever with uniform load: δ = wx²(6L² - 4Lx + x²)/(24EI)
pub fn cantilever_uniform_shape(w: f64, l: f64, x: f64, e: f64, i: f64) -> f64 {
    w * x * x * (6.0 * l * l - 4.0 * l * x + x * x) / (24.0 * e * i)
}

/// Fixed-both-ends uniform load, parabolic envelope
///
/// δ ≈ δmax·(1 - (2x/L - 1)²), with δmax = wL⁴/(384EI)
pub fn fixed_uniform_shape(w: f64, l: f64, x: f64, e: f64, i: f64) -> f64 {
    let xi = 2.0 * x / l - 1.0;
    fixed_uniform_max_deflection(w, l, e, i) * (1.0 - xi * xi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equations::beam::{
        cantilever_point_max_deflection, cantilever_uniform_max_deflection,
        simple_uniform_max_deflection,
    };

    const E: f64 = 200e9;
    const I: f64 = 1.0e-3;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * b.abs().max(1e-12)
    }

    #[test]
    fn test_shapes_vanish_at_supports() {
        assert!(simple_point_shape(1e4, 2.0, 6.0, 0.0, E, I).abs() < 1e-15);
        assert!(simple_point_shape(1e4, 2.0, 6.0, 6.0, E, I).abs() < 1e-15);
        assert!(simple_uniform_shape(1e4, 6.0, 6.0, E, I).abs() < 1e-15);
        assert_eq!(cantilever_point_shape(1e4, 6.0, 0.0, E, I), 0.0);
        assert_eq!(cantilever_uniform_shape(1e4, 6.0, 0.0, E, I), 0.0);
        assert!(fixed_uniform_shape(1e4, 6.0, 0.0, E, I).abs() < 1e-15);
    }

    #[test]
    fn test_shape_peaks_match_extremes() {
        assert!(close(
            simple_uniform_shape(1e4, 6.0, 3.0, E, I),
            simple_uniform_max_deflection(1e4, 6.0, E, I)
        ));
        assert!(close(
            cantilever_point_shape(1e4, 6.0, 6.0, E, I),
            cantilever_point_max_deflection(1e4, 6.0, E, I)
        ));
        assert!(close(
            cantilever_uniform_shape(1e4, 6.0, 6.0, E, I),
            cantilever_uniform_max_deflection(1e4, 6.0, E, I)
        ));
        assert!(close(
            fixed_uniform_shape(1e4, 6.0, 3.0, E, I),
            fixed_uniform_max_deflection(1e4, 6.0, E, I)
        ));
    }

    #[test]
    fn test_simple_point_shape_continuous_at_load() {
        let a = 2.5;
        let left = simple_point_shape(1e4, a, 6.0, a, E, I);
        let right = simple_point_shape(1e4, a, 6.0, a + 1e-9, E, I);
        assert!((left - right).abs() < 1e-9);
    }
}
