//! Breit–Wigner cross-section for e⁺e⁻ → resonance → e⁺e⁻.
//!
//! ```text
//! σ(E) = (12π Γee² / m²) · E² / ((E² − m²)² + m² Γ²)
//! ```
//!
//! in natural units (GeV⁻²), converted to nanobarns via
//! `conversion_coefficient × 10⁶`.
//!
//! Numerical notes:
//! - For `m > 0` the denominator is bounded below by `m² Γ²`, and at `Γ = 0`
//!   it only vanishes at `E² = m²` exactly; no special casing is needed.
//! - `E` and `Γ` enter only squared, so the curve is even in both.

use std::f64::consts::PI;

use crate::domain::{ParameterPair, PhysicsConstants};

/// Millibarn → nanobarn.
const MB_TO_NB: f64 = 1e6;

/// Predicted cross-section (nb) at energy `x` (GeV).
pub fn predict(x: f64, params: ParameterPair, constants: &PhysicsConstants) -> f64 {
    let m2 = params.mass * params.mass;
    let x2 = x * x;
    let gee = constants.partial_width_ee;

    let prefactor = 12.0 * PI * gee * gee / m2;
    let detuning = x2 - m2;
    let shape = x2 / (detuning * detuning + m2 * params.width * params.width);

    prefactor * shape * constants.conversion_coefficient * MB_TO_NB
}

/// Vectorized `predict` over a slice of energies.
pub fn predict_all(xs: &[f64], params: ParameterPair, constants: &PhysicsConstants) -> Vec<f64> {
    xs.iter().map(|&x| predict(x, params, constants)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn z() -> ParameterPair {
        ParameterPair::new(91.19, 2.5)
    }

    #[test]
    fn peak_value_matches_closed_form() {
        // At x = m the shape reduces to 1 / Γ².
        let c = PhysicsConstants::default();
        let p = z();
        let expected = 12.0 * PI * c.partial_width_ee.powi(2) / (p.mass * p.mass) / (p.width * p.width)
            * c.conversion_coefficient
            * 1e6;
        let got = predict(p.mass, p, &c);
        assert!((got - expected).abs() < 1e-12 * expected);
        assert!((got - 1.988).abs() < 1e-2, "Z peak should be ~1.99 nb, got {got}");
    }

    #[test]
    fn predict_is_even_and_finite() {
        let c = PhysicsConstants::default();
        for &params in &[z(), ParameterPair::new(1.0, 0.01), ParameterPair::new(90.0, -3.0)] {
            for &x in &[0.0, 0.5, 1.0, 45.0, 88.0, 91.19, 120.0, 1e4] {
                let a = predict(x, params, &c);
                let b = predict(-x, params, &c);
                assert!(a.is_finite(), "non-finite at x={x} params={params:?}");
                assert!(a >= 0.0);
                assert_eq!(a, b);
            }
        }
    }

    #[test]
    fn curve_peaks_near_mass() {
        let c = PhysicsConstants::default();
        let p = z();
        let at_peak = predict(91.19, p, &c);
        assert!(predict(88.0, p, &c) < at_peak);
        assert!(predict(94.0, p, &c) < at_peak);
    }

    #[test]
    fn predict_all_maps_each_point() {
        let c = PhysicsConstants::default();
        let xs = [88.0, 91.0, 94.0];
        let ys = predict_all(&xs, z(), &c);
        assert_eq!(ys.len(), 3);
        for (x, y) in xs.iter().zip(&ys) {
            assert_eq!(*y, predict(*x, z(), &c));
        }
    }
}
