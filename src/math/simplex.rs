//! Derivative-free minimization over a parameter pair (Nelder–Mead simplex).
//!
//! The fitter only ever minimizes smooth-ish scalar functions of two
//! variables (the χ² surface and its `|χ² − χ²min − 1|` companion), so the
//! simplex is fixed at three vertices in ℝ².
//!
//! Scheme (classic coefficients):
//! - reflection `ρ = 1`, expansion `χ = 2`, contraction `ψ = ½`, shrink `σ = ½`
//! - initial simplex: the start point plus one vertex per axis, nudged by 5%
//!   (or by `0.00025` when that coordinate is exactly zero)
//! - stop once the simplex is smaller than `xtol` in every coordinate *and*
//!   the vertex values differ by at most `ftol`
//!
//! Running out of budget is not an error: the best vertex found so far is
//! returned with `converged = false`.

use nalgebra::Vector2;

const REFLECTION: f64 = 1.0;
const EXPANSION: f64 = 2.0;
const CONTRACTION: f64 = 0.5;
const SHRINK: f64 = 0.5;

const NONZERO_DELTA: f64 = 0.05;
const ZERO_DELTA: f64 = 0.000_25;

/// Outcome of a minimization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Minimum {
    pub point: Vector2<f64>,
    pub value: f64,
    pub iterations: usize,
    pub evaluations: usize,
    /// `false` when the budget ran out before the tolerances were met.
    pub converged: bool,
}

/// A derivative-free minimizer of a function of two variables.
pub trait Minimizer {
    fn minimize(
        &self,
        objective: &mut dyn FnMut(&Vector2<f64>) -> f64,
        start: Vector2<f64>,
        xtol: f64,
    ) -> Minimum;
}

/// Nelder–Mead simplex minimizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NelderMead {
    /// Allowed spread of function values across the simplex at convergence.
    pub ftol: f64,
    pub max_iterations: usize,
    pub max_evaluations: usize,
}

impl NelderMead {
    pub fn new(ftol: f64, budget: usize) -> Self {
        Self {
            ftol,
            max_iterations: budget,
            max_evaluations: budget,
        }
    }
}

impl Default for NelderMead {
    fn default() -> Self {
        // 200 × number of parameters.
        Self::new(1e-4, 400)
    }
}

type Vertex = (Vector2<f64>, f64);

struct Counted<'a> {
    objective: &'a mut dyn FnMut(&Vector2<f64>) -> f64,
    evaluations: usize,
}

impl Counted<'_> {
    fn eval(&mut self, p: Vector2<f64>) -> Vertex {
        self.evaluations += 1;
        (p, (self.objective)(&p))
    }
}

impl Minimizer for NelderMead {
    fn minimize(
        &self,
        objective: &mut dyn FnMut(&Vector2<f64>) -> f64,
        start: Vector2<f64>,
        xtol: f64,
    ) -> Minimum {
        let mut f = Counted {
            objective,
            evaluations: 0,
        };

        let mut simplex: [Vertex; 3] = [f.eval(start), f.eval(nudge(start, 0)), f.eval(nudge(start, 1))];
        sort_simplex(&mut simplex);

        let mut iterations = 1usize;
        let mut converged = false;

        while f.evaluations < self.max_evaluations && iterations < self.max_iterations {
            if within_tolerance(&simplex, xtol, self.ftol) {
                converged = true;
                break;
            }

            let (best, second, worst) = (simplex[0], simplex[1], simplex[2]);
            let centroid = (best.0 + second.0) / 2.0;

            let reflected = f.eval(centroid * (1.0 + REFLECTION) - worst.0 * REFLECTION);

            let mut shrink = false;
            if reflected.1 < best.1 {
                let expanded = f.eval(
                    centroid * (1.0 + REFLECTION * EXPANSION) - worst.0 * (REFLECTION * EXPANSION),
                );
                simplex[2] = if expanded.1 < reflected.1 { expanded } else { reflected };
            } else if reflected.1 < second.1 {
                simplex[2] = reflected;
            } else if reflected.1 < worst.1 {
                // Outside contraction.
                let contracted = f.eval(
                    centroid * (1.0 + CONTRACTION * REFLECTION) - worst.0 * (CONTRACTION * REFLECTION),
                );
                if contracted.1 <= reflected.1 {
                    simplex[2] = contracted;
                } else {
                    shrink = true;
                }
            } else {
                // Inside contraction.
                let contracted = f.eval(centroid * (1.0 - CONTRACTION) + worst.0 * CONTRACTION);
                if contracted.1 < worst.1 {
                    simplex[2] = contracted;
                } else {
                    shrink = true;
                }
            }

            if shrink {
                for j in 1..simplex.len() {
                    let p = best.0 + (simplex[j].0 - best.0) * SHRINK;
                    simplex[j] = f.eval(p);
                }
            }

            sort_simplex(&mut simplex);
            iterations += 1;
        }

        let (point, value) = simplex[0];
        Minimum {
            point,
            value,
            iterations,
            evaluations: f.evaluations,
            converged,
        }
    }
}

fn nudge(start: Vector2<f64>, axis: usize) -> Vector2<f64> {
    let mut p = start;
    p[axis] = if p[axis] != 0.0 {
        p[axis] * (1.0 + NONZERO_DELTA)
    } else {
        ZERO_DELTA
    };
    p
}

fn sort_simplex(simplex: &mut [Vertex; 3]) {
    // NaN sorts last, so a vertex with an undefined value is always replaced first.
    simplex.sort_by(|a, b| a.1.total_cmp(&b.1));
}

fn within_tolerance(simplex: &[Vertex; 3], xtol: f64, ftol: f64) -> bool {
    let (best, best_value) = simplex[0];
    simplex[1..].iter().all(|(p, v)| (p - best).amax() <= xtol && (v - best_value).abs() <= ftol)
}
