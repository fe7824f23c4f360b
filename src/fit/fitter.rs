//! One χ² fit of the Breit–Wigner curve, with uncertainty bounds.
//!
//! Given a dataset and a starting `(mass, width)`:
//!
//! 1. minimize χ² from the start point (`primary_tolerance`)
//! 2. minimize `|χ²(p) − χ²min − 1|` twice, seeded above and below the best
//!    fit (`upper_seed_scale`, `lower_seed_scale`, `bound_tolerance`); each run
//!    lands on the `χ²min + 1` contour
//! 3. report half the distance between the two contour points per parameter
//!
//! The model only depends on `width²`, so widths are reported as magnitudes.

use nalgebra::Vector2;

use crate::domain::{Convergence, Dataset, FitConfig, FitResult, ModelFit, ParameterPair, UncertaintyBounds};
use crate::error::{AppError, ErrorKind};
use crate::math::{Minimizer, NelderMead, dataset_chi_square};

/// Fit with the default simplex minimizer configured from `config`.
pub fn fit(dataset: &Dataset, initial: ParameterPair, config: &FitConfig) -> Result<ModelFit, AppError> {
    let minimizer = NelderMead::new(config.function_tolerance, config.max_iterations);
    fit_with(&minimizer, dataset, initial, config)
}

/// Fit with any minimizer.
pub fn fit_with<M: Minimizer + ?Sized>(
    minimizer: &M,
    dataset: &Dataset,
    initial: ParameterPair,
    config: &FitConfig,
) -> Result<ModelFit, AppError> {
    validate_dataset(dataset)?;
    if !initial.is_finite() {
        return Err(AppError::invalid_input(format!(
            "Non-finite starting point: mass={}, width={}.",
            initial.mass, initial.width
        )));
    }

    let constants = config.physics;

    // Only the predictions vary between evaluations, so a shape or sigma error
    // shows up here or never.
    dataset_chi_square(dataset, initial, &constants)?;
    let chi_at = |p: &Vector2<f64>| dataset_chi_square(dataset, to_pair(p), &constants).unwrap_or(f64::INFINITY);

    let mut objective = |p: &Vector2<f64>| chi_at(p);
    let primary = minimizer.minimize(&mut objective, to_vector(initial), config.primary_tolerance);
    if !primary.value.is_finite() {
        return Err(AppError::new(
            ErrorKind::InvalidInput,
            "Chi-square is not finite at the minimizer's best point.",
        ));
    }

    let best = to_pair(&primary.point);
    let chi_square_min = primary.value;

    let mut elevated = |p: &Vector2<f64>| (chi_at(p) - chi_square_min - 1.0).abs();
    let upper = minimizer.minimize(
        &mut elevated,
        to_vector(best.scaled(config.upper_seed_scale)),
        config.bound_tolerance,
    );
    let lower = minimizer.minimize(
        &mut elevated,
        to_vector(best.scaled(config.lower_seed_scale)),
        config.bound_tolerance,
    );

    let convergence = Convergence {
        primary: primary.converged,
        upper_bound: upper.converged,
        lower_bound: lower.converged,
    };

    let upper = to_pair(&upper.point);
    let lower = to_pair(&lower.point);
    let bounds = UncertaintyBounds {
        mass_uncertainty: ((upper.mass - lower.mass) / 2.0).abs(),
        width_uncertainty: ((upper.width - lower.width) / 2.0).abs(),
    };

    log::debug!(
        "fit n={} chi2_min={:.4} mass={:.5} width={:.5} (±{:.5}, ±{:.5}) after {} evals",
        dataset.len(),
        chi_square_min,
        best.mass,
        best.width,
        bounds.mass_uncertainty,
        bounds.width_uncertainty,
        primary.evaluations,
    );
    if !convergence.all() {
        log::warn!(
            "minimizer stopped on its iteration budget (primary={}, upper={}, lower={}); using best estimate",
            convergence.primary,
            convergence.upper_bound,
            convergence.lower_bound
        );
    }

    Ok(ModelFit {
        result: FitResult {
            chi_square_min,
            parameters: best,
        },
        bounds,
        convergence,
    })
}

/// A dataset is fittable when it is non-empty and every sigma is finite and > 0.
pub fn validate_dataset(dataset: &Dataset) -> Result<(), AppError> {
    if dataset.is_empty() {
        return Err(AppError::new(ErrorKind::NoData, "No observations to fit."));
    }
    for (i, o) in dataset.iter().enumerate() {
        if !(o.x.is_finite() && o.y.is_finite()) {
            return Err(AppError::invalid_input(format!("Observation {i} has a non-finite value.")));
        }
        if !(o.sigma.is_finite() && o.sigma > 0.0) {
            return Err(AppError::invalid_input(format!(
                "Observation {i} has an invalid uncertainty {} (must be finite and > 0).",
                o.sigma
            )));
        }
    }
    Ok(())
}

fn to_vector(p: ParameterPair) -> Vector2<f64> {
    Vector2::new(p.mass, p.width)
}

fn to_pair(v: &Vector2<f64>) -> ParameterPair {
    ParameterPair::new(v[0], v[1].abs())
}
