//! Chi-squared goodness of fit.
//!
//! ```text
//! χ² = Σ ((predicted_i − observed_i) / σ_i)²
//! ```

use crate::domain::{Dataset, ParameterPair, PhysicsConstants};
use crate::error::AppError;
use crate::models::predict_all;

/// Chi-squared over parallel arrays.
///
/// Fails on length mismatch or a zero uncertainty; both indicate a caller bug
/// rather than bad data, since cleaned datasets never carry either.
pub fn chi_square(observed: &[f64], sigma: &[f64], predicted: &[f64]) -> Result<f64, AppError> {
    if sigma.len() != observed.len() {
        return Err(AppError::dimension_mismatch("chi-square (sigma)", observed.len(), sigma.len()));
    }
    if predicted.len() != observed.len() {
        return Err(AppError::dimension_mismatch(
            "chi-square (prediction)",
            observed.len(),
            predicted.len(),
        ));
    }
    if let Some(i) = sigma.iter().position(|&s| s == 0.0) {
        return Err(AppError::invalid_input(format!("Zero uncertainty at index {i} in chi-square.")));
    }

    Ok(observed
        .iter()
        .zip(sigma)
        .zip(predicted)
        .map(|((&o, &s), &p)| {
            let r = (p - o) / s;
            r * r
        })
        .sum())
}

/// Chi-squared of the model at `params` against a dataset.
pub fn dataset_chi_square(
    dataset: &Dataset,
    params: ParameterPair,
    constants: &PhysicsConstants,
) -> Result<f64, AppError> {
    let predicted = predict_all(&dataset.xs(), params, constants);
    chi_square(&dataset.ys(), &dataset.sigmas(), &predicted)
}

/// `χ² / (n − n_params)`, or `None` without positive degrees of freedom.
pub fn reduced_chi_square(chi_square: f64, n_points: usize, n_params: usize) -> Option<f64> {
    let dof = n_points.checked_sub(n_params).filter(|&d| d > 0)?;
    Some(chi_square / dof as f64)
}
