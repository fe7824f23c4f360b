//! Reporting utilities: residuals and formatted terminal output.

use crate::domain::{Dataset, Observation};
use crate::error::AppError;

pub mod format;

pub use format::*;

/// One observation next to the fitted curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Residual {
    pub observation: Observation,
    pub fitted: f64,
    /// `observed − fitted`.
    pub residual: f64,
    /// Residual in units of the observation's sigma.
    pub pull: f64,
}

/// Pair every observation with its prediction.
pub fn compute_residuals(dataset: &Dataset, predicted: &[f64]) -> Result<Vec<Residual>, AppError> {
    if predicted.len() != dataset.len() {
        return Err(AppError::dimension_mismatch("residuals", dataset.len(), predicted.len()));
    }
    Ok(dataset
        .iter()
        .zip(predicted)
        .map(|(o, &fitted)| {
            let residual = o.y - fitted;
            Residual {
                observation: *o,
                fitted,
                residual,
                pull: residual / o.sigma,
            }
        })
        .collect())
}
