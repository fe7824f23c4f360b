//! Hard 3σ outlier rejection against a fitted curve.

use crate::domain::{Dataset, Observation};
use crate::error::AppError;

/// Default rejection threshold, in units of each point's sigma.
pub const OUTLIER_SIGMA: f64 = 3.0;

/// Result of one filter pass.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome {
    /// Surviving observations, in their original order.
    pub reduced: Dataset,
    pub rejected: Vec<Observation>,
    /// `true` iff `reduced` is shorter than the input.
    pub rejected_any: bool,
}

/// Keep observation `i` iff `|y_i − predicted_i| < threshold · σ_i`.
pub fn filter_outliers(dataset: &Dataset, predicted: &[f64], threshold: f64) -> Result<FilterOutcome, AppError> {
    if predicted.len() != dataset.len() {
        return Err(AppError::dimension_mismatch("outlier filter", dataset.len(), predicted.len()));
    }

    let (kept, rejected): (Vec<(&Observation, f64)>, Vec<(&Observation, f64)>) = dataset
        .iter()
        .zip(predicted.iter().copied())
        .partition(|(o, p)| (o.y - p).abs() < threshold * o.sigma);

    for (o, p) in &rejected {
        log::debug!(
            "rejecting x={:.4} y={:.4} (model {:.4}, {:.1}σ off)",
            o.x,
            o.y,
            p,
            (o.y - p).abs() / o.sigma
        );
    }

    Ok(FilterOutcome {
        rejected_any: !rejected.is_empty(),
        reduced: kept.into_iter().map(|(o, _)| *o).collect(),
        rejected: rejected.into_iter().map(|(o, _)| *o).collect(),
    })
}
