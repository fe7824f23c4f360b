//! χ² evaluated on a regular `(mass, width)` grid around a fitted point.
//!
//! Used only for visualization: the `χ²min + 1` level set is the 1σ region the
//! bound search estimates.

use crate::domain::{Dataset, ParameterPair, PhysicsConstants};
use crate::error::AppError;
use crate::fit::fitter::validate_dataset;
use crate::math::dataset_chi_square;

/// Half-width of the default grid in each parameter.
pub const DEFAULT_HALF_SPAN: f64 = 0.1;
/// Default samples per axis.
pub const DEFAULT_RESOLUTION: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct ChiSquareGrid {
    /// Mass at each row, ascending.
    pub masses: Vec<f64>,
    /// Width at each column, ascending.
    pub widths: Vec<f64>,
    /// `values[i][j] = χ²(masses[i], widths[j])`.
    pub values: Vec<Vec<f64>>,
    /// Smallest sampled value and its `(row, column)`.
    pub minimum: (f64, usize, usize),
}

impl ChiSquareGrid {
    /// Value of the 1σ contour relative to `chi_square_min`.
    pub fn one_sigma_level(chi_square_min: f64) -> f64 {
        chi_square_min + 1.0
    }
}

/// Evaluate χ² on `resolution × resolution` points spanning
/// `center ± half_span` in each parameter.
pub fn chi_square_grid(
    dataset: &Dataset,
    center: ParameterPair,
    half_span: ParameterPair,
    resolution: usize,
    constants: &PhysicsConstants,
) -> Result<ChiSquareGrid, AppError> {
    validate_dataset(dataset)?;
    if resolution < 2 {
        return Err(AppError::invalid_input("Grid resolution must be >= 2."));
    }
    if !(center.is_finite() && half_span.is_finite() && half_span.mass > 0.0 && half_span.width > 0.0) {
        return Err(AppError::invalid_input("Grid center and spans must be finite, spans > 0."));
    }

    let masses = linspace(center.mass - half_span.mass, center.mass + half_span.mass, resolution);
    let widths = linspace(center.width - half_span.width, center.width + half_span.width, resolution);

    let mut minimum = (f64::INFINITY, 0, 0);
    let mut values = Vec::with_capacity(resolution);
    for (i, &m) in masses.iter().enumerate() {
        let mut row = Vec::with_capacity(resolution);
        for (j, &w) in widths.iter().enumerate() {
            let chi = dataset_chi_square(dataset, ParameterPair::new(m, w), constants)?;
            if chi < minimum.0 {
                minimum = (chi, i, j);
            }
            row.push(chi);
        }
        values.push(row);
    }

    Ok(ChiSquareGrid {
        masses,
        widths,
        values,
        minimum,
    })
}

fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    let step = (end - start) / (n as f64 - 1.0);
    (0..n).map(|i| start + step * i as f64).collect()
}
